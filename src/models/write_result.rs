use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Outcome of inserting a single document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    #[schema(value_type = Object)]
    pub inserted_id: Value,
}

/// Outcome of one `updateOne` with `upsert: true`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    #[schema(value_type = Option<Object>)]
    pub upserted_id: Option<Value>,
}

/// Outcome of a `deleteOne`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Aggregated outcome of an ordered batch of upserts, in the shape of a
/// driver bulk-write result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkWriteResult {
    /// 1 once the batch was applied
    pub ok: u32,
    pub inserted_count: u64,
    pub matched_count: u64,
    pub modified_count: u64,
    pub deleted_count: u64,
    pub upserted_count: u64,
    /// Batch index (as string) -> `_id` of the document created for it
    #[schema(value_type = Object)]
    pub upserted_ids: BTreeMap<String, Value>,
    /// Always empty: a sync only issues upserts
    #[schema(value_type = Object)]
    pub inserted_ids: BTreeMap<String, Value>,
}

impl Default for BulkWriteResult {
    fn default() -> Self {
        Self {
            ok: 1,
            inserted_count: 0,
            matched_count: 0,
            modified_count: 0,
            deleted_count: 0,
            upserted_count: 0,
            upserted_ids: BTreeMap::new(),
            inserted_ids: BTreeMap::new(),
        }
    }
}

impl BulkWriteResult {
    /// Folds the outcome of the upsert at `index` of the batch into the totals
    pub fn record(&mut self, index: usize, upsert: UpsertResult) {
        self.matched_count += upsert.matched_count;
        self.modified_count += upsert.modified_count;
        self.upserted_count += upsert.upserted_count;
        if let Some(id) = upsert.upserted_id {
            self.upserted_ids.insert(index.to_string(), id);
        }
    }

    /// Documents created or changed by the batch
    pub fn synced_count(&self) -> u64 {
        self.upserted_count + self.modified_count
    }
}

/// Envelope returned by the sync endpoints
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SyncResponse {
    pub success: bool,
    pub message: String,
    pub result: BulkWriteResult,
}

impl SyncResponse {
    pub fn new(label: &str, result: BulkWriteResult) -> Self {
        Self {
            success: true,
            message: format!("Synced {} {}", result.synced_count(), label),
            result,
        }
    }
}
