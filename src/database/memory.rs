//! In-process `DocumentStore` used by the handler tests. Mirrors the MongoDB
//! semantics the service relies on: `$set` upserts keyed by `id`, first
//! match wins, generated `ObjectId`s for new documents.

use super::DocumentStore;
use crate::models::{document, DeleteResult, InsertResult, UpsertResult};
use crate::utils::AppError;
use actix_web::web;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    failure: Option<String>,
    failing_id: Option<Bson>,
}

impl MemoryStore {
    /// A store whose every operation fails with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// A store that rejects upserts of the document keyed by `id` only
    pub fn failing_on_id(id: &str) -> Self {
        Self {
            failing_id: Some(Bson::String(id.to_string())),
            ..Self::default()
        }
    }

    pub fn into_data(self) -> web::Data<dyn DocumentStore> {
        web::Data::from(Arc::new(self) as Arc<dyn DocumentStore>)
    }

    fn check(&self) -> Result<(), AppError> {
        match &self.failure {
            Some(message) => Err(AppError::DatabaseError(message.clone())),
            None => Ok(()),
        }
    }
}

/// `{ id: null }` also matches documents with no `id` at all
fn matches_id(doc: &Document, id: &Bson) -> bool {
    match doc.get("id") {
        Some(value) => value == id,
        None => *id == Bson::Null,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.check()
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, AppError> {
        self.check()?;
        let collections = self.collections.lock().unwrap();
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn insert_one(&self, collection: &str, mut doc: Document) -> Result<InsertResult, AppError> {
        self.check()?;
        if !doc.contains_key("_id") {
            doc.insert("_id", ObjectId::new());
        }
        let inserted_id = doc.get("_id").cloned().unwrap_or(Bson::Null);

        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|existing| existing.get("_id") == Some(&inserted_id)) {
            return Err(AppError::DatabaseError(format!(
                "E11000 duplicate key error collection: {} index: _id_",
                collection
            )));
        }
        docs.push(doc);

        Ok(InsertResult {
            acknowledged: true,
            inserted_id: document::bson_to_json(inserted_id),
        })
    }

    async fn upsert_by_id(
        &self,
        collection: &str,
        id: Bson,
        fields: Document,
    ) -> Result<UpsertResult, AppError> {
        self.check()?;
        if self.failing_id.as_ref() == Some(&id) {
            return Err(AppError::DatabaseError(format!(
                "write rejected for document with id {}",
                id
            )));
        }

        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();

        if let Some(existing) = docs.iter_mut().find(|doc| matches_id(doc, &id)) {
            let mut modified = false;
            for (key, value) in fields {
                if existing.get(&key) != Some(&value) {
                    existing.insert(key, value);
                    modified = true;
                }
            }
            return Ok(UpsertResult {
                acknowledged: true,
                matched_count: 1,
                modified_count: modified as u64,
                upserted_count: 0,
                upserted_id: None,
            });
        }

        let oid = ObjectId::new();
        let mut created = Document::new();
        created.insert("_id", oid);
        created.insert("id", id);
        for (key, value) in fields {
            created.insert(key, value);
        }
        docs.push(created);

        Ok(UpsertResult {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(document::bson_to_json(Bson::ObjectId(oid))),
        })
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<DeleteResult, AppError> {
        self.check()?;
        let target = Bson::String(id.to_string());

        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();
        let deleted_count = match docs.iter().position(|doc| matches_id(doc, &target)) {
            Some(index) => {
                docs.remove(index);
                1
            }
            None => 0,
        };

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn test_upsert_inserts_then_updates() {
        let store = MemoryStore::default();

        let first = store
            .upsert_by_id("jobs", Bson::String("a".into()), doc! { "title": "X" })
            .await
            .unwrap();
        assert_eq!(first.upserted_count, 1);
        assert_eq!(first.matched_count, 0);

        let second = store
            .upsert_by_id("jobs", Bson::String("a".into()), doc! { "title": "Z" })
            .await
            .unwrap();
        assert_eq!(second.matched_count, 1);
        assert_eq!(second.modified_count, 1);
        assert!(second.upserted_id.is_none());

        let docs = store.find_all("jobs").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get_str("title").unwrap(), "Z");
    }

    #[tokio::test]
    async fn test_identical_upsert_is_not_a_modification() {
        let store = MemoryStore::default();
        let id = Bson::String("a".into());
        store.upsert_by_id("jobs", id.clone(), doc! { "title": "X" }).await.unwrap();

        let again = store.upsert_by_id("jobs", id, doc! { "title": "X" }).await.unwrap();
        assert_eq!(again.matched_count, 1);
        assert_eq!(again.modified_count, 0);
    }

    #[tokio::test]
    async fn test_empty_set_upserts_bare_id() {
        let store = MemoryStore::default();
        let created = store
            .upsert_by_id("jobs", Bson::String("a".into()), Document::new())
            .await
            .unwrap();
        assert_eq!(created.upserted_count, 1);

        let again = store
            .upsert_by_id("jobs", Bson::String("a".into()), Document::new())
            .await
            .unwrap();
        assert_eq!(again.matched_count, 1);
        assert_eq!(again.modified_count, 0);

        let docs = store.find_all("jobs").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].len(), 2);
        assert_eq!(docs[0].get_str("id").unwrap(), "a");
    }

    #[tokio::test]
    async fn test_bulk_upsert_stops_at_first_failure() {
        let store = MemoryStore::failing_on_id("p2");
        let err = store
            .bulk_upsert(
                "portals",
                vec![
                    doc! { "id": "p1", "name": "LinkedIn" },
                    doc! { "id": "p2", "name": "Glassdoor" },
                    doc! { "id": "p3", "name": "Indeed" },
                ],
            )
            .await
            .unwrap_err();
        assert!(err.message().contains("p2"));

        let docs = store.find_all("portals").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get_str("id").unwrap(), "p1");
    }

    #[tokio::test]
    async fn test_bulk_upsert_rejects_empty_batch() {
        let store = MemoryStore::default();
        let err = store.bulk_upsert("jobs", Vec::new()).await.unwrap_err();
        assert!(matches!(err, AppError::DatabaseError(_)));
        assert_eq!(err.message(), "Invalid BulkOperation, Batch cannot be empty");
    }

    #[tokio::test]
    async fn test_failing_store() {
        let store = MemoryStore::failing("server selection timeout");
        assert!(store.ping().await.is_err());
        let err = store.find_all("jobs").await.unwrap_err();
        assert_eq!(err.message(), "server selection timeout");
    }
}
