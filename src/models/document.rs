//! Conversion between the JSON bodies seen at the HTTP edge and the BSON
//! documents stored in MongoDB. Jobs and portals have no schema, so both
//! sides stay generic (`serde_json::Value` / `Document`).

use crate::utils::AppError;
use mongodb::bson::{self, Bson, Document};
use serde_json::Value;

/// Field the application uses as its own key (distinct from `_id`)
const ID_FIELD: &str = "id";

const OBJECT_ID_FIELD: &str = "_id";

/// Converts a request body into a BSON document. Only JSON objects qualify.
pub fn from_json(value: Value) -> Result<Document, AppError> {
    match value {
        Value::Object(_) => Ok(bson::to_document(&value)?),
        other => Err(AppError::DatabaseError(format!(
            "document must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Converts a sync body into its batch of documents. The body must be a
/// JSON array whose items are all objects.
pub fn batch_from_json(value: Value) -> Result<Vec<Document>, AppError> {
    match value {
        Value::Array(items) => items.into_iter().map(from_json).collect(),
        other => Err(AppError::DatabaseError(format!(
            "sync body must be a JSON array of documents, got {}",
            json_kind(&other)
        ))),
    }
}

/// Renders a stored document as relaxed extended JSON, with an `ObjectId`
/// `_id` flattened to its hex string.
pub fn to_json(mut doc: Document) -> Value {
    if let Ok(oid) = doc.get_object_id(OBJECT_ID_FIELD) {
        doc.insert(OBJECT_ID_FIELD, oid.to_hex());
    }
    Bson::Document(doc).into_relaxed_extjson()
}

/// Same rendering as `to_json`, for a single value such as an inserted id
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        other => other.into_relaxed_extjson(),
    }
}

/// The `id` a document is upserted by. A document without one matches
/// `{ id: null }`.
pub fn upsert_key(doc: &Document) -> Bson {
    doc.get(ID_FIELD).cloned().unwrap_or(Bson::Null)
}

/// Fields for a `$set`: everything except the immutable `_id`
pub fn set_fields(mut doc: Document) -> Document {
    doc.remove(OBJECT_ID_FIELD);
    doc
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
