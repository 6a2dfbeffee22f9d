//! BSON <-> domain conversions. Documents are rendered to JSON the way the
//! HTTP surface shows them (ObjectId as 24-hex, dates as RFC 3339) and then
//! decoded into the typed records of `tourbook_core::models`.

use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Bson, Document};
use mongodb::Cursor;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use tourbook_core::models::{AssignmentKey, Extra};
use tourbook_core::{CoreError, CoreResult};

pub fn store_err(err: mongodb::error::Error) -> CoreError {
    CoreError::Store(err.to_string())
}

pub fn parse_object_id(id: &str) -> CoreResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| CoreError::InvalidId(id.to_string()))
}

pub fn inserted_id(id: &Bson) -> CoreResult<String> {
    id.as_object_id()
        .map(|oid| oid.to_hex())
        .ok_or_else(|| CoreError::Store(format!("unexpected inserted id: {id}")))
}

pub fn bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or(Value::Null),
        Bson::Double(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        Bson::Int32(i) => Value::from(i),
        Bson::Int64(i) => Value::from(i),
        Bson::String(s) => Value::String(s),
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Document(doc) => document_to_json(doc),
        other => other.into_relaxed_extjson(),
    }
}

pub fn document_to_json(doc: Document) -> Value {
    let map: Map<String, Value> = doc.into_iter().map(|(k, v)| (k, bson_to_json(v))).collect();
    Value::Object(map)
}

pub fn decode<T: DeserializeOwned>(doc: Document) -> CoreResult<T> {
    serde_json::from_value(document_to_json(doc))
        .map_err(|e| CoreError::Store(format!("malformed document: {e}")))
}

pub async fn decode_all<T: DeserializeOwned>(cursor: Cursor<Document>) -> CoreResult<Vec<T>> {
    let docs: Vec<Document> = cursor.try_collect().await.map_err(store_err)?;
    docs.into_iter().map(decode).collect()
}

pub fn json_to_bson(value: &Value) -> CoreResult<Bson> {
    bson::to_bson(value).map_err(|e| CoreError::Store(e.to_string()))
}

/// Pass-through client fields. Fixed fields are set on top by the caller.
pub fn extra_document(extra: &Extra) -> CoreResult<Document> {
    bson::to_document(extra).map_err(|e| CoreError::Store(e.to_string()))
}

/// Escape a user-supplied needle for use inside `$regex`.
pub fn regex_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if "\\^$.|?*+()[]{}/-".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Reads only the AssignedTour triple from a raw booking document, so a
/// booking the typed decode would reject still reaches its AssignedTour.
pub fn assignment_key_of(booking: &Document) -> AssignmentKey {
    let field = |name: &str| booking.get_str(name).unwrap_or_default().to_string();
    AssignmentKey {
        user_email: field("userEmail"),
        package_name: field("packageName"),
        tour_guide_email: field("tourGuideEmail"),
    }
}
