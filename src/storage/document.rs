// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Document model shared by all store backends.
//!
//! Documents are JSON objects. Every stored document carries a string `_id`.
//! Filters are JSON objects matched by exact field equality; results mirror
//! the shapes returned by document-database drivers so handlers can echo
//! them verbatim.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::StoreError;

/// A schema-flexible stored record.
pub type Document = Map<String, Value>;

/// Equality filter: every field must be present and equal.
pub type Filter = Map<String, Value>;

/// Identifier field present on every stored document.
pub const ID_FIELD: &str = "_id";

/// Result of `insert_one`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

/// Result of `update_one`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

/// Result of `delete_one`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl UpdateResult {
    pub(crate) fn unmatched() -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 0,
            upserted_id: None,
        }
    }

    pub(crate) fn matched(modified: bool) -> Self {
        Self {
            matched_count: 1,
            modified_count: u64::from(modified),
            ..Self::unmatched()
        }
    }

    pub(crate) fn upserted(id: String) -> Self {
        Self {
            upserted_count: 1,
            upserted_id: Some(id),
            ..Self::unmatched()
        }
    }
}

impl DeleteResult {
    pub(crate) fn deleted(count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count: count,
        }
    }
}

/// Build a filter matching a single field.
pub fn filter_eq(field: &str, value: impl Into<Value>) -> Filter {
    let mut filter = Filter::new();
    filter.insert(field.to_string(), value.into());
    filter
}

/// Build a filter matching a document identifier.
pub fn filter_by_id(id: &str) -> Filter {
    filter_eq(ID_FIELD, id)
}

/// Check whether `document` satisfies every equality in `filter`.
pub fn matches(document: &Document, filter: &Filter) -> bool {
    filter
        .iter()
        .all(|(field, expected)| document.get(field) == Some(expected))
}

/// If the filter selects exactly one `_id` and nothing else, return it.
pub(crate) fn id_only(filter: &Filter) -> Option<&str> {
    if filter.len() != 1 {
        return None;
    }
    filter.get(ID_FIELD).and_then(Value::as_str)
}

/// Apply `$set` semantics. Returns whether any field changed.
pub(crate) fn apply_set(document: &mut Document, set: &Document) -> bool {
    let mut changed = false;
    for (field, value) in set {
        if field == ID_FIELD {
            continue;
        }
        if document.get(field) != Some(value) {
            document.insert(field.clone(), value.clone());
            changed = true;
        }
    }
    changed
}

/// Ensure the document has a string `_id`, generating one when absent.
pub(crate) fn prepare_insert(mut document: Document) -> Result<(String, Document), StoreError> {
    let id = match document.get(ID_FIELD) {
        None | Some(Value::Null) => {
            let id = generate_id();
            document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            id
        }
        Some(Value::String(id)) => id.clone(),
        Some(other) => {
            return Err(StoreError::InvalidDocument(format!(
                "_id must be a string, got {other}"
            )))
        }
    };
    Ok((id, document))
}

/// Build the document inserted by an upsert that matched nothing.
pub(crate) fn upsert_document(
    filter: &Filter,
    set: &Document,
) -> Result<(String, Document), StoreError> {
    let mut document = filter.clone();
    apply_set(&mut document, set);
    prepare_insert(document)
}

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

/// Generate a 24-hex-digit identifier: seconds timestamp, per-process random
/// value, then a wrapping counter. Identifiers sort in creation order within a
/// process.
pub fn generate_id() -> String {
    let process = PROCESS_UNIQUE.get_or_init(|| {
        let bytes = uuid::Uuid::new_v4().into_bytes();
        [bytes[0], bytes[1], bytes[2], bytes[3], bytes[4]]
    });
    let counter = COUNTER.get_or_init(|| {
        let bytes = uuid::Uuid::new_v4().into_bytes();
        AtomicU32::new(u32::from_be_bytes([0, bytes[5], bytes[6], bytes[7]]))
    });

    let seconds = chrono::Utc::now().timestamp() as u32;
    let count = counter.fetch_add(1, Ordering::Relaxed) & 0x00FF_FFFF;

    let mut id = String::with_capacity(24);
    id.push_str(&format!("{seconds:08x}"));
    for byte in process {
        id.push_str(&format!("{byte:02x}"));
    }
    id.push_str(&format!("{count:06x}"));
    id
}
