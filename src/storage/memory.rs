// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory document store for tests and ephemeral runs.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde_json::Value;

use super::document::{
    apply_set, matches, prepare_insert, upsert_document, DeleteResult, Document, Filter,
    InsertOneResult, UpdateResult, ID_FIELD,
};
use super::gateway::{DocumentStore, StoreError, StoreResult};

#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Append `document` unless its `_id` is already taken.
fn push_unique(
    collection: &str,
    documents: &mut Vec<Document>,
    id: String,
    document: Document,
) -> StoreResult<InsertOneResult> {
    let taken = documents
        .iter()
        .any(|existing| existing.get(ID_FIELD).and_then(Value::as_str) == Some(id.as_str()));
    if taken {
        return Err(StoreError::DuplicateKey(format!("{collection}._id {id}")));
    }
    documents.push(document);

    Ok(InsertOneResult {
        acknowledged: true,
        inserted_id: id,
    })
}

impl DocumentStore for InMemoryStore {
    fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().unwrap_or_else(PoisonError::into_inner);
        Ok(collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| matches(document, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn insert_one(&self, collection: &str, document: Document) -> StoreResult<InsertOneResult> {
        let (id, document) = prepare_insert(document)?;
        let mut collections = self.collections.write().unwrap_or_else(PoisonError::into_inner);
        let documents = collections.entry(collection.to_string()).or_default();

        push_unique(collection, documents, id, document)
    }

    fn insert_one_unless(
        &self,
        collection: &str,
        guard: &Filter,
        document: Document,
    ) -> StoreResult<Option<InsertOneResult>> {
        let (id, document) = prepare_insert(document)?;
        let mut collections = self.collections.write().unwrap_or_else(PoisonError::into_inner);
        let documents = collections.entry(collection.to_string()).or_default();

        if documents.iter().any(|existing| matches(existing, guard)) {
            return Ok(None);
        }
        push_unique(collection, documents, id, document).map(Some)
    }

    fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: &Document,
        upsert: bool,
    ) -> StoreResult<UpdateResult> {
        let mut collections = self.collections.write().unwrap_or_else(PoisonError::into_inner);
        let documents = collections.entry(collection.to_string()).or_default();

        if let Some(document) = documents.iter_mut().find(|d| matches(d, filter)) {
            return Ok(UpdateResult::matched(apply_set(document, set)));
        }
        if !upsert {
            return Ok(UpdateResult::unmatched());
        }

        let (id, document) = upsert_document(filter, set)?;
        push_unique(collection, documents, id, document)
            .map(|inserted| UpdateResult::upserted(inserted.inserted_id))
    }

    fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<DeleteResult> {
        let mut collections = self.collections.write().unwrap_or_else(PoisonError::into_inner);
        let deleted = match collections.get_mut(collection) {
            Some(documents) => match documents.iter().position(|d| matches(d, filter)) {
                Some(index) => {
                    documents.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };
        Ok(DeleteResult::deleted(deleted))
    }

    fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
