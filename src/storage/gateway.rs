// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Storage gateway contract.

use super::document::{DeleteResult, Document, Filter, InsertOneResult, UpdateResult};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A document database exposing named collections.
///
/// Each call is a single atomic read or write; nothing composes several
/// calls into a transaction. Implementations are shared across requests
/// behind an `Arc`.
pub trait DocumentStore: Send + Sync {
    /// All documents in `collection` matching `filter`, in natural order.
    fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>>;

    /// First matching document, if any.
    fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        Ok(self.find(collection, filter)?.into_iter().next())
    }

    fn insert_one(&self, collection: &str, document: Document) -> StoreResult<InsertOneResult>;

    /// Insert `document` unless some document already matches `guard`.
    /// The check and the insert happen under one write lock or transaction.
    /// Returns `None` when a match existed and nothing was written.
    fn insert_one_unless(
        &self,
        collection: &str,
        guard: &Filter,
        document: Document,
    ) -> StoreResult<Option<InsertOneResult>>;

    /// Apply `set` to the first match; insert a new document when nothing
    /// matches and `upsert` is true.
    fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: &Document,
        upsert: bool,
    ) -> StoreResult<UpdateResult>;

    fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<DeleteResult>;

    /// Cheap liveness probe.
    fn ping(&self) -> StoreResult<()>;
}
