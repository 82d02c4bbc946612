// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded document store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! One table per collection: `_id` → serialized document (JSON bytes).
//! Keys are generated in creation order, so a forward scan yields natural
//! insertion order.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, Table, TableDefinition, TableError};

use super::document::{
    apply_set, id_only, matches, prepare_insert, upsert_document, DeleteResult, Document, Filter,
    InsertOneResult, UpdateResult,
};
use super::gateway::{DocumentStore, StoreError, StoreResult};

type Collection<'a> = TableDefinition<'a, &'static str, &'static [u8]>;
type CollectionTable<'txn> = Table<'txn, &'static str, &'static [u8]>;

fn collection(name: &str) -> Collection<'_> {
    TableDefinition::new(name)
}

fn decode(bytes: &[u8]) -> StoreResult<Document> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Key and contents of the first document matching `filter`.
fn first_match(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    filter: &Filter,
) -> StoreResult<Option<(String, Document)>> {
    for entry in table.iter()? {
        let (key, value) = entry?;
        let document = decode(value.value())?;
        if matches(&document, filter) {
            return Ok(Some((key.value().to_string(), document)));
        }
    }
    Ok(None)
}

/// Write `document` under `id`, refusing to replace an existing one.
fn insert_unique(
    name: &str,
    table: &mut CollectionTable<'_>,
    id: &str,
    document: &Document,
) -> StoreResult<()> {
    if table.get(id)?.is_some() {
        return Err(StoreError::DuplicateKey(format!("{name}._id {id}")));
    }
    let json = serde_json::to_vec(document)?;
    table.insert(id, json.as_slice())?;
    Ok(())
}

/// Persistent document store.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open (or create) the database and pre-create the given collections.
    /// Missing parent directories are created.
    pub fn open(path: &Path, collections: &[&str]) -> StoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        for name in collections {
            let _ = write_txn.open_table(collection(name))?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }
}

impl DocumentStore for RedbStore {
    fn find(&self, name: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(collection(name)) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if let Some(id) = id_only(filter) {
            return match table.get(id)? {
                Some(value) => Ok(vec![decode(value.value())?]),
                None => Ok(Vec::new()),
            };
        }

        let mut documents = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let document = decode(value.value())?;
            if matches(&document, filter) {
                documents.push(document);
            }
        }
        Ok(documents)
    }

    fn insert_one(&self, name: &str, document: Document) -> StoreResult<InsertOneResult> {
        let (id, document) = prepare_insert(document)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(collection(name))?;
            insert_unique(name, &mut table, &id, &document)?;
        }
        write_txn.commit()?;

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    fn insert_one_unless(
        &self,
        name: &str,
        guard: &Filter,
        document: Document,
    ) -> StoreResult<Option<InsertOneResult>> {
        let (id, document) = prepare_insert(document)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(collection(name))?;
            if first_match(&table, guard)?.is_some() {
                return Ok(None);
            }
            insert_unique(name, &mut table, &id, &document)?;
        }
        write_txn.commit()?;

        Ok(Some(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        }))
    }

    fn update_one(
        &self,
        name: &str,
        filter: &Filter,
        set: &Document,
        upsert: bool,
    ) -> StoreResult<UpdateResult> {
        let write_txn = self.db.begin_write()?;
        let result = {
            let mut table = write_txn.open_table(collection(name))?;

            match first_match(&table, filter)? {
                Some((key, mut document)) => {
                    let modified = apply_set(&mut document, set);
                    if modified {
                        let json = serde_json::to_vec(&document)?;
                        table.insert(key.as_str(), json.as_slice())?;
                    }
                    UpdateResult::matched(modified)
                }
                None if upsert => {
                    let (id, document) = upsert_document(filter, set)?;
                    insert_unique(name, &mut table, &id, &document)?;
                    UpdateResult::upserted(id)
                }
                None => UpdateResult::unmatched(),
            }
        };
        write_txn.commit()?;
        Ok(result)
    }

    fn delete_one(&self, name: &str, filter: &Filter) -> StoreResult<DeleteResult> {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut table = write_txn.open_table(collection(name))?;
            match first_match(&table, filter)? {
                Some((key, _)) => u64::from(table.remove(key.as_str())?.is_some()),
                None => 0,
            }
        };
        write_txn.commit()?;
        Ok(DeleteResult::deleted(deleted))
    }

    fn ping(&self) -> StoreResult<()> {
        let _ = self.db.begin_read()?;
        Ok(())
    }
}
