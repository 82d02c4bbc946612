// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document store.
//!
//! A single generic [`Repository`] serves every entity; the entity marker
//! type only selects the collection. Principal-specific lookups used by the
//! role gate live in an inherent impl on `Repository<Users>`.

use std::marker::PhantomData;

use serde_json::Value;

use super::document::{
    filter_by_id, filter_eq, DeleteResult, Document, Filter, InsertOneResult, UpdateResult,
};
use super::gateway::{DocumentStore, StoreResult};
use crate::models::Principal;

/// An entity stored in its own collection.
pub trait Entity {
    const COLLECTION: &'static str;
}

macro_rules! entities {
    ($($(#[$meta:meta])* $name:ident => $collection:literal),+ $(,)?) => {
        $(
            $(#[$meta])*
            pub enum $name {}

            impl Entity for $name {
                const COLLECTION: &'static str = $collection;
            }
        )+

        /// Every collection the service uses, for pre-creating tables.
        pub const ALL_COLLECTIONS: &[&str] = &[$($collection),+];
    };
}

entities! {
    /// Registered principals (`email`, optional `role`).
    Users => "user",
    Tours => "tour",
    Bookings => "bookings",
    Reviews => "review",
    Guides => "guide",
    /// Geographic divisions tours are grouped by.
    Divisions => "division",
}

/// Typed handle on one collection.
pub struct Repository<'a, E: Entity> {
    store: &'a dyn DocumentStore,
    _entity: PhantomData<E>,
}

impl<'a, E: Entity> Repository<'a, E> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub fn find_all(&self) -> StoreResult<Vec<Document>> {
        self.store.find(E::COLLECTION, &Filter::new())
    }

    pub fn find(&self, filter: &Filter) -> StoreResult<Vec<Document>> {
        self.store.find(E::COLLECTION, filter)
    }

    pub fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>> {
        self.store.find_one(E::COLLECTION, filter)
    }

    pub fn insert_one(&self, document: Document) -> StoreResult<InsertOneResult> {
        self.store.insert_one(E::COLLECTION, document)
    }

    /// Insert unless a document already matches `guard`, atomically.
    pub fn insert_one_unless(
        &self,
        guard: &Filter,
        document: Document,
    ) -> StoreResult<Option<InsertOneResult>> {
        self.store.insert_one_unless(E::COLLECTION, guard, document)
    }

    pub fn update_one(
        &self,
        filter: &Filter,
        set: &Document,
        upsert: bool,
    ) -> StoreResult<UpdateResult> {
        self.store.update_one(E::COLLECTION, filter, set, upsert)
    }

    pub fn delete_one(&self, filter: &Filter) -> StoreResult<DeleteResult> {
        self.store.delete_one(E::COLLECTION, filter)
    }

    pub fn delete_by_id(&self, id: &str) -> StoreResult<DeleteResult> {
        self.delete_one(&filter_by_id(id))
    }
}

impl Repository<'_, Users> {
    /// Fresh read of the principal registered under `email`.
    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<Principal>> {
        Ok(self
            .find_one(&filter_eq("email", email))?
            .map(|document| Principal::from_document(&document)))
    }

    /// Set `role` to `admin` on the principal with the given `_id`.
    pub fn promote_to_admin(&self, id: &str) -> StoreResult<UpdateResult> {
        let mut set = Document::new();
        set.insert("role".to_string(), Value::String("admin".to_string()));
        self.update_one(&filter_by_id(id), &set, false)
    }
}
