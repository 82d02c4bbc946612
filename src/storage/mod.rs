// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Gateway
//!
//! Schema-flexible document storage with one collection per entity.
//!
//! ## Backends
//!
//! - [`RedbStore`]: persistent, embedded redb database. Opened once at
//!   startup and shared by every request.
//! - [`InMemoryStore`]: process-local maps, used by tests.
//!
//! ## Collections
//!
//! ```text
//! user       principals ({email, role?})
//! tour       tour listings
//! bookings   bookings (eventId references a tour)
//! review     reviews ({email, review, userName})
//! guide      guides
//! division   geographic divisions
//! ```
//!
//! Handlers reach collections through [`Repository`], which maps an entity
//! marker type to its collection name.

pub mod document;
pub mod gateway;
pub mod memory;
pub mod redb_store;
pub mod repository;

pub use document::{
    filter_by_id, filter_eq, DeleteResult, Document, Filter, InsertOneResult, UpdateResult,
};
pub use gateway::{DocumentStore, StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use redb_store::RedbStore;
pub use repository::{
    Bookings, Divisions, Entity, Guides, Repository, Reviews, Tours, Users, ALL_COLLECTIONS,
};
