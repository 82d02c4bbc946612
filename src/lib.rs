// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Travel Beyond - Tour Booking API Server
//!
//! This crate serves the tour-booking backend: principals and their roles,
//! tour listings, bookings, reviews, guides, and card payment intents.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer token issuance, verification, and the admin role gate
//! - `providers` - Payment provider client (Stripe)
//! - `storage` - Document storage (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod state;
pub mod storage;
