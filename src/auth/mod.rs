// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Token-based authentication with storage-backed authorization.
//!
//! ## Auth Flow
//!
//! 1. Client calls `POST /jwt` with its identity payload and receives an
//!    HS256 token valid for one hour
//! 2. Client sends `Authorization: Bearer <token>`
//! 3. Server:
//!    - Verifies signature and expiry against `SECRET_TOKEN` (`Auth`)
//!    - For admin routes, reads the principal by the token's `email` and
//!      requires the stored role `admin` (`AdminOnly`)
//!
//! ## Security
//!
//! - Role is never read from the token; it is looked up on every request
//! - All verification failures produce the same 401 body
//! - Role-gate denials produce 403

pub mod claims;
pub mod error;
pub mod extractor;
pub mod roles;
pub mod token;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth};
pub use roles::Role;
pub use token::{TokenService, TOKEN_TTL_SECS};
