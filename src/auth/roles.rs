// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Principal roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Principal roles.
///
/// Roles live only in storage and are never embedded in tokens. A principal
/// without a stored role is a `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Self-registered account
    #[default]
    User,
    /// May call admin-gated routes
    Admin,
}

impl Role {
    /// Parse a stored role value. Matching is exact: only `"admin"` grants
    /// admin rights.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        *self == Role::Admin
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}
