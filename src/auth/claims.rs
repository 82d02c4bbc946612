// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the authenticated caller representation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims carried by an issued token.
///
/// The caller-supplied payload is embedded as-is (flattened) next to the
/// registered `iat`/`exp` claims. Role is never part of the payload that
/// the server relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
    /// Caller-supplied identity claims
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl TokenClaims {
    /// Build claims from an arbitrary payload, overriding any registered
    /// time claims it carried.
    pub fn new(mut payload: Map<String, Value>, iat: i64, exp: i64) -> Self {
        payload.remove("iat");
        payload.remove("exp");
        Self { iat, exp, payload }
    }

    /// The `email` claim, when present and a string.
    pub fn email(&self) -> Option<&str> {
        self.payload.get("email").and_then(Value::as_str)
    }
}

/// Identity established by a verified bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    /// Email claim, if the token carried one
    pub email: Option<String>,
    /// Token expiration (Unix seconds)
    pub expires_at: i64,
    /// Full decoded claims
    pub claims: TokenClaims,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            email: claims.email().map(str::to_string),
            expires_at: claims.exp,
            claims,
        }
    }
}
