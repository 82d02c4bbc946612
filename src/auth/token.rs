// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token issuance and verification (HS256, server-held secret).
//!
//! Tokens are stateless: there is no session table and no revocation list.
//! A token stays valid until its `exp`, whatever happens to the account.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};

use super::{claims::TokenClaims, AuthError};

/// Validity window of an issued token.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

/// No clock-skew allowance: a token is rejected the second it expires.
const EXPIRY_LEEWAY_SECS: u64 = 0;

/// Signs and verifies bearer tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = EXPIRY_LEEWAY_SECS;
        // Payloads are caller-defined; an `aud` claim in one must not fail
        // verification.
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for `payload`, valid for one hour from now.
    pub fn issue(&self, payload: Map<String, Value>) -> Result<String, AuthError> {
        self.issue_at(payload, chrono::Utc::now().timestamp())
    }

    /// Issue a token as if signed at `issued_at` (Unix seconds).
    pub fn issue_at(
        &self,
        payload: Map<String, Value>,
        issued_at: i64,
    ) -> Result<String, AuthError> {
        let claims = TokenClaims::new(payload, issued_at, issued_at + TOKEN_TTL_SECS);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("failed to sign token: {e}")))
    }

    /// Check signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}
