// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors implementing the credential verifier and the role gate.
//!
//! Use `Auth` in handlers that require a verified identity and `AdminOnly`
//! in handlers that additionally require the stored `admin` role:
//!
//! ```rust,ignore
//! async fn list_users(AdminOnly(_admin): AdminOnly, State(state): State<AppState>) {
//!     // only reached by principals whose stored role is "admin"
//! }
//! ```
//!
//! Extractors run before the handler body, so a rejected request never
//! reaches storage beyond the role lookup itself.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;
use crate::storage::Users;

/// Extract the bearer credential from request headers.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = match header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
        _ => return Err(AuthError::InvalidAuthHeader),
    };

    if token.is_empty() {
        return Err(AuthError::MissingAuthHeader);
    }
    Ok(token)
}

/// Extractor for a verified caller identity.
///
/// The decoded identity is stored in the request extensions so later
/// extractors on the same request reuse it.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let token = bearer_token(&parts.headers)?;
        let claims = state.tokens.verify(token)?;
        let user = AuthenticatedUser::from_claims(claims);

        parts.extensions.insert(user.clone());
        Ok(Auth(user))
    }
}

/// Extractor that requires the caller's stored role to be `admin`.
///
/// The role is read from the principal store on every request; nothing is
/// cached, so promotions and demotions apply to the very next call.
pub struct AdminOnly(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        let email = user
            .email
            .as_deref()
            .ok_or(AuthError::InsufficientPermissions)?;

        let principal = state
            .repo::<Users>()
            .find_by_email(email)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        match principal {
            Some(principal) if principal.is_admin() => {
                tracing::debug!(email = %principal.email, "Admin route granted");
                Ok(AdminOnly(user))
            }
            _ => {
                tracing::info!(email, expires_at = user.expires_at, "Admin route denied");
                Err(AuthError::InsufficientPermissions)
            }
        }
    }
}
