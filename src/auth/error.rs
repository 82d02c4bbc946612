// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Gate failure.
///
/// Variants are kept distinct for logging; every authentication variant
/// renders the same response so callers cannot tell why verification failed.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("authorization header is missing")]
    MissingAuthHeader,
    #[error("authorization header is not a bearer credential")]
    InvalidAuthHeader,
    #[error("token is malformed")]
    MalformedToken,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    TokenExpired,
    #[error("caller lacks the admin role")]
    InsufficientPermissions,
    #[error("path identity does not match the token")]
    IdentityMismatch,
    #[error("internal authentication error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    message: &'static str,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions | AuthError::IdentityMismatch => {
                StatusCode::FORBIDDEN
            }
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Caller-facing message.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::IdentityMismatch => "Access Unauthorized",
            AuthError::Internal(_) => "Internal server error",
            _ => "Access forbidden",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::MalformedToken,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::Internal(detail) => tracing::error!(%detail, "Role gate failed"),
            other => tracing::debug!(reason = %other, "Request rejected by auth gate"),
        }
        let body = Json(AuthErrorBody {
            message: self.public_message(),
        });
        (self.status_code(), body).into_response()
    }
}
