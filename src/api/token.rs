// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token issuance.

use axum::{extract::State, Json};
use serde_json::{Map, Value};

use crate::{auth::AuthError, models::TokenResponse, state::AppState};

/// Issue a bearer token for the posted identity payload.
///
/// The payload is signed as given; it is not checked against the principal
/// store. The token expires one hour after issuance.
#[utoipa::path(
    post,
    path = "/jwt",
    tag = "Auth",
    request_body(content = Object, description = "Identity claims, typically `{\"email\": ...}`"),
    responses((status = 200, body = TokenResponse))
)]
pub async fn issue_token(
    State(state): State<AppState>,
    Json(payload): Json<Map<String, Value>>,
) -> Result<Json<TokenResponse>, AuthError> {
    let token = state.tokens.issue(payload)?;
    Ok(Json(TokenResponse { token }))
}
