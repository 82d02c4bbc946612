// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read-only reference collections.

use axum::{extract::State, Json};

use crate::{
    error::ApiError,
    state::AppState,
    storage::{Divisions, Document, Guides},
};

#[utoipa::path(
    get,
    path = "/guide",
    tag = "Catalog",
    responses((status = 200, description = "All guides", body = [Object]))
)]
pub async fn list_guides(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.repo::<Guides>().find_all()?))
}

#[utoipa::path(
    get,
    path = "/division",
    tag = "Catalog",
    responses((status = 200, description = "All divisions", body = [Object]))
)]
pub async fn list_divisions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.repo::<Divisions>().find_all()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn lists_return_stored_documents() {
        let state = AppState::for_tests();
        state
            .repo::<Guides>()
            .insert_one(json!({"name": "Rafi"}).as_object().cloned().unwrap())
            .unwrap();

        let Json(guides) = list_guides(State(state.clone())).await.unwrap();
        assert_eq!(guides.len(), 1);
        assert_eq!(guides[0]["name"], "Rafi");

        let Json(divisions) = list_divisions(State(state)).await.unwrap();
        assert!(divisions.is_empty());
    }
}
