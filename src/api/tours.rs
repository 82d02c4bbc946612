// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tour listing endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::ApiError,
    models::UpdateTourRequest,
    state::AppState,
    storage::{filter_by_id, DeleteResult, Document, InsertOneResult, Tours, UpdateResult},
};

/// List every tour.
#[utoipa::path(
    get,
    path = "/tour",
    tag = "Tours",
    responses((status = 200, description = "All tours", body = [Object]))
)]
pub async fn list_tours(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.repo::<Tours>().find_all()?))
}

/// Insert a tour document as posted.
#[utoipa::path(
    post,
    path = "/tour",
    tag = "Tours",
    request_body(content = Object, description = "Tour document"),
    responses((status = 200, body = InsertOneResult))
)]
pub async fn create_tour(
    State(state): State<AppState>,
    Json(tour): Json<Document>,
) -> Result<Json<InsertOneResult>, ApiError> {
    Ok(Json(state.repo::<Tours>().insert_one(tour)?))
}

/// Overwrite the editable fields of a tour, creating it if the id is
/// unknown.
#[utoipa::path(
    patch,
    path = "/tour/{id}",
    tag = "Tours",
    params(("id" = String, Path, description = "Tour document id")),
    request_body = UpdateTourRequest,
    responses((status = 200, body = UpdateResult))
)]
pub async fn update_tour(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTourRequest>,
) -> Result<Json<UpdateResult>, ApiError> {
    let set = request.into_set();
    Ok(Json(state.repo::<Tours>().update_one(&filter_by_id(&id), &set, true)?))
}

#[utoipa::path(
    delete,
    path = "/tour/{id}",
    tag = "Tours",
    params(("id" = String, Path, description = "Tour document id")),
    responses((status = 200, body = DeleteResult))
)]
pub async fn delete_tour(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    Ok(Json(state.repo::<Tours>().delete_by_id(&id)?))
}
