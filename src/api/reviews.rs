// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Review endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::Value;

use crate::{
    error::ApiError,
    models::{CreateReviewRequest, ReviewQuery},
    state::AppState,
    storage::{filter_eq, Document, Filter, InsertOneResult, Reviews},
};

pub const MISSING_FIELDS_MESSAGE: &str = "Email and review are required fields";

impl CreateReviewRequest {
    /// The stored review document, or `None` when email or review text is
    /// missing or empty.
    fn into_document(self) -> Option<Document> {
        let email = self.email.filter(|v| !v.is_empty())?;
        let review = self.review.filter(|v| !v.is_empty())?;

        let mut document = Document::new();
        document.insert("email".to_string(), Value::String(email));
        document.insert("review".to_string(), Value::String(review));
        if let Some(user_name) = self.user_name {
            document.insert("userName".to_string(), user_name);
        }
        Some(document)
    }
}

/// Store a review. Only `email`, `review` and `userName` are kept.
#[utoipa::path(
    post,
    path = "/review",
    tag = "Reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 200, body = InsertOneResult),
        (status = 400, description = "Email or review missing")
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    Json(request): Json<CreateReviewRequest>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let document = request
        .into_document()
        .ok_or_else(|| ApiError::bad_request(MISSING_FIELDS_MESSAGE))?;
    Ok(Json(state.repo::<Reviews>().insert_one(document)?))
}

#[utoipa::path(
    get,
    path = "/review",
    tag = "Reviews",
    params(ReviewQuery),
    responses((status = 200, description = "Matching reviews", body = [Object]))
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let filter = match query.email.filter(|v| !v.is_empty()) {
        Some(email) => filter_eq("email", email),
        None => Filter::new(),
    };
    Ok(Json(state.repo::<Reviews>().find(&filter)?))
}
