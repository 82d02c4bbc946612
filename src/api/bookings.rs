// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Booking endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::ApiError,
    models::BookingQuery,
    state::AppState,
    storage::{filter_eq, Bookings, DeleteResult, Document, Filter, InsertOneResult},
};

/// Field a booking references its tour by.
const EVENT_ID_FIELD: &str = "eventId";

impl BookingQuery {
    /// `email` takes precedence over `admin`; empty values select nothing.
    fn into_filter(self) -> Filter {
        let non_empty = |v: Option<String>| v.filter(|v| !v.is_empty());
        match (non_empty(self.email), non_empty(self.admin)) {
            (Some(email), _) => filter_eq("email", email),
            (None, Some(admin)) => filter_eq("admin", admin),
            (None, None) => Filter::new(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/bookings",
    tag = "Bookings",
    request_body(content = Object, description = "Booking document"),
    responses((status = 200, body = InsertOneResult))
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(booking): Json<Document>,
) -> Result<Json<InsertOneResult>, ApiError> {
    Ok(Json(state.repo::<Bookings>().insert_one(booking)?))
}

/// List bookings, optionally narrowed to one booker or one admin.
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "Bookings",
    params(BookingQuery),
    responses((status = 200, description = "Matching bookings", body = [Object]))
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.repo::<Bookings>().find(&query.into_filter())?))
}

#[utoipa::path(
    delete,
    path = "/bookings/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking document id")),
    responses((status = 200, body = DeleteResult))
)]
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    Ok(Json(state.repo::<Bookings>().delete_by_id(&id)?))
}

/// Delete the first booking made for the given tour.
#[utoipa::path(
    delete,
    path = "/bookings/admin/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Tour id the booking references")),
    responses((status = 200, body = DeleteResult))
)]
pub async fn delete_booking_for_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    let result = state
        .repo::<Bookings>()
        .delete_one(&filter_eq(EVENT_ID_FIELD, id))?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn query(email: Option<&str>, admin: Option<&str>) -> BookingQuery {
        BookingQuery {
            email: email.map(str::to_string),
            admin: admin.map(str::to_string),
        }
    }

    async fn seed(state: &AppState) {
        for booking in [
            json!({"email": "a@x.com", "admin": "boss@x.com", "eventId": "t1"}),
            json!({"email": "b@x.com", "admin": "boss@x.com", "eventId": "t1"}),
            json!({"email": "a@x.com", "admin": "other@x.com", "eventId": "t2"}),
        ] {
            create_booking(State(state.clone()), Json(doc(booking))).await.unwrap();
        }
    }

    #[test]
    fn email_wins_over_admin_and_empty_is_ignored() {
        assert_eq!(
            query(Some("a@x.com"), Some("boss@x.com")).into_filter(),
            filter_eq("email", "a@x.com")
        );
        assert_eq!(
            query(Some(""), Some("boss@x.com")).into_filter(),
            filter_eq("admin", "boss@x.com")
        );
        assert!(query(Some(""), Some("")).into_filter().is_empty());
    }

    #[tokio::test]
    async fn list_filters_by_query() {
        let state = AppState::for_tests();
        seed(&state).await;

        let Json(all) = list_bookings(State(state.clone()), Query(query(None, None)))
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let Json(mine) = list_bookings(State(state.clone()), Query(query(Some("a@x.com"), None)))
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);

        let Json(managed) = list_bookings(State(state), Query(query(None, Some("boss@x.com"))))
            .await
            .unwrap();
        assert_eq!(managed.len(), 2);
    }

    #[tokio::test]
    async fn delete_for_event_removes_only_first_match() {
        let state = AppState::for_tests();
        seed(&state).await;

        let Json(result) = delete_booking_for_event(State(state.clone()), Path("t1".to_string()))
            .await
            .unwrap();
        assert_eq!(result.deleted_count, 1);

        let remaining = state
            .repo::<Bookings>()
            .find(&filter_eq(EVENT_ID_FIELD, "t1"))
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0]["email"], "b@x.com");
    }

    #[tokio::test]
    async fn delete_by_id_removes_booking() {
        let state = AppState::for_tests();
        let booking = doc(json!({"email": "a@x.com"}));
        let Json(inserted) = create_booking(State(state.clone()), Json(booking))
            .await
            .unwrap();

        let Json(result) = delete_booking(State(state.clone()), Path(inserted.inserted_id))
            .await
            .unwrap();
        assert_eq!(result.deleted_count, 1);
        assert!(state.repo::<Bookings>().find_all().unwrap().is_empty());
    }
}
