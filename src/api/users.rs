// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Principal registration and role management.
//!
//! Listing, promotion and deletion require the stored `admin` role. The
//! admin self-check only answers for the caller's own email.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    auth::{AdminOnly, Auth, AuthError},
    error::ApiError,
    models::{AdminStatusResponse, UserExistsResponse},
    state::AppState,
    storage::{filter_eq, DeleteResult, Document, InsertOneResult, UpdateResult, Users},
};

/// Outcome of `POST /user`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum RegisterResponse {
    Inserted(InsertOneResult),
    Exists(UserExistsResponse),
}

/// Register a principal. An email that is already registered is left
/// untouched.
#[utoipa::path(
    post,
    path = "/user",
    tag = "Users",
    request_body(content = Object, description = "Principal document, typically `{email, name}`"),
    responses(
        (status = 200, description = "Inserted, or already registered", body = RegisterResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(user): Json<Document>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let users = state.repo::<Users>();

    let inserted = match user.get("email").cloned() {
        Some(email) => users.insert_one_unless(&filter_eq("email", email), user)?,
        None => Some(users.insert_one(user)?),
    };

    Ok(Json(match inserted {
        Some(result) => RegisterResponse::Inserted(result),
        None => RegisterResponse::Exists(UserExistsResponse {
            message: "user already exists".to_string(),
            inserted_id: None,
        }),
    }))
}

/// List every registered principal.
#[utoipa::path(
    get,
    path = "/user",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All principals", body = [Object]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin role required")
    )
)]
pub async fn list_users(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.repo::<Users>().find_all()?))
}

/// Report whether the caller holds the admin role.
///
/// The path email must equal the email in the caller's token.
#[utoipa::path(
    get,
    path = "/user/admin/{key}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("key" = String, Path, description = "Caller's own email")),
    responses(
        (status = 200, body = AdminStatusResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Email does not match the token")
    )
)]
pub async fn admin_status(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<AdminStatusResponse>, AuthError> {
    if user.email.as_deref() != Some(email.as_str()) {
        return Err(AuthError::IdentityMismatch);
    }

    let principal = state
        .repo::<Users>()
        .find_by_email(&email)
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    Ok(Json(AdminStatusResponse {
        admin: principal.is_some_and(|p| p.is_admin()),
    }))
}

/// Grant the admin role to the principal with the given id.
#[utoipa::path(
    patch,
    path = "/user/admin/{key}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("key" = String, Path, description = "Document id of the principal to promote")),
    responses(
        (status = 200, body = UpdateResult),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin role required")
    )
)]
pub async fn promote_to_admin(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, ApiError> {
    let result = state.repo::<Users>().promote_to_admin(&id)?;
    tracing::info!(
        by = admin.email.as_deref().unwrap_or_default(),
        principal_id = %id,
        matched = result.matched_count,
        "Principal promoted to admin"
    );
    Ok(Json(result))
}

/// Delete the principal with the given id.
#[utoipa::path(
    delete,
    path = "/user/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Principal document id")),
    responses(
        (status = 200, body = DeleteResult),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin role required")
    )
)]
pub async fn delete_user(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    let result = state.repo::<Users>().delete_by_id(&id)?;
    tracing::info!(
        by = admin.email.as_deref().unwrap_or_default(),
        principal_id = %id,
        deleted = result.deleted_count,
        "Principal deleted"
    );
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthenticatedUser, TokenClaims};
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn caller(email: &str) -> AuthenticatedUser {
        let claims = TokenClaims::new(doc(json!({ "email": email })), 0, i64::MAX);
        AuthenticatedUser::from_claims(claims)
    }

    #[tokio::test]
    async fn register_inserts_then_reports_duplicate() {
        let state = AppState::for_tests();

        let body = doc(json!({"email": "a@x.com"}));
        let Json(first) = register_user(State(state.clone()), Json(body.clone()))
            .await
            .unwrap();
        assert!(matches!(first, RegisterResponse::Inserted(_)));

        let Json(second) = register_user(State(state.clone()), Json(body))
            .await
            .unwrap();
        let json = serde_json::to_value(&second).unwrap();
        assert_eq!(json, json!({"message": "user already exists", "insertedId": null}));

        assert_eq!(state.repo::<Users>().find_all().unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registrations_store_one_principal() {
        let state = AppState::for_tests();

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let state = state.clone();
                tokio::spawn(async move {
                    let body = doc(json!({"email": "race@x.com"}));
                    let Json(response) = register_user(State(state), Json(body)).await.unwrap();
                    matches!(response, RegisterResponse::Inserted(_))
                })
            })
            .collect();

        let mut inserted = 0;
        for task in tasks {
            if task.await.unwrap() {
                inserted += 1;
            }
        }
        assert_eq!(inserted, 1);
        assert_eq!(state.repo::<Users>().find_all().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn admin_status_rejects_other_email() {
        let state = AppState::for_tests();
        let result = admin_status(
            Auth(caller("a@x.com")),
            State(state),
            Path("b@x.com".to_string()),
        )
        .await;
        assert!(matches!(result, Err(AuthError::IdentityMismatch)));
    }

    #[tokio::test]
    async fn admin_status_reflects_stored_role() {
        let state = AppState::for_tests();
        state
            .repo::<Users>()
            .insert_one(doc(json!({"email": "boss@x.com", "role": "admin"})))
            .unwrap();

        let Json(status) = admin_status(
            Auth(caller("boss@x.com")),
            State(state.clone()),
            Path("boss@x.com".to_string()),
        )
        .await
        .unwrap();
        assert!(status.admin);

        let Json(status) = admin_status(
            Auth(caller("new@x.com")),
            State(state),
            Path("new@x.com".to_string()),
        )
        .await
        .unwrap();
        assert!(!status.admin);
    }

    #[tokio::test]
    async fn promote_and_delete_report_counts() {
        let state = AppState::for_tests();
        let inserted = state
            .repo::<Users>()
            .insert_one(doc(json!({"email": "u@x.com"})))
            .unwrap();

        let Json(updated) = promote_to_admin(
            AdminOnly(caller("boss@x.com")),
            State(state.clone()),
            Path(inserted.inserted_id.clone()),
        )
        .await
        .unwrap();
        assert_eq!(updated.matched_count, 1);
        assert!(state.repo::<Users>().find_by_email("u@x.com").unwrap().unwrap().is_admin());

        let Json(deleted) = delete_user(
            AdminOnly(caller("boss@x.com")),
            State(state.clone()),
            Path(inserted.inserted_id),
        )
        .await
        .unwrap();
        assert_eq!(deleted.deleted_count, 1);
        assert!(state.repo::<Users>().find_all().unwrap().is_empty());
    }
}
