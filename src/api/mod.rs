// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::Role,
    models::{
        AdminStatusResponse, CreateReviewRequest, PaymentIntentRequest, PaymentIntentResponse,
        TokenResponse, UpdateTourRequest, UserExistsResponse,
    },
    state::AppState,
    storage::{DeleteResult, InsertOneResult, UpdateResult},
};

pub mod bookings;
pub mod catalog;
pub mod health;
pub mod payments;
pub mod reviews;
pub mod token;
pub mod tours;
pub mod users;

pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let routes = Router::new()
        .route("/", get(health::banner))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/jwt", post(token::issue_token))
        .route("/user", get(users::list_users).post(users::register_user))
        .route(
            "/user/admin/{key}",
            get(users::admin_status).patch(users::promote_to_admin),
        )
        .route("/user/{id}", delete(users::delete_user))
        .route("/division", get(catalog::list_divisions))
        .route("/guide", get(catalog::list_guides))
        .route("/tour", get(tours::list_tours).post(tours::create_tour))
        .route(
            "/tour/{id}",
            patch(tours::update_tour).delete(tours::delete_tour),
        )
        .route(
            "/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/bookings/{id}", delete(bookings::delete_booking))
        .route(
            "/bookings/admin/{id}",
            delete(bookings::delete_booking_for_event),
        )
        .route(
            "/create-payment-intent",
            post(payments::create_payment_intent),
        )
        .route(
            "/review",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .with_state(state);

    routes
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// CORS restricted to the configured origins, with credentials allowed.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::banner,
        health::liveness,
        health::readiness,
        token::issue_token,
        users::register_user,
        users::list_users,
        users::admin_status,
        users::promote_to_admin,
        users::delete_user,
        catalog::list_divisions,
        catalog::list_guides,
        tours::list_tours,
        tours::create_tour,
        tours::update_tour,
        tours::delete_tour,
        bookings::create_booking,
        bookings::list_bookings,
        bookings::delete_booking,
        bookings::delete_booking_for_event,
        payments::create_payment_intent,
        reviews::create_review,
        reviews::list_reviews
    ),
    components(
        schemas(
            Role,
            TokenResponse,
            AdminStatusResponse,
            UserExistsResponse,
            users::RegisterResponse,
            UpdateTourRequest,
            CreateReviewRequest,
            PaymentIntentRequest,
            PaymentIntentResponse,
            InsertOneResult,
            UpdateResult,
            DeleteResult,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Banner and probes"),
        (name = "Auth", description = "Bearer token issuance"),
        (name = "Users", description = "Principal registration and roles"),
        (name = "Catalog", description = "Guides and divisions"),
        (name = "Tours", description = "Tour listings"),
        (name = "Bookings", description = "Tour bookings"),
        (name = "Payments", description = "Card payment intents"),
        (name = "Reviews", description = "Traveller reviews")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Map, Value};
    use tower::ServiceExt;

    use crate::auth::TokenService;
    use crate::storage::{
        filter_eq, Document, DocumentStore, Entity, Filter, InMemoryStore, StoreResult, Users,
    };

    /// Store wrapper that counts every gateway call.
    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryStore,
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn tick(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl DocumentStore for CountingStore {
        fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
            self.tick();
            self.inner.find(collection, filter)
        }

        fn insert_one(
            &self,
            collection: &str,
            document: Document,
        ) -> StoreResult<InsertOneResult> {
            self.tick();
            self.inner.insert_one(collection, document)
        }

        fn insert_one_unless(
            &self,
            collection: &str,
            guard: &Filter,
            document: Document,
        ) -> StoreResult<Option<InsertOneResult>> {
            self.tick();
            self.inner.insert_one_unless(collection, guard, document)
        }

        fn update_one(
            &self,
            collection: &str,
            filter: &Filter,
            set: &Document,
            upsert: bool,
        ) -> StoreResult<UpdateResult> {
            self.tick();
            self.inner.update_one(collection, filter, set, upsert)
        }

        fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<DeleteResult> {
            self.tick();
            self.inner.delete_one(collection, filter)
        }

        fn ping(&self) -> StoreResult<()> {
            self.inner.ping()
        }
    }

    const ORIGIN: &str = "http://localhost:5173";

    struct TestApp {
        app: Router,
        store: Arc<CountingStore>,
        tokens: TokenService,
    }

    impl TestApp {
        fn new() -> Self {
            let store = Arc::new(CountingStore::default());
            let state = AppState::new(store.clone(), TokenService::new("test-secret"));
            Self {
                app: router(state, &[ORIGIN.to_string()]),
                store,
                tokens: TokenService::new("test-secret"),
            }
        }

        fn register(&self, email: &str, role: Option<&str>) -> String {
            let mut user = json!({ "email": email });
            if let Some(role) = role {
                user["role"] = json!(role);
            }
            self.store
                .inner
                .insert_one("user", user.as_object().cloned().unwrap())
                .unwrap()
                .inserted_id
        }

        fn token(&self, email: &str) -> String {
            self.tokens.issue(payload(email)).unwrap()
        }

        async fn send(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> Response {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
            }
            let body = match body {
                Some(value) => {
                    builder = builder.header(CONTENT_TYPE, "application/json");
                    Body::from(value.to_string())
                }
                None => Body::empty(),
            };
            self.app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
        }
    }

    fn payload(email: &str) -> Map<String, Value> {
        json!({ "email": email }).as_object().cloned().unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn banner_is_served_at_root() {
        let app = TestApp::new();
        let response = app.send(Method::GET, "/", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], health::BANNER.as_bytes());
    }

    #[tokio::test]
    async fn admin_route_without_token_never_touches_storage() {
        let app = TestApp::new();
        let response = app.send(Method::GET, "/user", None, None).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(app.store.calls(), 0);
    }

    #[tokio::test]
    async fn expired_and_foreign_tokens_get_the_same_401() {
        let app = TestApp::new();
        app.register("boss@x.com", Some("admin"));

        let expired = app
            .tokens
            .issue_at(payload("boss@x.com"), chrono::Utc::now().timestamp() - 7200)
            .unwrap();
        let foreign = TokenService::new("other-secret").issue(payload("boss@x.com")).unwrap();

        let first = app.send(Method::GET, "/user", Some(&expired), None).await;
        let second = app.send(Method::GET, "/user", Some(&foreign), None).await;
        assert_eq!(first.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(second.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(first).await, body_json(second).await);
        assert_eq!(app.store.calls(), 0);
    }

    #[tokio::test]
    async fn non_admin_is_forbidden_after_one_lookup() {
        let app = TestApp::new();
        app.register("u@x.com", None);
        let token = app.token("u@x.com");

        let response = app.send(Method::GET, "/user", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(app.store.calls(), 1);
    }

    #[tokio::test]
    async fn admin_reaches_handler_with_one_operation_beyond_lookup() {
        let app = TestApp::new();
        app.register("boss@x.com", Some("admin"));
        app.register("u@x.com", None);
        let token = app.token("boss@x.com");

        let response = app.send(Method::GET, "/user", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(app.store.calls(), 2);
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn demotion_applies_to_the_next_request() {
        let app = TestApp::new();
        app.register("boss@x.com", Some("admin"));
        let token = app.token("boss@x.com");

        let before = app.send(Method::GET, "/user", Some(&token), None).await;
        assert_eq!(before.status(), StatusCode::OK);

        let mut set = Document::new();
        set.insert("role".to_string(), json!("user"));
        app.store
            .inner
            .update_one(Users::COLLECTION, &filter_eq("email", "boss@x.com"), &set, false)
            .unwrap();

        let after = app.send(Method::GET, "/user", Some(&token), None).await;
        assert_eq!(after.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_self_check_requires_matching_email() {
        let app = TestApp::new();
        app.register("boss@x.com", Some("admin"));
        let token = app.token("boss@x.com");

        let mismatch = app
            .send(Method::GET, "/user/admin/other@x.com", Some(&token), None)
            .await;
        assert_eq!(mismatch.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(mismatch).await,
            json!({ "message": "Access Unauthorized" })
        );

        let own = app
            .send(Method::GET, "/user/admin/boss@x.com", Some(&token), None)
            .await;
        assert_eq!(own.status(), StatusCode::OK);
        assert_eq!(body_json(own).await, json!({ "admin": true }));

        let plain = app.token("new@x.com");
        let response = app
            .send(Method::GET, "/user/admin/new@x.com", Some(&plain), None)
            .await;
        assert_eq!(body_json(response).await, json!({ "admin": false }));
    }

    #[tokio::test]
    async fn promotion_and_deletion_are_admin_gated() {
        let app = TestApp::new();
        let id = app.register("u@x.com", None);
        let user_token = app.token("u@x.com");

        let anonymous = app
            .send(Method::PATCH, &format!("/user/admin/{id}"), None, None)
            .await;
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let self_promotion = app
            .send(Method::PATCH, &format!("/user/admin/{id}"), Some(&user_token), None)
            .await;
        assert_eq!(self_promotion.status(), StatusCode::FORBIDDEN);

        let delete = app
            .send(Method::DELETE, &format!("/user/{id}"), Some(&user_token), None)
            .await;
        assert_eq!(delete.status(), StatusCode::FORBIDDEN);

        app.register("boss@x.com", Some("admin"));
        let admin_token = app.token("boss@x.com");
        let promoted = app
            .send(Method::PATCH, &format!("/user/admin/{id}"), Some(&admin_token), None)
            .await;
        assert_eq!(promoted.status(), StatusCode::OK);
        assert_eq!(body_json(promoted).await["modifiedCount"], 1);
    }

    #[tokio::test]
    async fn issued_token_opens_the_self_check() {
        let app = TestApp::new();
        let issued = app
            .send(Method::POST, "/jwt", None, Some(json!({ "email": "a@x.com" })))
            .await;
        assert_eq!(issued.status(), StatusCode::OK);
        let token = body_json(issued).await["token"].as_str().unwrap().to_string();

        let response = app
            .send(Method::GET, "/user/admin/a@x.com", Some(&token), None)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn review_without_required_fields_is_400() {
        let app = TestApp::new();
        let response = app
            .send(Method::POST, "/review", None, Some(json!({ "email": "a@x.com" })))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Email and review are required fields" })
        );
        assert_eq!(app.store.calls(), 0);
    }

    #[tokio::test]
    async fn payment_intent_without_provider_is_503() {
        let app = TestApp::new();
        let response = app
            .send(Method::POST, "/create-payment-intent", None, Some(json!({ "price": 20 })))
            .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn responses_carry_request_id_and_cors_headers() {
        let app = TestApp::new();
        let request = Request::builder()
            .uri("/tour")
            .header("origin", ORIGIN)
            .body(Body::empty())
            .unwrap();
        let response = app.app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            ORIGIN
        );
        assert_eq!(
            response.headers()["access-control-allow-credentials"],
            "true"
        );
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = TestApp::new();
        let response = app.send(Method::GET, "/api-doc/openapi.json", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let doc = body_json(response).await;
        let admin = &doc["paths"]["/user/admin/{key}"];
        assert!(admin.get("get").is_some());
        assert!(admin.get("patch").is_some());
        assert!(doc["paths"].get("/user/admin/{email}").is_none());
        assert!(doc["paths"].get("/user/admin/{id}").is_none());
    }
}
