// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the REST API. Stored entities are
//! schema-flexible documents and travel through handlers untyped; only the
//! shapes the server itself inspects or produces are modelled here.
//!
//! ## Model Categories
//!
//! - **Principals**: registered identities and their role
//! - **Tokens**: issuance response and admin self-check
//! - **Tours / Bookings / Reviews**: the few fields handlers read
//! - **Payments**: payment-intent request and response

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use utoipa::{IntoParams, ToSchema};

use crate::auth::Role;
use crate::storage::Document;

// =============================================================================
// Principals
// =============================================================================

/// A registered identity with its stored role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Unique identifier of the principal
    pub email: String,
    /// Stored role; absent or unrecognised values mean `User`
    pub role: Role,
}

impl Principal {
    pub fn from_document(document: &Document) -> Self {
        let text = |field: &str| document.get(field).and_then(Value::as_str);
        Self {
            email: text("email").unwrap_or_default().to_string(),
            role: text("role").and_then(Role::parse).unwrap_or_default(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Returned by `POST /user` when the email is already registered.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserExistsResponse {
    pub message: String,
    pub inserted_id: Option<String>,
}

// =============================================================================
// Tokens
// =============================================================================

/// Response for `POST /jwt`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Signed bearer token, valid for one hour
    pub token: String,
}

/// Response for `GET /user/admin/{key}`.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AdminStatusResponse {
    pub admin: bool,
}

// =============================================================================
// Tours
// =============================================================================

/// Body of `PATCH /tour/{id}`. Every listed field is written; absent
/// fields are stored as null.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTourRequest {
    pub title: Option<Value>,
    pub division: Option<Value>,
    /// Number or numeric string; stored as a float
    pub price: Option<Value>,
    pub deadline: Option<Value>,
    pub places: Option<Value>,
    pub transportation: Option<Value>,
    pub included_item: Option<Value>,
    pub description: Option<Value>,
    pub image: Option<Value>,
}

impl UpdateTourRequest {
    /// Fields to `$set` on the tour document.
    pub fn into_set(self) -> Document {
        let price = self
            .price
            .as_ref()
            .and_then(parse_decimal)
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null);

        let mut set = Document::new();
        let fields = [
            ("title", self.title.unwrap_or(Value::Null)),
            ("division", self.division.unwrap_or(Value::Null)),
            ("price", price),
            ("deadline", self.deadline.unwrap_or(Value::Null)),
            ("places", self.places.unwrap_or(Value::Null)),
            ("transportation", self.transportation.unwrap_or(Value::Null)),
            ("included_item", self.included_item.unwrap_or(Value::Null)),
            ("description", self.description.unwrap_or(Value::Null)),
            ("image", self.image.unwrap_or(Value::Null)),
        ];
        for (field, value) in fields {
            set.insert(field.to_string(), value);
        }
        set
    }
}

/// Read a decimal amount from a JSON number or numeric string.
pub fn parse_decimal(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

// =============================================================================
// Bookings
// =============================================================================

/// Query for `GET /bookings`. `email` wins over `admin`; empty values are
/// ignored.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookingQuery {
    pub email: Option<String>,
    pub admin: Option<String>,
}

// =============================================================================
// Reviews
// =============================================================================

/// Body of `POST /review`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub email: Option<String>,
    pub review: Option<String>,
    #[serde(rename = "userName")]
    pub user_name: Option<Value>,
}

/// Query for `GET /review`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ReviewQuery {
    pub email: Option<String>,
}

// =============================================================================
// Payments
// =============================================================================

/// Body of `POST /create-payment-intent`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentIntentRequest {
    /// Price in major currency units (number or numeric string)
    #[serde(default)]
    pub price: Value,
}

/// Response for `POST /create-payment-intent`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}
