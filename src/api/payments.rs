// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Card payment intent creation.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::{
    error::ApiError,
    models::{parse_decimal, PaymentIntentRequest, PaymentIntentResponse},
    providers::stripe::PAYMENT_CURRENCY,
    state::AppState,
};

/// Convert a price in major units to a positive amount in minor units.
fn minor_units(price: &Value) -> Option<u64> {
    let cents = (parse_decimal(price)? * 100.0).round();
    (cents >= 1.0 && cents <= u64::MAX as f64).then_some(cents as u64)
}

/// Create a card payment intent for the posted price.
///
/// Returns the client secret the browser uses to confirm the payment.
#[utoipa::path(
    post,
    path = "/create-payment-intent",
    tag = "Payments",
    request_body = PaymentIntentRequest,
    responses(
        (status = 200, body = PaymentIntentResponse),
        (status = 400, description = "Price missing, non-numeric or not positive"),
        (status = 502, description = "Payment provider request failed"),
        (status = 503, description = "Payments are not configured")
    )
)]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(request): Json<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, ApiError> {
    let payments = state
        .payments
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Payments are not configured"))?;

    let amount = minor_units(&request.price)
        .ok_or_else(|| ApiError::bad_request("price must be a positive number"))?;
    tracing::info!(amount, "Creating payment intent");

    let intent = payments.create_payment_intent(amount, PAYMENT_CURRENCY).await?;
    let client_secret = intent.client_secret.ok_or_else(|| {
        tracing::error!(payment_intent = %intent.id, "Payment intent has no client secret");
        ApiError::bad_gateway("Payment provider request failed")
    })?;

    Ok(Json(PaymentIntentResponse { client_secret }))
}
