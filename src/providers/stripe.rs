// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stripe integration for card payment intents.
//!
//! Only intent creation is handled; confirmation happens client-side with
//! the returned client secret and no webhooks are consumed.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::info;

pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
pub const PAYMENT_CURRENCY: &str = "usd";
const PAYMENT_METHOD_TYPE: &str = "card";

#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    #[error("Stripe request failed: {0}")]
    Request(String),

    #[error("Stripe returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Stripe response was invalid: {0}")]
    InvalidResponse(String),
}

/// A created payment intent.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub amount: u64,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StripeClient {
    api_base_url: String,
    secret_key: String,
    http: Client,
}

impl StripeClient {
    pub fn new(
        secret_key: impl Into<String>,
        api_base_url: impl Into<String>,
    ) -> Result<Self, StripeError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| StripeError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_base_url: api_base_url.into(),
            secret_key: secret_key.into(),
            http,
        })
    }

    /// Create a card payment intent for `amount` minor units.
    pub async fn create_payment_intent(
        &self,
        amount: u64,
        currency: &str,
    ) -> Result<PaymentIntent, StripeError> {
        let form = [
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
            ("payment_method_types[]", PAYMENT_METHOD_TYPE.to_string()),
        ];

        let response = self
            .http
            .post(format!(
                "{}/v1/payment_intents",
                self.api_base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| StripeError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error.message)
                .unwrap_or(body);
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let intent: PaymentIntent = response
            .json()
            .await
            .map_err(|e| StripeError::InvalidResponse(e.to_string()))?;

        info!(
            payment_intent = %intent.id,
            amount = intent.amount,
            currency = %intent.currency,
            "Stripe payment intent created"
        );

        Ok(intent)
    }
}
