// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment at startup. A `.env` file in
//! the working directory is loaded first when present.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `4321` |
//! | `SECRET_TOKEN` | HMAC secret for bearer tokens | Required |
//! | `PAYMENT_SECRET_KEY` | Stripe secret key | Optional (payments disabled) |
//! | `PAYMENT_API_BASE_URL` | Stripe API base URL | `https://api.stripe.com` |
//! | `DATABASE_PATH` | Document store file | `data/travel-beyond.redb` |
//! | `CORS_ORIGINS` | Comma-separated allowed origins | `http://localhost:5173` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;

use crate::providers::stripe::DEFAULT_API_BASE_URL;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const SECRET_TOKEN_ENV: &str = "SECRET_TOKEN";
pub const PAYMENT_SECRET_KEY_ENV: &str = "PAYMENT_SECRET_KEY";
pub const PAYMENT_API_BASE_URL_ENV: &str = "PAYMENT_API_BASE_URL";
pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";
pub const CORS_ORIGINS_ENV: &str = "CORS_ORIGINS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 4321;
pub const DEFAULT_DATABASE_PATH: &str = "data/travel-beyond.redb";
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub token_secret: String,
    pub payment_secret_key: Option<String>,
    pub payment_api_base_url: String,
    pub database_path: PathBuf,
    pub allowed_origins: Vec<String>,
    pub json_logs: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let token_secret = get(SECRET_TOKEN_ENV).ok_or(ConfigError::Missing(SECRET_TOKEN_ENV))?;

        let allowed_origins = get(CORS_ORIGINS_ENV)
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            token_secret,
            payment_secret_key: get(PAYMENT_SECRET_KEY_ENV),
            payment_api_base_url: get(PAYMENT_API_BASE_URL_ENV)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            database_path: get(DATABASE_PATH_ENV)
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string())
                .into(),
            allowed_origins,
            json_logs: get(LOG_FORMAT_ENV).is_some_and(|f| f.eq_ignore_ascii_case("json")),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
