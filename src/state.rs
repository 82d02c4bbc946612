// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenService;
use crate::providers::StripeClient;
use crate::storage::{DocumentStore, Entity, Repository};

/// Process-scoped resources shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub tokens: Arc<TokenService>,
    /// Absent when no payment secret key is configured
    pub payments: Option<Arc<StripeClient>>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, tokens: TokenService) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            payments: None,
        }
    }

    pub fn with_payments(mut self, client: StripeClient) -> Self {
        self.payments = Some(Arc::new(client));
        self
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Repository for entity `E` over the shared store.
    pub fn repo<E: Entity>(&self) -> Repository<'_, E> {
        Repository::new(self.store())
    }

    /// In-memory state with a fixed signing secret.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::new(
            Arc::new(crate::storage::InMemoryStore::new()),
            TokenService::new("test-secret"),
        )
    }
}
