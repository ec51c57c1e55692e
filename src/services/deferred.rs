// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registry for the single action deferred across a sign-in redirect.

use crate::models::PendingIntent;
use crate::services::client_state::{keys, ClientStore};

/// At most one pending intent, stored in persisted client state.
///
/// `set` overwrites (last wins). `take_if_present` reads and deletes, so the
/// intent resumes at most once.
pub struct DeferredActionRegistry<'a, C: ClientStore + ?Sized> {
    store: &'a mut C,
}

impl<'a, C: ClientStore + ?Sized> DeferredActionRegistry<'a, C> {
    pub fn new(store: &'a mut C) -> Self {
        Self { store }
    }

    pub fn set(&mut self, intent: PendingIntent) {
        tracing::debug!(intent = intent.as_str(), "Deferring action until sign-in");
        self.store
            .set(keys::PENDING_INTENT, intent.as_str().to_string());
    }

    /// Read the pending intent without consuming it.
    pub fn peek(&self) -> Option<PendingIntent> {
        self.store
            .get(keys::PENDING_INTENT)
            .and_then(|raw| PendingIntent::from_stored(&raw))
    }

    /// Remove and return the pending intent.
    pub fn take_if_present(&mut self) -> Option<PendingIntent> {
        let raw = self.store.get(keys::PENDING_INTENT)?;
        self.store.remove(keys::PENDING_INTENT);

        let intent = PendingIntent::from_stored(&raw);
        if intent.is_none() {
            tracing::warn!(stored = %raw, "Dropping unrecognized pending intent");
        }
        intent
    }
}
