// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! EventSnap session service
//!
//! Session and role reconciliation for the event photo-sharing frontend:
//! sign-in with deferred-action resume, idempotent role assignment against
//! the user record store, and fail-soft attendee dashboard aggregation.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use axum_extra::extract::cookie::CookieJar;
use config::Config;
use services::{AttendeeAggregator, CookieClientStore, RoleReconciler, SessionManager, TokenVerifier};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub verifier: Arc<TokenVerifier>,
    pub reconciler: Arc<RoleReconciler>,
    pub aggregator: AttendeeAggregator,
}

impl AppState {
    /// Session manager over the cookies of one request.
    pub fn session(&self, jar: CookieJar) -> SessionManager<CookieClientStore> {
        SessionManager::new(
            CookieClientStore::new(jar, self.config.cookie_secure),
            self.verifier.clone(),
            self.reconciler.clone(),
        )
    }
}
