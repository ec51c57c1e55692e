// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie authentication middleware.

use crate::models::IdentityClaims;
use crate::services::client_state::{self, CookieClientStore};
use crate::services::session::{hydrate_snapshot, Hydration};
use crate::time_utils::now_unix_secs;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Authenticated identity extracted from the session cookies.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity: IdentityClaims,
}

impl AuthUser {
    pub fn email(&self) -> &str {
        &self.identity.email
    }
}

/// Middleware that requires a valid, unexpired persisted session.
///
/// Only decodes the stored token; the role is not reconciled here.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let store = CookieClientStore::new(jar, state.config.cookie_secure);
    let snapshot = client_state::read_snapshot(&store);

    match hydrate_snapshot(&snapshot, &state.verifier, now_unix_secs()) {
        Hydration::Valid { identity, .. } => {
            request.extensions_mut().insert(AuthUser { identity });
            Ok(next.run(request).await)
        }
        Hydration::Empty | Hydration::Stale(_) => Err(StatusCode::UNAUTHORIZED),
    }
}
