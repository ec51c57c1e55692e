// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attendee dashboard routes (require a session).

use crate::middleware::auth::AuthUser;
use crate::models::AttendeeView;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use std::sync::Arc;

/// The session middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/attendee/dashboard", get(get_dashboard))
}

/// Selfie, attended events and matched photos for the signed-in attendee.
///
/// Always 200; failed slices are empty and listed in `degraded`.
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<AttendeeView> {
    Json(state.aggregator.aggregate(user.email()).await)
}
