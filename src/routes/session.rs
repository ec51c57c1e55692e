// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session routes: hydrate, sign in, sign out, and intent-gated actions.
//!
//! Persisted client state (token, profile, pending intent) travels in
//! cookies; every handler hands the updated jar back with its response.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::models::{Role, SessionState, SessionStatus};
use crate::services::session::{ActionOutcome, SignInForm};
use crate::time_utils::{format_utc_rfc3339, now_unix_secs};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/session", get(get_session))
        .route("/session/sign-in", post(sign_in))
        .route("/session/sign-out", post(sign_out))
        .route("/actions/create-event", post(create_event))
        .route("/actions/get-photos", post(get_photos))
}

/// Current session as seen by the UI shell.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub status: SessionStatus,
    pub is_authenticated: bool,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub role: Option<Role>,
    /// Token expiry (RFC3339)
    pub expires_at: Option<String>,
}

impl From<&SessionState> for SessionResponse {
    fn from(session: &SessionState) -> Self {
        let expires_at = session
            .identity()
            .and_then(|i| chrono::DateTime::from_timestamp(i.expires_at, 0))
            .map(format_utc_rfc3339);

        Self {
            status: session.status(),
            is_authenticated: session.is_authenticated(),
            email: session.email().map(str::to_string),
            name: session.profile().map(|p| p.name.clone()),
            picture: session.profile().and_then(|p| p.picture.clone()),
            role: session.role(),
            expires_at,
        }
    }
}

/// Sign-in request: the provider credential plus the sign-in form.
#[derive(Deserialize)]
pub struct SignInRequest {
    credential: String,
    #[serde(flatten)]
    form: SignInForm,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub session: SessionResponse,
    /// Where to navigate to resume the action deferred before sign-in
    pub resume: Option<String>,
}

/// Next step after requesting an action.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub sign_in_required: bool,
    pub redirect: Option<String>,
}

impl From<ActionOutcome> for ActionResponse {
    fn from(outcome: ActionOutcome) -> Self {
        match outcome {
            ActionOutcome::SignInRequired => Self {
                sign_in_required: true,
                redirect: None,
            },
            ActionOutcome::Proceed(follow_up) => Self {
                sign_in_required: false,
                redirect: Some(follow_up.path().to_string()),
            },
        }
    }
}

/// Restore the session from cookies.
async fn get_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<SessionResponse>) {
    let mut session = state.session(jar);
    session.hydrate(now_unix_secs()).await;

    let body = SessionResponse::from(session.state());
    (session.into_store().into_jar(), Json(body))
}

/// Complete a provider sign-in and resume any deferred action.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: std::result::Result<Json<SignInRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<SignInResponse>)> {
    let Json(request) = request.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let mut session = state.session(jar);
    let outcome = session
        .sign_in(&request.credential, &request.form, now_unix_secs())
        .await?;

    let body = SignInResponse {
        session: SessionResponse::from(session.state()),
        resume: outcome
            .resume
            .map(|intent| intent.follow_up().path().to_string()),
    };

    Ok((session.into_store().into_jar(), Json(body)))
}

/// Sign out and clear all session cookies. No role reconciliation happens here.
async fn sign_out(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<SessionResponse>) {
    let mut session = state.session(jar);
    session.sign_out();

    let body = SessionResponse::from(session.state());
    (session.into_store().into_jar(), Json(body))
}

/// Create-event button: promote if signed in, else defer until sign-in.
async fn create_event(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<ActionResponse>) {
    let mut session = state.session(jar);
    session.hydrate(now_unix_secs()).await;
    let outcome = session.request_create_event().await;

    (
        session.into_store().into_jar(),
        Json(ActionResponse::from(outcome)),
    )
}

/// Get-photos button: selfie upload if signed in, else sign-in.
async fn get_photos(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<ActionResponse>) {
    let session = state.session(jar);
    let outcome = session.request_get_photos(now_unix_secs());

    (
        session.into_store().into_jar(),
        Json(ActionResponse::from(outcome)),
    )
}
