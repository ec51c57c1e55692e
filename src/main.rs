// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! EventSnap session API server
//!
//! Serves sign-in, session and attendee dashboard endpoints for the
//! frontend shell.

use eventsnap_session::{
    config::Config,
    db::{FirestoreUserStore, MemoryUserStore, UserRecordStore},
    services::{AttendeeAggregator, HttpMatchingService, RoleReconciler, TokenVerifier},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting EventSnap session API");

    let store: Arc<dyn UserRecordStore> = match &config.gcp_project_id {
        Some(project_id) => Arc::new(FirestoreUserStore::new(project_id).await?),
        None => {
            tracing::warn!("GCP_PROJECT_ID not set, keeping user records in memory");
            Arc::new(MemoryUserStore::new())
        }
    };

    let matching = HttpMatchingService::new(&config.matching_service_url, config.remote_timeout)?;
    tracing::info!(
        url = %config.matching_service_url,
        timeout_ms = config.remote_timeout.as_millis() as u64,
        "Matching service client initialized"
    );

    let state = Arc::new(AppState {
        verifier: Arc::new(TokenVerifier::new()),
        reconciler: Arc::new(RoleReconciler::new(store, config.remote_timeout)),
        aggregator: AttendeeAggregator::new(Arc::new(matching), config.remote_timeout),
        config: config.clone(),
    });

    let app = eventsnap_session::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("eventsnap_session=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
