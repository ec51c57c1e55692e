// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use eventsnap_session::config::Config;
use eventsnap_session::db::{FirestoreUserStore, MemoryUserStore, UserRecordStore};
use eventsnap_session::error::{MatchingError, StoreError};
use eventsnap_session::models::{Event, MatchedPhoto, UserRecord};
use eventsnap_session::routes::create_router;
use eventsnap_session::services::{
    AttendeeAggregator, MatchingService, RoleReconciler, TokenVerifier,
};
use eventsnap_session::AppState;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const TIMEOUT: Duration = Duration::from_millis(200);

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test Firestore store (emulator).
#[allow(dead_code)]
pub async fn test_firestore() -> FirestoreUserStore {
    FirestoreUserStore::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

#[allow(dead_code)]
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Build a provider assertion. The signature is never checked.
#[allow(dead_code)]
pub fn assertion(email: &str, exp: i64) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        &json!({
            "sub": format!("sub-{email}"),
            "email": email,
            "name": "Test User",
            "picture": "https://cdn.example.com/p.png",
            "exp": exp,
            "iss": "https://accounts.google.com",
            "aud": "client-id",
        }),
        &EncodingKey::from_secret(b"not-the-provider-key"),
    )
    .expect("Failed to encode assertion")
}

/// Assertion valid for another hour.
#[allow(dead_code)]
pub fn fresh_assertion(email: &str) -> String {
    assertion(email, now() + 3600)
}

/// Memory store with switchable failures.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct FlakyStore {
    pub inner: MemoryUserStore,
    pub fail_primary: Arc<AtomicBool>,
    pub fail_secondary: Arc<AtomicBool>,
    pub fail_upsert: Arc<AtomicBool>,
    /// Primary lookup misses even when the record exists (lagging index)
    pub primary_blind: Arc<AtomicBool>,
    /// Upserts report success without storing anything
    pub drop_writes: Arc<AtomicBool>,
    /// Primary lookups never finish
    pub hang_primary: Arc<AtomicBool>,
    pub upserts: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(flag: &AtomicBool, value: bool) {
        flag.store(value, Ordering::SeqCst);
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub async fn seed(&self, record: UserRecord) {
        self.inner.upsert(&record).await.unwrap();
    }
}

#[async_trait]
impl UserRecordStore for FlakyStore {
    async fn get_by_key(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        if self.hang_primary.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        if self.fail_primary.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("primary down".to_string()));
        }
        if self.primary_blind.load(Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.get_by_key(email).await
    }

    async fn query_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        if self.fail_secondary.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("secondary down".to_string()));
        }
        self.inner.query_by_email(email).await
    }

    async fn upsert(&self, record: &UserRecord) -> Result<(), StoreError> {
        if self.fail_upsert.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("write rejected".to_string()));
        }
        self.upserts.fetch_add(1, Ordering::SeqCst);
        if self.drop_writes.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.inner.upsert(record).await
    }
}

#[allow(dead_code)]
pub fn reconciler(store: &FlakyStore) -> Arc<RoleReconciler> {
    Arc::new(RoleReconciler::new(Arc::new(store.clone()), TIMEOUT))
}

/// Behaviour of one scripted matching-service read.
#[allow(dead_code)]
#[derive(Clone)]
pub enum Script<T> {
    Ok(T),
    Fail,
    Hang,
}

impl<T: Clone> Script<T> {
    #[allow(dead_code)]
    async fn run(&self) -> Result<T, MatchingError> {
        match self {
            Script::Ok(value) => Ok(value.clone()),
            Script::Fail => Err(MatchingError::Status {
                status: 502,
                body: "upstream exploded".to_string(),
            }),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(MatchingError::Request("unreachable".to_string()))
            }
        }
    }
}

/// Matching service returning canned results.
#[allow(dead_code)]
#[derive(Clone)]
pub struct ScriptedMatching {
    pub selfie: Script<Option<String>>,
    pub events: Script<Vec<Event>>,
    pub photos: Script<Vec<MatchedPhoto>>,
}

#[allow(dead_code)]
impl ScriptedMatching {
    pub fn healthy() -> Self {
        Self {
            selfie: Script::Ok(Some("https://cdn.example.com/selfie.jpg".to_string())),
            events: Script::Ok(vec![sample_event("e1"), sample_event("e2")]),
            photos: Script::Ok(vec![sample_photo("p1", "e1")]),
        }
    }
}

#[async_trait]
impl MatchingService for ScriptedMatching {
    async fn get_selfie(&self, _email: &str) -> Result<Option<String>, MatchingError> {
        self.selfie.run().await
    }

    async fn get_attended_events(&self, _email: &str) -> Result<Vec<Event>, MatchingError> {
        self.events.run().await
    }

    async fn get_matched_photos(&self, _email: &str) -> Result<Vec<MatchedPhoto>, MatchingError> {
        self.photos.run().await
    }
}

#[allow(dead_code)]
pub fn sample_event(id: &str) -> Event {
    Event {
        event_id: id.to_string(),
        name: format!("Event {id}"),
        date: "2025-03-01".to_string(),
        thumbnail_ref: format!("https://cdn.example.com/{id}/thumb.jpg"),
    }
}

#[allow(dead_code)]
pub fn sample_photo(id: &str, event_id: &str) -> MatchedPhoto {
    MatchedPhoto {
        image_id: id.to_string(),
        event_id: event_id.to_string(),
        event_name: format!("Event {event_id}"),
        image_ref: format!("https://cdn.example.com/{event_id}/{id}.jpg"),
        matched_date: "2025-03-02".to_string(),
    }
}

/// Create a test app over the given store and matching service.
#[allow(dead_code)]
pub fn create_test_app(
    store: &FlakyStore,
    matching: ScriptedMatching,
) -> (axum::Router, Arc<AppState>) {
    create_test_app_with_frontend_url(store, matching, "http://localhost:5173")
}

/// Create a test app with a specific frontend URL (CORS origin).
#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(
    store: &FlakyStore,
    matching: ScriptedMatching,
    frontend_url: &str,
) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.frontend_url = frontend_url.to_string();

    let state = Arc::new(AppState {
        verifier: Arc::new(TokenVerifier::new()),
        reconciler: reconciler(store),
        aggregator: AttendeeAggregator::new(Arc::new(matching), TIMEOUT),
        config,
    });

    (create_router(state.clone()), state)
}
