// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running.
//! Run with: gcloud emulators firestore start, then set FIRESTORE_EMULATOR_HOST.
//!
//! The emulator provides a clean state for each test run.

use eventsnap_session::db::UserRecordStore;
use eventsnap_session::models::{IdentityClaims, Profile, Role, UserRecord};
use eventsnap_session::services::{ReconcileOutcome, RoleReconciler};
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::test_firestore;

/// Unique email per test run.
fn unique_email(tag: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{tag}-{nanos}@example.com")
}

fn identity(email: &str) -> IdentityClaims {
    IdentityClaims {
        subject: format!("sub-{email}"),
        email: email.to_string(),
        display_name: "Test User".to_string(),
        picture_ref: None,
        expires_at: common::now() + 3600,
    }
}

#[tokio::test]
async fn test_upsert_then_both_lookups() {
    require_emulator!();
    let store = test_firestore().await;
    let email = unique_email("lookup");

    assert!(store.get_by_key(&email).await.unwrap().is_none());
    assert!(!store.exists(&email).await.unwrap());

    store
        .upsert(&UserRecord::new(&email, "Ana", "9876543210", Some(Role::Attendee)))
        .await
        .unwrap();

    let by_key = store.get_by_key(&email).await.unwrap().unwrap();
    assert_eq!(by_key.role, Some(Role::Attendee));
    assert_eq!(by_key.mobile, "9876543210");

    let by_query = store.query_by_email(&email).await.unwrap().unwrap();
    assert_eq!(by_query.user_id, email);
}

#[tokio::test]
async fn test_upsert_replaces_in_place() {
    require_emulator!();
    let store = test_firestore().await;
    let email = unique_email("replace");

    store
        .upsert(&UserRecord::new(&email, "Ana", "", Some(Role::Attendee)))
        .await
        .unwrap();
    store
        .upsert(&UserRecord::new(&email, "Ana", "", Some(Role::Organizer)))
        .await
        .unwrap();

    let record = store.get_by_key(&email).await.unwrap().unwrap();
    assert_eq!(record.role, Some(Role::Organizer));
}

#[tokio::test]
async fn test_concurrent_reconcile_against_firestore() {
    require_emulator!();
    let store = Arc::new(test_firestore().await);
    let reconciler = RoleReconciler::new(store.clone(), Duration::from_secs(5));
    let email = unique_email("race");
    let id = identity(&email);
    let profile = Profile::from_claims(&id, "", "");

    let (first, second) = tokio::join!(
        reconciler.reconcile(&id, None, &profile),
        reconciler.reconcile(&id, None, &profile),
    );
    assert_eq!(first.role, Role::Organizer);
    assert_eq!(second.role, Role::Organizer);

    let again = reconciler.reconcile(&id, None, &profile).await;
    assert_eq!(again.outcome, ReconcileOutcome::Existing);
}
