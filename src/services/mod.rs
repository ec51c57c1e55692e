// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - session and aggregation logic.

pub mod attendee;
pub mod client_state;
pub mod deferred;
pub mod matching;
pub mod role_reconciler;
pub mod session;
pub mod token_verifier;

pub use attendee::AttendeeAggregator;
pub use client_state::{ClientStore, CookieClientStore, MemoryClientStore};
pub use deferred::DeferredActionRegistry;
pub use matching::{HttpMatchingService, MatchingService};
pub use role_reconciler::{ReconcileOutcome, Reconciliation, RoleReconciler};
pub use session::{ActionOutcome, SessionManager, SignInForm, SignInOutcome};
pub use token_verifier::TokenVerifier;
