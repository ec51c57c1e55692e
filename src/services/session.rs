// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lifecycle: hydrate, sign in, sign out.
//!
//! A [`SessionManager`] owns one client's session state together with that
//! client's persisted state, and is driven from a single task. All state
//! changes go through the transitions below.

use crate::error::SessionError;
use crate::models::{FollowUp, IdentityClaims, PendingIntent, Profile, SessionSnapshot, SessionState};
use crate::services::client_state::{self, ClientStore};
use crate::services::deferred::DeferredActionRegistry;
use crate::services::role_reconciler::{Reconciliation, RoleReconciler};
use crate::services::token_verifier::TokenVerifier;
use serde::Deserialize;
use std::sync::Arc;
use validator::{Validate, ValidationError};

/// Details the user enters alongside the provider sign-in.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignInForm {
    /// Display name; the provider's name is used when blank
    #[serde(default)]
    #[validate(length(max = 100))]
    pub name: String,
    /// Optional 10-digit mobile number
    #[serde(default)]
    #[validate(custom(function = "validate_mobile"))]
    pub mobile: String,
}

fn validate_mobile(mobile: &str) -> Result<(), ValidationError> {
    let mobile = mobile.trim();
    if mobile.is_empty() || (mobile.len() == 10 && mobile.chars().all(|c| c.is_ascii_digit())) {
        return Ok(());
    }
    Err(ValidationError::new("mobile")
        .with_message("Please enter a valid 10-digit mobile number".into()))
}

/// Outcome of a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignInOutcome {
    pub reconciliation: Reconciliation,
    /// Intent deferred before sign-in, taken exactly once
    pub resume: Option<PendingIntent>,
}

/// What the UI shell should do after requesting an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Show sign-in; any deferred intent has been stored.
    SignInRequired,
    Proceed(FollowUp),
}

/// Result of checking a persisted snapshot, without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hydration {
    /// Nothing persisted.
    Empty,
    /// Persisted state is expired or corrupt and must be purged.
    Stale(String),
    /// A still-valid identity with its profile.
    Valid {
        identity: IdentityClaims,
        profile: Profile,
    },
}

/// Decide what a persisted snapshot is worth at time `now`.
pub fn hydrate_snapshot(
    snapshot: &SessionSnapshot,
    verifier: &TokenVerifier,
    now: i64,
) -> Hydration {
    let Some(token) = snapshot.token.as_deref() else {
        return match snapshot.profile {
            Some(_) => Hydration::Stale("profile without token".to_string()),
            None => Hydration::Empty,
        };
    };

    let identity = match verifier.verify(token) {
        Ok(identity) => identity,
        Err(e) => return Hydration::Stale(e.to_string()),
    };

    if identity.is_expired(now) {
        return Hydration::Stale(SessionError::ExpiredSession.to_string());
    }

    match &snapshot.profile {
        Some(profile) if profile.email == identity.email => Hydration::Valid {
            identity,
            profile: profile.clone(),
        },
        Some(_) => Hydration::Stale("profile does not match token".to_string()),
        None => Hydration::Stale("token without profile".to_string()),
    }
}

/// Owns one client's session.
pub struct SessionManager<C: ClientStore> {
    store: C,
    verifier: Arc<TokenVerifier>,
    reconciler: Arc<RoleReconciler>,
    state: SessionState,
}

impl<C: ClientStore> SessionManager<C> {
    /// Start anonymous; call [`hydrate`](Self::hydrate) to restore a persisted session.
    pub fn new(store: C, verifier: Arc<TokenVerifier>, reconciler: Arc<RoleReconciler>) -> Self {
        Self {
            store,
            verifier,
            reconciler,
            state: SessionState::anonymous(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &C {
        &self.store
    }

    /// Give back the client store so it can be written to the response.
    pub fn into_store(self) -> C {
        self.store
    }

    /// Restore a session from persisted client state.
    ///
    /// Expired or corrupt state is purged; the session stays anonymous.
    pub async fn hydrate(&mut self, now: i64) -> &SessionState {
        if self.state.is_authenticated() {
            return &self.state;
        }

        let snapshot = client_state::read_snapshot(&self.store);
        match hydrate_snapshot(&snapshot, &self.verifier, now) {
            Hydration::Empty => {}
            Hydration::Stale(reason) => {
                tracing::info!(reason = %reason, "Purging stale persisted session");
                client_state::purge_snapshot(&mut self.store);
            }
            Hydration::Valid { identity, profile } => {
                let reconciliation = self.reconciler.reconcile(&identity, None, &profile).await;
                tracing::debug!(
                    email = %identity.email,
                    role = %reconciliation.role,
                    "Session hydrated"
                );
                self.state = SessionState::authenticated(identity, reconciliation.role, profile);
            }
        }

        &self.state
    }

    /// Complete a provider sign-in.
    ///
    /// On failure nothing is persisted and the session is left as it was.
    /// On success the pending intent, if any, is taken and returned.
    pub async fn sign_in(
        &mut self,
        assertion: &str,
        form: &SignInForm,
        now: i64,
    ) -> Result<SignInOutcome, SessionError> {
        form.validate()
            .map_err(|e| SessionError::InvalidSignInForm(e.to_string()))?;

        let identity = self
            .verifier
            .verify(assertion)
            .map_err(|e| SessionError::SignInFailed(e.to_string()))?;

        if identity.is_expired(now) {
            return Err(SessionError::SignInFailed(
                "assertion already expired".to_string(),
            ));
        }

        let profile = Profile::from_claims(&identity, &form.name, &form.mobile);
        let intent = DeferredActionRegistry::new(&mut self.store).peek();

        let reconciliation = self
            .reconciler
            .reconcile(&identity, intent, &profile)
            .await;

        client_state::write_snapshot(&mut self.store, assertion.trim(), &profile)
            .map_err(|e| SessionError::SignInFailed(format!("cannot persist profile: {e}")))?;

        tracing::info!(
            email = %identity.email,
            role = %reconciliation.role,
            outcome = ?reconciliation.outcome,
            "Signed in"
        );
        self.state = SessionState::authenticated(identity, reconciliation.role, profile);

        let resume = DeferredActionRegistry::new(&mut self.store).take_if_present();
        if let Some(intent) = resume {
            tracing::info!(intent = intent.as_str(), "Resuming deferred action");
        }

        Ok(SignInOutcome {
            reconciliation,
            resume,
        })
    }

    /// End the session and clear everything persisted for this client.
    ///
    /// Works without hydrating first; the user record store is not touched.
    pub fn sign_out(&mut self) {
        let email = match self.state.email() {
            Some(email) => Some(email.to_string()),
            None => client_state::read_snapshot(&self.store)
                .profile
                .map(|p| p.email),
        };
        if let Some(email) = email {
            tracing::info!(email = %email, "Signed out");
        }
        client_state::clear_all(&mut self.store);
        self.state = SessionState::anonymous();
    }

    /// The user asked to create an event.
    ///
    /// Signed in: the user is made an organizer and the create dialog opens.
    /// Anonymous: the intent is deferred until sign-in completes.
    pub async fn request_create_event(&mut self) -> ActionOutcome {
        let (Some(identity), Some(profile)) = (self.state.identity(), self.state.profile()) else {
            DeferredActionRegistry::new(&mut self.store).set(PendingIntent::CreateEvent);
            return ActionOutcome::SignInRequired;
        };

        let reconciliation = self
            .reconciler
            .promote_to_organizer(identity, profile)
            .await;

        let identity = identity.clone();
        let profile = profile.clone();
        self.state = SessionState::authenticated(identity, reconciliation.role, profile);

        ActionOutcome::Proceed(FollowUp::OpenCreateEvent)
    }

    /// The user asked for their photos. Nothing is deferred for this action.
    ///
    /// An unhydrated manager checks the persisted snapshot directly, without
    /// reconciling the role.
    pub fn request_get_photos(&self, now: i64) -> ActionOutcome {
        let signed_in = self.state.is_authenticated()
            || matches!(
                hydrate_snapshot(&client_state::read_snapshot(&self.store), &self.verifier, now),
                Hydration::Valid { .. }
            );

        if signed_in {
            ActionOutcome::Proceed(FollowUp::UploadSelfie)
        } else {
            ActionOutcome::SignInRequired
        }
    }
}
