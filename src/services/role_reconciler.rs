// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role reconciliation: read, decide, write, verify.
//!
//! Consistency level is last-write-wins per email. Two concurrent first
//! sign-ins for the same email may both upsert; the store keeps one record
//! and whichever write lands last decides the stored role.

use crate::db::UserRecordStore;
use crate::error::StoreError;
use crate::models::{IdentityClaims, PendingIntent, Profile, Role, UserRecord};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Role given to users without one. Also used when no intent is pending so
/// that a reconciled session always carries a role.
pub const DEFAULT_ROLE: Role = Role::Organizer;

/// How a reconciliation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The stored role was returned unchanged; nothing was written.
    Existing,
    /// A derived role was written and read back.
    Created,
    /// The role was explicitly raised to organizer and read back.
    Promoted,
    /// The write went through but the read-back did not confirm it.
    Unverified,
    /// The store could not be read or written; the role is local only.
    Pending,
}

/// Result of a reconciliation: the role to use for this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    pub role: Role,
    pub outcome: ReconcileOutcome,
}

/// Result of the two-step lookup.
enum Lookup {
    Found(UserRecord),
    Missing,
}

/// Derive the role for a user that has none stored.
pub fn derive_role(intent: Option<PendingIntent>) -> Role {
    match intent {
        Some(PendingIntent::CreateEvent) => Role::Organizer,
        None => DEFAULT_ROLE,
    }
}

/// Reconciles a user's role against the user record store.
pub struct RoleReconciler {
    store: Arc<dyn UserRecordStore>,
    timeout: Duration,
}

impl RoleReconciler {
    pub fn new(store: Arc<dyn UserRecordStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Resolve and persist the role for `identity`.
    ///
    /// An existing non-empty role always wins. Otherwise the role derived
    /// from `intent` is upserted and verified. When the store cannot tell
    /// whether a record exists, nothing is written and the outcome is
    /// `Pending`, so a transient error never overwrites a stored role.
    pub async fn reconcile(
        &self,
        identity: &IdentityClaims,
        intent: Option<PendingIntent>,
        profile: &Profile,
    ) -> Reconciliation {
        let email = identity.email.as_str();
        let derived = derive_role(intent);

        let existing = match self.lookup(email).await {
            Ok(Lookup::Found(record)) => match record.role {
                Some(role) => {
                    tracing::debug!(email, role = %role, "Existing role is authoritative");
                    return Reconciliation {
                        role,
                        outcome: ReconcileOutcome::Existing,
                    };
                }
                None => Some(record),
            },
            Ok(Lookup::Missing) => None,
            Err(e) => {
                tracing::warn!(
                    email,
                    error = %e,
                    role = %derived,
                    "User lookup failed, reconciliation pending; using derived role"
                );
                return Reconciliation {
                    role: derived,
                    outcome: ReconcileOutcome::Pending,
                };
            }
        };

        let record = merged_record(email, existing.as_ref(), profile, derived);
        let outcome = self
            .write_and_verify(&record, derived, ReconcileOutcome::Created)
            .await;

        tracing::info!(email, role = %derived, outcome = ?outcome, "Role reconciled");

        Reconciliation {
            role: derived,
            outcome,
        }
    }

    /// Explicitly raise the user to organizer (create-event while signed in).
    ///
    /// Unlike [`reconcile`](Self::reconcile) this overwrites an attendee role.
    /// If the lookup fails nothing is written and the outcome is `Pending`.
    pub async fn promote_to_organizer(
        &self,
        identity: &IdentityClaims,
        profile: &Profile,
    ) -> Reconciliation {
        let email = identity.email.as_str();

        let existing = match self.lookup(email).await {
            Ok(Lookup::Found(record)) if record.role == Some(Role::Organizer) => {
                return Reconciliation {
                    role: Role::Organizer,
                    outcome: ReconcileOutcome::Existing,
                };
            }
            Ok(Lookup::Found(record)) => Some(record),
            Ok(Lookup::Missing) => None,
            Err(e) => {
                tracing::warn!(email, error = %e, "User lookup failed, promotion not persisted");
                return Reconciliation {
                    role: Role::Organizer,
                    outcome: ReconcileOutcome::Pending,
                };
            }
        };

        let record = merged_record(email, existing.as_ref(), profile, Role::Organizer);
        let outcome = self
            .write_and_verify(&record, Role::Organizer, ReconcileOutcome::Promoted)
            .await;

        tracing::info!(email, outcome = ?outcome, "Promoted user to organizer");

        Reconciliation {
            role: Role::Organizer,
            outcome,
        }
    }

    /// Primary lookup, then the secondary path on a miss or failure.
    ///
    /// "Missing" is only concluded when both paths answered without error.
    async fn lookup(&self, email: &str) -> Result<Lookup, StoreError> {
        let primary_error = match self.bounded(self.store.get_by_key(email)).await {
            Ok(Some(record)) => return Ok(Lookup::Found(record)),
            Ok(None) => {
                tracing::debug!(email, "Primary lookup missed, trying email query");
                None
            }
            Err(e) => {
                tracing::warn!(email, error = %e, "Primary lookup failed, trying email query");
                Some(e)
            }
        };

        match self.bounded(self.store.query_by_email(email)).await {
            Ok(Some(record)) => Ok(Lookup::Found(record)),
            Ok(None) => match primary_error {
                Some(e) => Err(e),
                None => Ok(Lookup::Missing),
            },
            Err(e) => Err(e),
        }
    }

    async fn write_and_verify(
        &self,
        record: &UserRecord,
        expected: Role,
        success: ReconcileOutcome,
    ) -> ReconcileOutcome {
        let email = record.email.as_str();

        if let Err(e) = self.bounded(self.store.upsert(record)).await {
            tracing::warn!(
                email,
                error = %e,
                role = %expected,
                "Role write failed, reconciliation pending"
            );
            return ReconcileOutcome::Pending;
        }

        match self.bounded(self.store.get_by_key(email)).await {
            Ok(Some(stored)) if stored.role == Some(expected) => success,
            Ok(stored) => {
                let stored_role = stored.and_then(|r| r.role);
                tracing::warn!(
                    email,
                    expected = %expected,
                    stored = ?stored_role,
                    "Role write not confirmed by read-back"
                );
                ReconcileOutcome::Unverified
            }
            Err(e) => {
                tracing::warn!(email, error = %e, "Role read-back failed");
                ReconcileOutcome::Unverified
            }
        }
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))?
    }
}

/// Record to write: stored name/mobile survive unless the profile has newer values.
fn merged_record(
    email: &str,
    existing: Option<&UserRecord>,
    profile: &Profile,
    role: Role,
) -> UserRecord {
    let pick = |fresh: &str, stored: Option<&str>| {
        if fresh.trim().is_empty() {
            stored.unwrap_or_default().to_string()
        } else {
            fresh.trim().to_string()
        }
    };

    let name = pick(&profile.name, existing.map(|r| r.name.as_str()));
    let mobile = pick(&profile.mobile, existing.map(|r| r.mobile.as_str()));

    UserRecord::new(email, &name, &mobile, Some(role))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, mobile: &str) -> Profile {
        Profile {
            name: name.to_string(),
            email: "a@x.com".to_string(),
            picture: None,
            mobile: mobile.to_string(),
        }
    }

    #[test]
    fn test_derive_role() {
        assert_eq!(derive_role(Some(PendingIntent::CreateEvent)), Role::Organizer);
        assert_eq!(derive_role(None), Role::Organizer);
    }

    #[test]
    fn test_merged_record_keeps_stored_mobile() {
        let stored = UserRecord::new("a@x.com", "Old", "9876543210", None);
        let record = merged_record("a@x.com", Some(&stored), &profile("New", ""), Role::Organizer);

        assert_eq!(record.user_id, "a@x.com");
        assert_eq!(record.name, "New");
        assert_eq!(record.mobile, "9876543210");
        assert_eq!(record.role, Some(Role::Organizer));
    }

    #[test]
    fn test_merged_record_without_existing() {
        let record = merged_record("a@x.com", None, &profile("", ""), Role::Organizer);
        assert_eq!(record.name, "");
        assert_eq!(record.mobile, "");
    }
}
