// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session state and its persisted snapshot.

use crate::models::{IdentityClaims, Role};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Profile reference persisted next to the identity token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub mobile: String,
}

impl Profile {
    pub fn from_claims(claims: &IdentityClaims, name: &str, mobile: &str) -> Self {
        let name = if name.trim().is_empty() {
            claims.display_name.clone()
        } else {
            name.trim().to_string()
        };

        Self {
            name,
            email: claims.email.clone(),
            picture: claims.picture_ref.clone(),
            mobile: mobile.trim().to_string(),
        }
    }
}

/// Serialized form of a session as kept in persisted client state.
///
/// `profile` is `None` both when it was never stored and when the stored
/// value could not be parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub profile: Option<Profile>,
}

/// Coarse lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Anonymous,
    Authenticated,
}

/// In-process session state.
///
/// Identity and role are only ever set together; there is no constructor
/// for a half-populated session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    identity: Option<IdentityClaims>,
    role: Option<Role>,
    profile: Option<Profile>,
}

impl SessionState {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(identity: IdentityClaims, role: Role, profile: Profile) -> Self {
        Self {
            identity: Some(identity),
            role: Some(role),
            profile: Some(profile),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_authenticated() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }

    pub fn identity(&self) -> Option<&IdentityClaims> {
        self.identity.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn email(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.email.as_str())
    }
}
