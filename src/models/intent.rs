// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Deferred user intents and the follow-up they resume into.

use serde::{Deserialize, Serialize};

/// An action requested before the user was authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PendingIntent {
    CreateEvent,
}

impl PendingIntent {
    /// Value stored in the persisted client state.
    pub fn as_str(&self) -> &'static str {
        match self {
            PendingIntent::CreateEvent => "createEvent",
        }
    }

    /// Parse a stored value. Unknown values yield `None`.
    pub fn from_stored(raw: &str) -> Option<Self> {
        match raw.trim() {
            "createEvent" => Some(PendingIntent::CreateEvent),
            _ => None,
        }
    }

    /// The single follow-up action this intent resumes into.
    pub fn follow_up(&self) -> FollowUp {
        match self {
            PendingIntent::CreateEvent => FollowUp::OpenCreateEvent,
        }
    }
}

/// Navigation the UI shell performs after an action is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FollowUp {
    /// Open the event dashboard with the create dialog
    OpenCreateEvent,
    /// Go to selfie upload
    UploadSelfie,
}

impl FollowUp {
    pub fn path(&self) -> &'static str {
        match self {
            FollowUp::OpenCreateEvent => "/events?create=true",
            FollowUp::UploadSelfie => "/upload-selfie",
        }
    }
}
