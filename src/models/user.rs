//! User record model for storage and API.

use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Role assigned to a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Creates and manages events
    Organizer,
    /// Attends events and receives matched photos (stored as `user` by older clients)
    #[serde(alias = "user")]
    Attendee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Organizer => "organizer",
            Role::Attendee => "attendee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User record stored in the user record store.
///
/// Keyed by `email`; `user_id` always equals `email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mobile: String,
    /// Missing, null and empty-string roles all read as `None`
    #[serde(default, deserialize_with = "deserialize_role")]
    pub role: Option<Role>,
}

impl UserRecord {
    /// Build a record keyed by `email`.
    pub fn new(email: &str, name: &str, mobile: &str, role: Option<Role>) -> Self {
        Self {
            user_id: email.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            mobile: mobile.to_string(),
            role,
        }
    }
}

fn deserialize_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some("organizer") => Ok(Some(Role::Organizer)),
        Some("attendee") | Some("user") => Ok(Some(Role::Attendee)),
        Some(other) => Err(serde::de::Error::unknown_variant(
            other,
            &["organizer", "attendee", "user"],
        )),
    }
}
