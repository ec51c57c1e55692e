// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted client state: the key-value scope that survives a sign-in
//! redirect (browser cookies over HTTP, a map in-process).

use crate::models::{Profile, SessionSnapshot};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use std::collections::HashMap;

/// Keys held in persisted client state.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const PROFILE: &str = "profile";
    pub const PENDING_INTENT: &str = "pending_intent";

    pub const ALL: [&str; 3] = [TOKEN, PROFILE, PENDING_INTENT];
}

/// A string key-value scope owned by one client.
pub trait ClientStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// Read the session snapshot. An unparseable profile reads as absent.
pub fn read_snapshot<C: ClientStore + ?Sized>(store: &C) -> SessionSnapshot {
    let token = store.get(keys::TOKEN).filter(|t| !t.trim().is_empty());
    let profile = store.get(keys::PROFILE).and_then(|raw| {
        serde_json::from_str::<Profile>(&raw)
            .map_err(|e| tracing::debug!(error = %e, "Discarding unparseable stored profile"))
            .ok()
    });

    SessionSnapshot { token, profile }
}

/// Persist token and profile together.
pub fn write_snapshot<C: ClientStore + ?Sized>(
    store: &mut C,
    token: &str,
    profile: &Profile,
) -> Result<(), serde_json::Error> {
    let profile = serde_json::to_string(profile)?;
    store.set(keys::TOKEN, token.to_string());
    store.set(keys::PROFILE, profile);
    Ok(())
}

/// Remove token and profile, leaving any pending intent in place.
pub fn purge_snapshot<C: ClientStore + ?Sized>(store: &mut C) {
    store.remove(keys::TOKEN);
    store.remove(keys::PROFILE);
}

/// Remove every key this crate persists.
pub fn clear_all<C: ClientStore + ?Sized>(store: &mut C) {
    for key in keys::ALL {
        store.remove(key);
    }
}

/// In-process client state.
#[derive(Debug, Clone, Default)]
pub struct MemoryClientStore {
    values: HashMap<String, String>,
}

impl MemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl ClientStore for MemoryClientStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

const COOKIE_PREFIX: &str = "eventsnap_";

/// Client state carried in HttpOnly cookies.
///
/// Values are base64url encoded so JSON profiles survive cookie syntax.
#[derive(Debug, Clone, Default)]
pub struct CookieClientStore {
    jar: CookieJar,
    secure: bool,
}

impl CookieClientStore {
    pub fn new(jar: CookieJar, secure: bool) -> Self {
        Self { jar, secure }
    }

    /// Hand the (possibly modified) jar back for the response.
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }

    fn cookie_name(key: &str) -> String {
        format!("{}{}", COOKIE_PREFIX, key)
    }
}

impl ClientStore for CookieClientStore {
    fn get(&self, key: &str) -> Option<String> {
        let cookie = self.jar.get(&Self::cookie_name(key))?;
        let bytes = URL_SAFE_NO_PAD.decode(cookie.value()).ok()?;
        String::from_utf8(bytes).ok()
    }

    fn set(&mut self, key: &str, value: String) {
        let cookie = Cookie::build((Self::cookie_name(key), URL_SAFE_NO_PAD.encode(value)))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax);

        let jar = std::mem::take(&mut self.jar);
        self.jar = jar.add(cookie);
    }

    fn remove(&mut self, key: &str) {
        let jar = std::mem::take(&mut self.jar);
        self.jar = jar.remove(Cookie::build(Self::cookie_name(key)).path("/"));
    }
}
