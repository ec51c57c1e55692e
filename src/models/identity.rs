// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity claims decoded from a third-party sign-in assertion.

use serde::{Deserialize, Serialize};

/// Claims extracted from an identity provider assertion.
///
/// Never mutated after decoding. An expired value is still a well-formed
/// value; callers decide what expiry means for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Provider-scoped subject identifier
    pub subject: String,
    /// Email address, used as the stable user key (case preserved)
    pub email: String,
    pub display_name: String,
    /// Profile picture URL, if the provider shared one
    pub picture_ref: Option<String>,
    /// Expiry (Unix timestamp, seconds)
    pub expires_at: i64,
}

impl IdentityClaims {
    /// True if the claims expired at or before `now` (Unix seconds).
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(expires_at: i64) -> IdentityClaims {
        IdentityClaims {
            subject: "sub-1".to_string(),
            email: "a@x.com".to_string(),
            display_name: "A".to_string(),
            picture_ref: None,
            expires_at,
        }
    }

    #[test]
    fn test_expiry_boundary() {
        assert!(!claims(101).is_expired(100));
        assert!(claims(100).is_expired(100));
        assert!(claims(99).is_expired(100));
    }
}
