// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod attendee;
pub mod identity;
pub mod intent;
pub mod session;
pub mod user;

pub use attendee::{AggregationSlice, AttendeeView, Event, MatchedPhoto};
pub use identity::IdentityClaims;
pub use intent::{FollowUp, PendingIntent};
pub use session::{Profile, SessionSnapshot, SessionState, SessionStatus};
pub use user::{Role, UserRecord};
