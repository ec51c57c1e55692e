// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attendee dashboard aggregation.
//!
//! Selfie, events and matched photos are read concurrently and each read
//! fails on its own: a failed slice comes back empty and is listed in
//! [`AttendeeView::degraded`].

use crate::error::MatchingError;
use crate::models::{AggregationSlice, AttendeeView};
use crate::services::matching::MatchingService;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Composes the attendee view from the matching/event service.
pub struct AttendeeAggregator {
    matching: Arc<dyn MatchingService>,
    timeout: Duration,
}

impl AttendeeAggregator {
    pub fn new(matching: Arc<dyn MatchingService>, timeout: Duration) -> Self {
        Self { matching, timeout }
    }

    /// Build the view for `email`. Never fails; see [`AttendeeView::degraded`].
    pub async fn aggregate(&self, email: &str) -> AttendeeView {
        let (selfie, events, photos) = tokio::join!(
            self.bounded(self.matching.get_selfie(email)),
            self.bounded(self.matching.get_attended_events(email)),
            self.bounded(self.matching.get_matched_photos(email)),
        );

        let mut view = AttendeeView::default();

        match selfie {
            Ok(selfie_ref) => view.selfie_ref = selfie_ref,
            Err(e) => degrade(&mut view, AggregationSlice::Selfie, email, &e),
        }
        match events {
            Ok(attended) => view.attended_events = attended,
            Err(e) => degrade(&mut view, AggregationSlice::Events, email, &e),
        }
        match photos {
            Ok(matched) => view.matched_photos = matched,
            Err(e) => degrade(&mut view, AggregationSlice::MatchedPhotos, email, &e),
        }

        tracing::debug!(
            email,
            events = view.attended_events.len(),
            photos = view.matched_photos.len(),
            degraded = view.degraded.len(),
            "Attendee view aggregated"
        );

        view
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, MatchingError>
    where
        F: Future<Output = Result<T, MatchingError>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| MatchingError::Timeout(self.timeout))?
    }
}

fn degrade(view: &mut AttendeeView, slice: AggregationSlice, email: &str, error: &MatchingError) {
    tracing::warn!(
        email,
        read = slice.as_str(),
        error = %error,
        "Attendee read failed, serving partial view"
    );
    view.degraded.push(slice);
}
