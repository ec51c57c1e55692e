// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attendee dashboard view model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// An event the attendee took part in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_id: String,
    #[serde(rename = "eventName")]
    pub name: String,
    #[serde(rename = "eventDate")]
    pub date: String,
    #[serde(rename = "thumbnailUrl")]
    pub thumbnail_ref: String,
}

/// A photo the matching service attributed to the attendee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct MatchedPhoto {
    pub image_id: String,
    pub event_id: String,
    pub event_name: String,
    #[serde(rename = "imageUrl")]
    pub image_ref: String,
    pub matched_date: String,
}

/// One independent read feeding the attendee view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub enum AggregationSlice {
    Selfie,
    Events,
    MatchedPhotos,
}

impl AggregationSlice {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationSlice::Selfie => "selfie",
            AggregationSlice::Events => "events",
            AggregationSlice::MatchedPhotos => "matched_photos",
        }
    }
}

/// Aggregated dashboard data for one attendee.
///
/// Slices whose read failed are empty and listed in `degraded`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeView {
    pub selfie_ref: Option<String>,
    pub attended_events: Vec<Event>,
    pub matched_photos: Vec<MatchedPhoto>,
    pub degraded: Vec<AggregationSlice>,
}

impl AttendeeView {
    pub fn is_partial(&self) -> bool {
        !self.degraded.is_empty()
    }
}
