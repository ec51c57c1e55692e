// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for the matching/event service.
//!
//! The service owns selfies, attended events and face-matched photos; this
//! crate only reads them.

use crate::error::MatchingError;
use crate::models::{Event, MatchedPhoto};
use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Read-only view of the matching/event service for one attendee.
#[async_trait]
pub trait MatchingService: Send + Sync {
    /// URL of the attendee's selfie, if one was uploaded.
    async fn get_selfie(&self, email: &str) -> Result<Option<String>, MatchingError>;

    async fn get_attended_events(&self, email: &str) -> Result<Vec<Event>, MatchingError>;

    async fn get_matched_photos(&self, email: &str) -> Result<Vec<MatchedPhoto>, MatchingError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelfieResponse {
    #[serde(default)]
    selfie_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    images: Vec<MatchedPhoto>,
}

/// HTTP client for the matching/event service.
#[derive(Clone)]
pub struct HttpMatchingService {
    http: reqwest::Client,
    base_url: String,
}

impl HttpMatchingService {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed building matching service HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn attendee_url(&self, email: &str, resource: &str) -> String {
        format!(
            "{}/api/attendee/{}/{}",
            self.base_url,
            urlencoding::encode(email),
            resource
        )
    }

    /// GET a JSON resource. `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, MatchingError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| MatchingError::Request(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MatchingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map(Some)
            .map_err(|e| MatchingError::Decode(e.to_string()))
    }
}

#[async_trait]
impl MatchingService for HttpMatchingService {
    async fn get_selfie(&self, email: &str) -> Result<Option<String>, MatchingError> {
        let url = self.attendee_url(email, "selfie");
        let response: Option<SelfieResponse> = self.get_json(&url).await?;

        Ok(response
            .and_then(|r| r.selfie_url)
            .filter(|u| !u.trim().is_empty()))
    }

    async fn get_attended_events(&self, email: &str) -> Result<Vec<Event>, MatchingError> {
        let url = self.attendee_url(email, "events");
        let response: Option<EventsResponse> = self.get_json(&url).await?;
        Ok(response.map(|r| r.events).unwrap_or_default())
    }

    async fn get_matched_photos(&self, email: &str) -> Result<Vec<MatchedPhoto>, MatchingError> {
        let url = self.attendee_url(email, "matching-images");
        let response: Option<ImagesResponse> = self.get_json(&url).await?;
        Ok(response.map(|r| r.images).unwrap_or_default())
    }
}
