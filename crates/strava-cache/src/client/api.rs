//! Strava API client for authenticated requests
//!
//! This module provides a high-level client for the two Strava v3 endpoints
//! the cache depends on: the activity list (paginated, filtered by an `after`
//! cursor) and the per-activity telemetry streams.

use chrono::DateTime;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::tokens::AccessToken;
use crate::error::{CacheError, Result};
use crate::models::activity::ActivityRecord;
use crate::models::streams::StreamSet;

/// Channel names requested from the streams endpoint.
pub const STREAM_KEYS: &str =
    "time,latlng,distance,altitude,velocity_smooth,heartrate,cadence,watts,temp,moving,grade_smooth";

/// Activities fetched per page; Strava's documented maximum.
const PER_PAGE: u32 = 200;

/// Strava v3 API client
pub struct StravaClient {
    client: Client,
    base_url: String,
}

impl StravaClient {
    /// Create a new API client against the production Strava API
    pub fn new() -> Self {
        Self::new_with_base_url("https://www.strava.com/api/v3")
    }

    /// Create a new API client with a custom base URL (for testing)
    pub fn new_with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the full URL for a given path
    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build headers with authorization
    fn build_headers(&self, token: &AccessToken) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&token.authorization_header())
            .map_err(|_| CacheError::NotAuthenticated)?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    /// Make an authenticated GET request and deserialize the JSON response
    async fn get_json<T: DeserializeOwned>(&self, token: &AccessToken, path: &str) -> Result<T> {
        let url = self.build_url(path);
        let headers = self.build_headers(token)?;

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(CacheError::Http)?;

        let response = self.handle_response_status(response).await?;
        response.json().await.map_err(|e| {
            CacheError::invalid_response(format!("Failed to parse JSON response: {}", e))
        })
    }

    /// Fetch the authenticated athlete, validating the token.
    pub async fn get_athlete(&self, token: &AccessToken) -> Result<Value> {
        self.get_json(token, "/athlete").await
    }

    /// List all activities started after the given cursor, oldest first.
    ///
    /// The cursor is an ISO-8601 UTC timestamp (`%Y-%m-%dT%H:%M:%SZ`); Strava
    /// takes it as epoch seconds, so it is converted here. Pages are fetched
    /// to exhaustion; with `after` the API returns ascending start-date order,
    /// which the ledger relies on.
    pub async fn list_activities(
        &self,
        token: &AccessToken,
        after: &str,
    ) -> Result<Vec<ActivityRecord>> {
        let after_epoch = DateTime::parse_from_rfc3339(after)
            .map_err(|e| CacheError::config(format!("Invalid resume cursor '{}': {}", after, e)))?
            .timestamp();

        let mut activities = Vec::new();
        let mut page: u32 = 1;

        loop {
            let path = format!(
                "/athlete/activities?after={}&page={}&per_page={}",
                after_epoch, page, PER_PAGE
            );
            let batch: Vec<ActivityRecord> = self.get_json(token, &path).await?;
            let batch_len = batch.len();
            activities.extend(batch);

            if batch_len < PER_PAGE as usize {
                break;
            }
            page += 1;
        }

        Ok(activities)
    }

    /// Fetch the telemetry streams for one activity, keyed by channel name.
    pub async fn get_streams(&self, token: &AccessToken, activity_id: i64) -> Result<StreamSet> {
        let path = format!(
            "/activities/{}/streams?keys={}&key_by_type=true",
            activity_id, STREAM_KEYS
        );
        self.get_json(token, &path).await
    }

    /// Handle response status codes and convert to errors
    async fn handle_response_status(&self, response: Response) -> Result<Response> {
        let status = response.status();

        match status {
            StatusCode::OK | StatusCode::CREATED => Ok(response),
            StatusCode::UNAUTHORIZED => Err(CacheError::NotAuthenticated),
            StatusCode::TOO_MANY_REQUESTS => Err(CacheError::RateLimited),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(CacheError::Api {
                    status: status.as_u16(),
                    message: body,
                })
            }
        }
    }
}

impl Default for StravaClient {
    fn default() -> Self {
        Self::new()
    }
}
