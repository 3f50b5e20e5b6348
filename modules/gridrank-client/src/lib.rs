pub mod error;
pub mod types;

pub use error::{ClientError, Result};
pub use types::{
    ApiEnvelope, CompetitorEntry, KeywordDetails, KeywordList, PositionDetails, RankCheckRequest,
    RankPoint, RankStats, StatusData, SubmitReceipt, UnderperformingArea,
};

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use gridrank_common::{GridPoint, GridSpec, ProcessingKeyword, Target};
use types::{AddKeywordsPayload, KeywordActionPayload, TargetParams};

/// REST client for the grid-rank backend. All endpoints are POST and wrap
/// their payload in a `{ code, message, data }` envelope.
pub struct RankApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RankApiClient {
    pub fn new(base_url: &str, api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// List tracked keywords and remaining check credits for a target.
    pub async fn get_keywords(&self, target: Target) -> Result<KeywordList> {
        self.post_envelope("/get-keywords", &TargetParams::from(target))
            .await
    }

    /// Fetch the full detail payload for a keyword, optionally scoped to one
    /// report date. While the backend is still computing, `dates` is empty.
    pub async fn get_keyword_details(
        &self,
        keyword_id: i64,
        date_id: Option<i64>,
    ) -> Result<KeywordDetails> {
        let mut body = json!({ "keywordId": keyword_id });
        if let Some(date_id) = date_id {
            body["dateId"] = json!(date_id);
        }
        self.post_envelope("/get-keyword-details", &body).await
    }

    /// Competitor detail at one grid point of a report.
    pub async fn get_position_details(
        &self,
        keyword_id: i64,
        date_id: i64,
        point: GridPoint,
    ) -> Result<PositionDetails> {
        let body = json!({
            "keywordId": keyword_id,
            "dateId": date_id,
            "lat": point.lat,
            "lng": point.lng,
        });
        self.post_envelope("/get-keyword-position-details", &body)
            .await
    }

    /// Geocoded center coordinates for a target, used to seed the report form.
    pub async fn get_default_coordinates(&self, target: Target) -> Result<GridPoint> {
        self.post_envelope("/get-default-coordinates", &TargetParams::from(target))
            .await
    }

    /// The NxN sample points around a center for the given `GridSpec`.
    pub async fn get_grid_coordinates(
        &self,
        center: GridPoint,
        grid: GridSpec,
    ) -> Result<Vec<GridPoint>> {
        let body = json!({
            "lat": center.lat,
            "lng": center.lng,
            "gridSize": grid.size,
            "distance": grid.distance_km,
        });
        self.post_envelope("/get-grid-coordinates", &body).await
    }

    /// Start a ranking check. The receipt's `keyword_id` is present when a
    /// pollable job was started, absent when the check was already queued.
    pub async fn add_keywords(&self, request: &RankCheckRequest) -> Result<SubmitReceipt> {
        let coordinates = request.coordinates.ok_or_else(|| {
            ClientError::InvalidRequest("check request has no coordinates".to_string())
        })?;

        let payload = AddKeywordsPayload {
            target: request.target.into(),
            keywords: request.keywords.clone(),
            grid_size: request.grid.size,
            distance: request.grid.distance_km,
            lat: coordinates.lat,
            lng: coordinates.lng,
            language: request.language.clone(),
            schedule: request.schedule,
        };

        tracing::debug!(
            target = %request.target,
            keywords = payload.keywords.len(),
            grid_size = payload.grid_size,
            "Submitting ranking check"
        );
        self.post_envelope("/add-keywords", &payload).await
    }

    /// Re-run the check for an existing keyword.
    pub async fn refresh_keyword(&self, target: Target, keyword_id: i64) -> Result<SubmitReceipt> {
        let body = KeywordActionPayload {
            target: target.into(),
            keyword_id,
        };
        self.post_envelope("/refresh-keyword", &body).await
    }

    /// Remove a tracked keyword.
    pub async fn delete_keyword(&self, target: Target, keyword_id: i64) -> Result<()> {
        let body = KeywordActionPayload {
            target: target.into(),
            keyword_id,
        };
        let _: Option<serde_json::Value> = self.post_ack("/delete-keyword", &body).await?;
        Ok(())
    }

    /// Which keywords are currently processing for a target. An empty list
    /// means nothing is in flight.
    pub async fn check_status(&self, target: Target) -> Result<Vec<ProcessingKeyword>> {
        let status: StatusData = self
            .post_envelope("/check-keywords-status", &TargetParams::from(target))
            .await?;
        Ok(status.keywords)
    }

    async fn post_envelope<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let envelope = self.post_raw::<B, T>(path, body).await?;
        envelope
            .data
            .ok_or_else(|| ClientError::Parse("response envelope had no data".to_string()))
    }

    /// Like `post_envelope`, but tolerates an absent `data` payload.
    async fn post_ack<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        let envelope = self.post_raw::<B, T>(path, body).await?;
        Ok(envelope.data)
    }

    async fn post_raw<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiEnvelope<T>> {
        let url = format!("{}{path}", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let envelope: ApiEnvelope<T> = resp.json().await?;
        if envelope.code != 200 {
            return Err(ClientError::Api {
                code: envelope.code,
                message: envelope.message,
            });
        }

        Ok(envelope)
    }
}
