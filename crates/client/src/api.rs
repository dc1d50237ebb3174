//! HTTP client for the Midway event API.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use midway_core::errors::{MidwayError, MidwayResult};
use midway_core::models::{
    event::{CreateEventRequest, Event, EventDetail},
    location::{LocationQuery, LocationResult},
    participant::{Participant, ParticipantCreate},
    results::Results,
};

use crate::config::ClientConfig;

/// Operations offered by the remote event API.
///
/// Failures are returned as-is; nothing here retries.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MidwayApi: Send + Sync {
    async fn create_event(&self, request: &CreateEventRequest) -> MidwayResult<Event>;

    async fn get_event(&self, slug: &str) -> MidwayResult<EventDetail>;

    async fn join_event(
        &self,
        slug: &str,
        participant: &ParticipantCreate,
    ) -> MidwayResult<Participant>;

    async fn get_results(&self, slug: &str) -> MidwayResult<Results>;

    async fn search_locations(&self, query: &LocationQuery) -> MidwayResult<Vec<LocationResult>>;
}

/// [`MidwayApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> MidwayResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(request_error)?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn event_path(&self, slug: &str, suffix: &str) -> String {
        format!(
            "{}/api/events/{}{}",
            self.base_url,
            urlencoding::encode(slug),
            suffix
        )
    }
}

#[async_trait]
impl MidwayApi for ApiClient {
    async fn create_event(&self, request: &CreateEventRequest) -> MidwayResult<Event> {
        request.validate()?;

        let response = self
            .http
            .post(format!("{}/api/events/", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(request_error)?;
        let event: Event = decode(response).await?;

        info!(slug = %event.slug, "Created event {}", event.title);
        Ok(event)
    }

    async fn get_event(&self, slug: &str) -> MidwayResult<EventDetail> {
        debug!(slug, "Fetching event");

        let response = self
            .http
            .get(self.event_path(slug, ""))
            .send()
            .await
            .map_err(request_error)?;

        decode(response).await
    }

    async fn join_event(
        &self,
        slug: &str,
        participant: &ParticipantCreate,
    ) -> MidwayResult<Participant> {
        let response = self
            .http
            .post(self.event_path(slug, "/join"))
            .json(participant)
            .send()
            .await
            .map_err(request_error)?;
        let joined: Participant = decode(response).await?;

        info!(
            slug,
            participant_id = %joined.id,
            intervals = participant.availabilities.len(),
            "Joined event"
        );
        Ok(joined)
    }

    async fn get_results(&self, slug: &str) -> MidwayResult<Results> {
        debug!(slug, "Fetching results");

        let response = self
            .http
            .get(self.event_path(slug, "/results"))
            .send()
            .await
            .map_err(request_error)?;

        decode(response).await
    }

    async fn search_locations(&self, query: &LocationQuery) -> MidwayResult<Vec<LocationResult>> {
        if !query.is_searchable() {
            return Ok(Vec::new());
        }

        let response = self
            .http
            .get(format!("{}/api/locations/search", self.base_url))
            .query(query)
            .send()
            .await
            .map_err(request_error)?;

        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> MidwayResult<T> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(request_error);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_detail(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
    debug!(status = status.as_u16(), %message, "API request failed");

    Err(match status {
        StatusCode::NOT_FOUND => MidwayError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            MidwayError::Validation(message)
        }
        _ => MidwayError::Api {
            status: status.as_u16(),
            message,
        },
    })
}

/// Pull the `detail` field out of an error body.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(detail) => Some(detail.clone()),
        other => Some(other.to_string()),
    }
}

fn request_error(error: reqwest::Error) -> MidwayError {
    MidwayError::Request(eyre::Report::new(error))
}
