//! # Midway
//!
//! Client side of the Midway event coordinator: a host creates an event with a time
//! window, participants pick the hour slots they are free for and where they are
//! coming from, and the service suggests a time and a meeting point.
//!
//! ## Crates
//!
//! - **midway-core**: slot selection, interval merging, date normalization, models
//! - **midway-client**: HTTP API client, location search, joined-event store, join flow
//!
//! This crate re-exports both and wires them together from environment configuration.

use std::sync::Arc;

use dotenv::dotenv;
use eyre::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

pub use midway_client;
pub use midway_core;

use midway_client::{
    ApiClient, ClientConfig, EventSession, FileJoinedStore, JoinedStore, LocationSearch,
    MemoryJoinedStore, MidwayApi,
};
use midway_core::errors::MidwayResult;
use midway_core::models::event::{CreateEventRequest, Event};

/// Install the global fmt subscriber at `level`.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Read `.env` if present, then build the configuration from the environment.
pub fn load_config() -> Result<ClientConfig> {
    dotenv().ok();
    ClientConfig::from_env()
}

/// The API client and joined store for one device, built from a [`ClientConfig`].
pub struct Midway {
    config: ClientConfig,
    api: Arc<ApiClient>,
    joined: Arc<dyn JoinedStore>,
}

impl Midway {
    pub fn new(config: ClientConfig) -> MidwayResult<Self> {
        let api = Arc::new(ApiClient::new(&config)?);
        let joined: Arc<dyn JoinedStore> = match &config.state_path {
            Some(path) => Arc::new(FileJoinedStore::new(path)),
            None => Arc::new(MemoryJoinedStore::new()),
        };

        info!(api_url = %api.base_url(), "Midway client ready");
        Ok(Self {
            config,
            api,
            joined,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> Arc<ApiClient> {
        Arc::clone(&self.api)
    }

    pub fn joined(&self) -> Arc<dyn JoinedStore> {
        Arc::clone(&self.joined)
    }

    /// Create an event and return it with the link to share with participants.
    pub async fn create_event(
        &self,
        request: &CreateEventRequest,
    ) -> MidwayResult<(Event, String)> {
        let event = self.api.create_event(request).await?;
        let link = self.config.event_url(&event.slug);
        info!(slug = %event.slug, %link, "Event ready to share");
        Ok((event, link))
    }

    pub async fn open_event(
        &self,
        slug: &str,
    ) -> MidwayResult<EventSession<ApiClient, dyn JoinedStore>> {
        EventSession::open(self.api(), self.joined(), slug).await
    }

    /// A location search with the configured debounce, optionally limited to a city.
    pub fn location_search(&self, city: Option<&str>) -> LocationSearch<ApiClient> {
        let search = LocationSearch::new(self.api(), self.config.search_debounce());
        match city {
            Some(city) => search.with_city(city),
            None => search,
        }
    }
}
