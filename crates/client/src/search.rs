//! Search-as-you-type for participant locations.
//!
//! Every keystroke calls [`LocationSearch::input`]. The call waits for a quiet period
//! and only then queries the API. Each call takes a ticket from a shared counter; a
//! call whose ticket is no longer the latest, either after the quiet period or when
//! its response arrives, is dropped without touching the published state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use midway_core::models::location::{LocationQuery, LocationResult};

use crate::api::MidwayApi;

/// What a consumer renders: the query the results belong to, and the results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<LocationResult>,
    pub loading: bool,
    pub failed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// This call was the latest and its results are now published.
    Applied(Vec<LocationResult>),
    /// The lookup failed; the published results were cleared.
    Failed,
    /// Input was below the minimum length; results were cleared without a request.
    TooShort,
    /// A newer input arrived first; nothing was published.
    Superseded,
}

pub struct LocationSearch<A: ?Sized> {
    api: Arc<A>,
    debounce: Duration,
    city: Option<String>,
    latest: Arc<AtomicU64>,
    state: Arc<watch::Sender<SearchState>>,
}

impl<A: ?Sized> Clone for LocationSearch<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            debounce: self.debounce,
            city: self.city.clone(),
            latest: Arc::clone(&self.latest),
            state: Arc::clone(&self.state),
        }
    }
}

impl<A: MidwayApi + ?Sized> LocationSearch<A> {
    pub fn new(api: Arc<A>, debounce: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            api,
            debounce,
            city: None,
            latest: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
        }
    }

    /// Restrict lookups to one city.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Handle the current contents of the input field.
    pub async fn input(&self, text: &str) -> SearchOutcome {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.debounce).await;
        if !self.is_latest(ticket) {
            debug!(query = text, "Location query superseded while debouncing");
            return SearchOutcome::Superseded;
        }

        let query = LocationQuery {
            q: text.to_string(),
            city: self.city.clone(),
        };
        if !query.is_searchable() {
            self.publish(ticket, SearchState {
                query: query.q,
                ..SearchState::default()
            });
            return SearchOutcome::TooShort;
        }

        self.state.send_if_modified(|state| {
            if !self.is_latest(ticket) {
                return false;
            }
            state.query = query.q.clone();
            state.loading = true;
            true
        });

        let result = self.api.search_locations(&query).await;

        let (next, outcome) = match result {
            Ok(results) => (
                SearchState {
                    query: query.q.clone(),
                    results: results.clone(),
                    loading: false,
                    failed: false,
                },
                SearchOutcome::Applied(results),
            ),
            Err(e) => {
                warn!(query = %query.q, "Location search failed: {}", e);
                (
                    SearchState {
                        query: query.q.clone(),
                        failed: true,
                        ..SearchState::default()
                    },
                    SearchOutcome::Failed,
                )
            }
        };

        if self.publish(ticket, next) {
            outcome
        } else {
            debug!(query = %query.q, "Dropping stale location results");
            SearchOutcome::Superseded
        }
    }

    /// Confirm a result: pending lookups are abandoned and the list is cleared.
    /// Returns the area name to use as the participant's location.
    pub fn select(&self, result: &LocationResult) -> String {
        self.cancel();
        self.state.send_replace(SearchState {
            query: result.area_name.clone(),
            ..SearchState::default()
        });
        result.area_name.clone()
    }

    /// Abandon every lookup in flight.
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
        self.state.send_if_modified(|state| {
            let was_loading = state.loading;
            state.loading = false;
            was_loading
        });
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }

    /// Publish `next` if `ticket` is still the latest. The check runs under the
    /// channel's lock, so a stale call can never overwrite a newer one.
    fn publish(&self, ticket: u64, next: SearchState) -> bool {
        self.state.send_if_modified(|state| {
            if !self.is_latest(ticket) {
                return false;
            }
            *state = next;
            true
        })
    }
}
