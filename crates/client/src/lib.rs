//! # Midway client
//!
//! Talks to the Midway event API on behalf of a host or participant.
//!
//! - **api**: typed calls for creating, fetching and joining events, results and
//!   location search
//! - **search**: debounced location lookup where only the latest query counts
//! - **joined**: remembers which events this device already joined
//! - **session**: the join form and the flow that submits it
//! - **config**: environment-driven settings

pub mod api;
pub mod config;
pub mod joined;
pub mod search;
pub mod session;

pub use api::{ApiClient, MidwayApi};
pub use config::ClientConfig;
pub use joined::{FileJoinedStore, JoinedStore, MemoryJoinedStore};
pub use search::{LocationSearch, SearchOutcome, SearchState};
pub use session::{EventSession, JoinForm};
