use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dates;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedTime {
    #[serde(with = "dates::lenient", default = "dates::fallback_now")]
    pub start: DateTime<Utc>,
    #[serde(with = "dates::lenient", default = "dates::fallback_now")]
    pub end: DateTime<Utc>,
    pub participant_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedLocation {
    pub lat: f64,
    pub lng: f64,
    pub neighborhood: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueRecommendation {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub estimated_price: String,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub maps_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Results {
    pub event_title: String,
    pub suggested_time: Option<SuggestedTime>,
    pub suggested_location: Option<SuggestedLocation>,
    #[serde(default)]
    pub venue_recommendations: Vec<VenueRecommendation>,
    pub total_participants: u32,
}

impl Results {
    /// Whether the suggested time works for everyone who has joined.
    pub fn everyone_available(&self) -> bool {
        self.suggested_time
            .as_ref()
            .is_some_and(|t| t.participant_count == self.total_participants)
    }
}
