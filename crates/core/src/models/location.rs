use serde::{Deserialize, Serialize};

/// Shortest query the location search will send.
pub const MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    pub id: i64,
    pub city: String,
    pub area_name: String,
    pub lat: f64,
    pub lng: f64,
}

/// Query string of the location search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationQuery {
    pub q: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl LocationQuery {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            city: None,
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Queries below [`MIN_QUERY_LEN`] characters are never sent.
    pub fn is_searchable(&self) -> bool {
        self.q.chars().count() >= MIN_QUERY_LEN
    }
}
