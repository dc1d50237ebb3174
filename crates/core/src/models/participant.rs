use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{MidwayError, MidwayResult};
use crate::slots::AvailabilityInterval;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_LOCATION_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantBasic {
    pub id: Uuid,
    pub name: String,
    pub location_name: String,
    pub is_host: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub location_name: String,
    pub is_host: bool,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Join payload. `availabilities` is the merged interval list of the participant's
/// selected slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantCreate {
    pub name: String,
    pub location_name: String,
    #[serde(default)]
    pub is_host: bool,
    pub availabilities: Vec<AvailabilityInterval>,
}

impl ParticipantCreate {
    pub fn validate(&self) -> MidwayResult<()> {
        if self.name.trim().is_empty() {
            return Err(MidwayError::Validation("Please enter your name".into()));
        }
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(MidwayError::Validation(format!(
                "Name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
        if self.location_name.trim().is_empty() {
            return Err(MidwayError::Validation("Please choose your location".into()));
        }
        if self.location_name.chars().count() > MAX_LOCATION_LEN {
            return Err(MidwayError::Validation(format!(
                "Location must be at most {} characters",
                MAX_LOCATION_LEN
            )));
        }
        if self.availabilities.is_empty() && !self.is_host {
            return Err(MidwayError::Validation(
                "Please select at least one time slot".into(),
            ));
        }
        Ok(())
    }
}
