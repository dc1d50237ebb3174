//! The participant's side of an event: the join form and the session that submits it.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use midway_core::errors::{MidwayError, MidwayResult};
use midway_core::models::{
    event::{Event, EventDetail},
    participant::{Participant, ParticipantCreate},
    results::Results,
};
use midway_core::slots::{AvailabilityInterval, SlotSelection, TimeSlot, TimeWindow, Toggle};

use crate::api::MidwayApi;
use crate::joined::JoinedStore;

/// Everything a participant fills in before joining.
#[derive(Debug, Clone)]
pub struct JoinForm {
    pub name: String,
    pub location_name: String,
    pub is_host: bool,
    selection: SlotSelection,
}

impl JoinForm {
    pub fn new(window: TimeWindow) -> Self {
        Self {
            name: String::new(),
            location_name: String::new(),
            is_host: false,
            selection: SlotSelection::new(window),
        }
    }

    pub fn for_event(event: &Event) -> Self {
        Self::new(event.window())
    }

    pub fn selection(&self) -> &SlotSelection {
        &self.selection
    }

    pub fn toggle(&mut self, slot: TimeSlot) -> Toggle {
        self.selection.toggle(slot)
    }

    /// Follow a possibly changed event window. A new window drops the selection.
    pub fn sync_window(&mut self, event: &Event) {
        self.selection.set_window(event.window());
    }

    pub fn availabilities(&self) -> &[AvailabilityInterval] {
        self.selection.intervals()
    }

    /// Build the join payload, refusing anything the API would reject.
    pub fn submission(&self) -> MidwayResult<ParticipantCreate> {
        let participant = ParticipantCreate {
            name: self.name.trim().to_string(),
            location_name: self.location_name.trim().to_string(),
            is_host: self.is_host,
            availabilities: self.selection.intervals().to_vec(),
        };
        participant.validate()?;
        Ok(participant)
    }
}

/// An opened event, bound to the API and this device's joined store.
pub struct EventSession<A: ?Sized, S: ?Sized> {
    api: Arc<A>,
    store: Arc<S>,
    slug: String,
    event: EventDetail,
    participant_id: Option<Uuid>,
}

impl<A, S> EventSession<A, S>
where
    A: MidwayApi + ?Sized,
    S: JoinedStore + ?Sized,
{
    /// Fetch the event and check whether this device already joined it.
    pub async fn open(api: Arc<A>, store: Arc<S>, slug: &str) -> MidwayResult<Self> {
        let event = api.get_event(slug).await?;
        let participant_id = match store.participant_for(slug).await {
            Ok(id) => id,
            Err(e) => {
                warn!(slug, "Could not read joined store: {}", e);
                None
            }
        };

        Ok(Self {
            api,
            store,
            slug: slug.to_string(),
            event,
            participant_id,
        })
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn event(&self) -> &EventDetail {
        &self.event
    }

    pub fn has_joined(&self) -> bool {
        self.participant_id.is_some()
    }

    pub fn participant_id(&self) -> Option<Uuid> {
        self.participant_id
    }

    /// A blank form for this event's window.
    pub fn form(&self) -> JoinForm {
        JoinForm::for_event(&self.event.event)
    }

    /// Re-fetch the event, e.g. to pick up newly joined participants.
    pub async fn refresh(&mut self) -> MidwayResult<()> {
        self.event = self.api.get_event(&self.slug).await?;
        Ok(())
    }

    /// Submit the form and remember the join on this device.
    pub async fn submit(&mut self, form: &JoinForm) -> MidwayResult<Participant> {
        if self.has_joined() {
            return Err(MidwayError::Validation(
                "You've already joined this event".into(),
            ));
        }

        let payload = form.submission()?;
        let participant = self.api.join_event(&self.slug, &payload).await?;

        // The join already happened server side; a local write failure must not
        // invite a second submission.
        if let Err(e) = self.store.remember(&self.slug, participant.id).await {
            warn!(slug = %self.slug, "Could not record join locally: {}", e);
        }
        self.participant_id = Some(participant.id);

        info!(slug = %self.slug, participant_id = %participant.id, "Submitted availability");
        Ok(participant)
    }

    pub async fn results(&self) -> MidwayResult<Results> {
        self.api.get_results(&self.slug).await
    }
}
