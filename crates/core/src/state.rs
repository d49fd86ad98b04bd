// crates/core/src/state.rs
use chrono::NaiveDate;
use serde::Serialize;

use crate::EventId;

/// Short-term memory of one conversation.
///
/// Readers get accessors. Writes go through the transition methods below,
/// which are called by the intent handlers only. Every created event is also
/// the referenced event; the converse does not hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DialogueState {
    last_place: Option<String>,
    last_day: Option<NaiveDate>,
    last_created_event_id: Option<EventId>,
    last_referenced_event_id: Option<EventId>,
}

impl DialogueState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_place(&self) -> Option<&str> {
        self.last_place.as_deref()
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.last_day
    }

    pub fn last_created_event_id(&self) -> Option<&EventId> {
        self.last_created_event_id.as_ref()
    }

    pub fn last_referenced_event_id(&self) -> Option<&EventId> {
        self.last_referenced_event_id.as_ref()
    }

    /// A weather lookup was attempted for `place` on `day`.
    pub fn record_weather_query(&mut self, place: impl Into<String>, day: NaiveDate) {
        self.last_place = Some(place.into());
        self.last_day = Some(day);
    }

    pub fn record_created_event(&mut self, id: EventId) {
        self.last_created_event_id = Some(id.clone());
        self.last_referenced_event_id = Some(id);
    }

    /// The user was told about an existing event.
    pub fn record_referenced_event(&mut self, id: EventId) {
        self.last_referenced_event_id = Some(id);
    }

    /// The created event is gone. The reference stays.
    pub fn forget_created_event(&mut self) {
        self.last_created_event_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let state = DialogueState::new();
        assert!(state.last_place().is_none());
        assert!(state.last_day().is_none());
        assert!(state.last_created_event_id().is_none());
        assert!(state.last_referenced_event_id().is_none());
    }

    #[test]
    fn test_creation_also_sets_reference() {
        let mut state = DialogueState::new();
        state.record_created_event(EventId::new("7"));

        assert_eq!(state.last_created_event_id(), Some(&EventId::new("7")));
        assert_eq!(state.last_referenced_event_id(), Some(&EventId::new("7")));
    }

    #[test]
    fn test_referencing_does_not_touch_created() {
        let mut state = DialogueState::new();
        state.record_created_event(EventId::new("7"));
        state.record_referenced_event(EventId::new("9"));

        assert_eq!(state.last_created_event_id(), Some(&EventId::new("7")));
        assert_eq!(state.last_referenced_event_id(), Some(&EventId::new("9")));
    }

    #[test]
    fn test_forgetting_created_keeps_reference() {
        let mut state = DialogueState::new();
        state.record_created_event(EventId::new("7"));
        state.forget_created_event();

        assert!(state.last_created_event_id().is_none());
        assert_eq!(state.last_referenced_event_id(), Some(&EventId::new("7")));
    }
}
