// crates/core/src/events.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One transcribed user turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Utterance {
    pub id: uuid::Uuid,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            text: text.into(),
            received_at: Utc::now(),
        }
    }
}

/// The closed set of things a user can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Greeting,
    HowAreYou,
    GetWeather,
    CheckRain,
    CreateEvent,
    DeleteLastEvent,
    DeleteThisEvent,
    GetNextEvent,
    UpdateEventLocationForDay,
    UpdateThisEventLocation,
    Unknown,
}

impl IntentKind {
    pub const ALL: [IntentKind; 11] = [
        IntentKind::Greeting,
        IntentKind::HowAreYou,
        IntentKind::GetWeather,
        IntentKind::CheckRain,
        IntentKind::CreateEvent,
        IntentKind::DeleteLastEvent,
        IntentKind::DeleteThisEvent,
        IntentKind::GetNextEvent,
        IntentKind::UpdateEventLocationForDay,
        IntentKind::UpdateThisEventLocation,
        IntentKind::Unknown,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IntentKind::Greeting => "greeting",
            IntentKind::HowAreYou => "how_are_you",
            IntentKind::GetWeather => "get_weather",
            IntentKind::CheckRain => "check_rain",
            IntentKind::CreateEvent => "create_event",
            IntentKind::DeleteLastEvent => "delete_last_event",
            IntentKind::DeleteThisEvent => "delete_this_event",
            IntentKind::GetNextEvent => "get_next_event",
            IntentKind::UpdateEventLocationForDay => "update_event_location_for_day",
            IntentKind::UpdateThisEventLocation => "update_this_event_location",
            IntentKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Title given to events the user did not name.
pub const UNTITLED_APPOINTMENT: &str = "Untitled appointment";

/// Slot values pulled out of an utterance. Absent slots are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slots {
    pub place: Option<String>,
    pub day: Option<NaiveDate>,
    pub title: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    #[serde(default)]
    pub slots: Slots,
}

impl Intent {
    pub fn new(kind: IntentKind) -> Self {
        Self {
            kind,
            slots: Slots::default(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(IntentKind::Unknown)
    }

    pub fn with_slots(kind: IntentKind, slots: Slots) -> Self {
        Self { kind, slots }
    }
}
