// crates/nlu/src/lib.rs

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use voxcal_core::{
    Clock, DialogueState, Intent, IntentKind, Slots, SystemClock, VoxcalError, VoxcalResult,
};

pub mod extract;
pub mod lexicon;
pub mod patterns;

pub use extract::{
    extract_day, extract_explicit_day, extract_new_location, extract_place, extract_title,
    next_weekday,
};
pub use lexicon::Lexicon;
pub use patterns::{IntentClassifier, IntentRule, Predicate, RuleContext};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NluConfig {
    /// Places recognized in addition to the built-in list.
    #[serde(default)]
    pub extra_places: Vec<String>,
}

/// Lowercases and trims. Nothing else.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

pub struct NluEngine {
    lexicon: Lexicon,
    classifier: IntentClassifier,
    clock: Arc<dyn Clock>,
}

impl NluEngine {
    pub fn new(config: &NluConfig) -> VoxcalResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &NluConfig, clock: Arc<dyn Clock>) -> VoxcalResult<Self> {
        if let Some(blank) = config.extra_places.iter().find(|p| p.trim().is_empty()) {
            return Err(VoxcalError::Nlu(format!(
                "Extra place entries must not be blank (got {:?})",
                blank
            )));
        }

        Ok(Self {
            lexicon: Lexicon::with_extra_places(config.extra_places.as_slice()),
            classifier: IntentClassifier::new(),
            clock,
        })
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Classifies one utterance and fills the slots its intent uses.
    /// The state is only read.
    pub fn classify_and_extract(&self, utterance: &str, state: &DialogueState) -> Intent {
        let text = normalize(utterance);
        let today = self.clock.today();

        let ctx = RuleContext {
            text: &text,
            state,
            today,
            lexicon: &self.lexicon,
        };
        let kind = self.classifier.classify(&ctx);

        let lexicon = &self.lexicon;
        let slots = match kind {
            IntentKind::GetWeather | IntentKind::CheckRain => Slots {
                place: extract_place(&text, state, lexicon),
                day: extract_day(&text, state, today, lexicon),
                ..Slots::default()
            },
            IntentKind::CreateEvent => Slots {
                title: Some(extract_title(&text, lexicon)),
                day: extract_day(&text, state, today, lexicon),
                ..Slots::default()
            },
            IntentKind::UpdateThisEventLocation => Slots {
                location: extract_new_location(&text),
                ..Slots::default()
            },
            IntentKind::UpdateEventLocationForDay => Slots {
                day: extract_day(&text, state, today, lexicon),
                location: extract_new_location(&text),
                ..Slots::default()
            },
            IntentKind::Greeting
            | IntentKind::HowAreYou
            | IntentKind::DeleteLastEvent
            | IntentKind::DeleteThisEvent
            | IntentKind::GetNextEvent
            | IntentKind::Unknown => Slots::default(),
        };

        debug!(intent = %kind, slots = ?slots, "Utterance understood");
        Intent::with_slots(kind, slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use voxcal_core::{EventId, FixedClock};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    // Monday 2026-10-19, mid-morning.
    fn engine() -> NluEngine {
        let clock = Arc::new(FixedClock::at(date(2026, 10, 19), 10, 30));
        NluEngine::with_clock(&NluConfig::default(), clock).unwrap()
    }

    #[test]
    fn test_normalizes_case_and_whitespace() {
        assert_eq!(normalize("  Hello THERE \n"), "hello there");
    }

    #[test]
    fn test_weather_in_a_named_place_today() {
        let intent = engine().classify_and_extract(
            "What will the weather be like in Marburg today",
            &DialogueState::new(),
        );

        assert_eq!(intent.kind, IntentKind::GetWeather);
        assert_eq!(intent.slots.place.as_deref(), Some("marburg"));
        assert_eq!(intent.slots.day, Some(date(2026, 10, 19)));
    }

    #[test]
    fn test_rain_there_tomorrow_uses_remembered_place() {
        let mut state = DialogueState::new();
        state.record_weather_query("marburg", date(2026, 10, 19));

        let intent = engine().classify_and_extract("will it rain there tomorrow", &state);

        assert_eq!(intent.kind, IntentKind::CheckRain);
        assert_eq!(intent.slots.place.as_deref(), Some("marburg"));
        assert_eq!(intent.slots.day, Some(date(2026, 10, 20)));
    }

    #[test]
    fn test_create_with_title_and_passed_date() {
        let intent = engine().classify_and_extract(
            "add an appointment titled dentist for january 12th",
            &DialogueState::new(),
        );

        assert_eq!(intent.kind, IntentKind::CreateEvent);
        assert_eq!(intent.slots.title.as_deref(), Some("dentist"));
        assert_eq!(intent.slots.day, Some(date(2027, 1, 12)));
    }

    #[test]
    fn test_change_location_of_referenced_event() {
        let mut state = DialogueState::new();
        state.record_referenced_event(EventId::new("12"));

        let intent = engine().classify_and_extract("change the location to Berlin", &state);

        assert_eq!(intent.kind, IntentKind::UpdateThisEventLocation);
        assert_eq!(intent.slots.location.as_deref(), Some("berlin"));
        assert_eq!(intent.slots.day, None);
    }

    #[test]
    fn test_change_location_for_a_day() {
        let intent = engine().classify_and_extract(
            "update the place of my appointment on wednesday to kassel",
            &DialogueState::new(),
        );

        assert_eq!(intent.kind, IntentKind::UpdateEventLocationForDay);
        assert_eq!(intent.slots.day, Some(date(2026, 10, 21)));
        assert_eq!(intent.slots.location.as_deref(), Some("kassel"));
    }

    #[test]
    fn test_delete_after_add_stays_a_delete() {
        let intent = engine().classify_and_extract(
            "Please delete the appointment I just added",
            &DialogueState::new(),
        );
        assert_eq!(intent.kind, IntentKind::DeleteLastEvent);
        assert_eq!(intent.slots, Slots::default());
    }

    #[test]
    fn test_configured_places_are_recognized() {
        let clock = Arc::new(FixedClock::at(date(2026, 10, 19), 10, 30));
        let config = NluConfig {
            extra_places: vec!["Dresden".to_string()],
        };
        let engine = NluEngine::with_clock(&config, clock).unwrap();

        let intent = engine.classify_and_extract("weather in dresden", &DialogueState::new());
        assert_eq!(intent.slots.place.as_deref(), Some("dresden"));
    }

    #[test]
    fn test_blank_configured_place_is_rejected() {
        let config = NluConfig {
            extra_places: vec!["  ".to_string()],
        };
        assert!(matches!(
            NluEngine::new(&config),
            Err(VoxcalError::Nlu(_))
        ));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: NluConfig = serde_json::from_str("{}").unwrap();
        assert!(config.extra_places.is_empty());
    }
}
