// crates/actions/src/lib.rs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use voxcal_core::{
    CalendarEvent, Clock, DialogueState, EventId, EventUpdate, Intent, IntentKind, NewEvent,
    SystemClock, VoxcalResult, WeatherReport,
};

pub mod calendar;
mod handlers;
pub mod weather;

#[cfg(test)]
mod fakes;

pub use calendar::{CalendarConfig, HttpCalendarService};
pub use weather::{HttpWeatherService, WeatherConfig};

/// Forecast lookup for a place
#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn forecast(&self, place: &str) -> VoxcalResult<WeatherReport>;
    fn name(&self) -> &str;
}

/// The user's calendar
#[async_trait]
pub trait CalendarService: Send + Sync {
    async fn create_event(&self, event: &NewEvent) -> VoxcalResult<CalendarEvent>;
    async fn list_events(&self) -> VoxcalResult<Vec<CalendarEvent>>;
    /// Sends only the fields set in `update`.
    async fn update_event(&self, id: &EventId, update: &EventUpdate) -> VoxcalResult<Value>;
    async fn delete_event(&self, id: &EventId) -> VoxcalResult<()>;
    fn name(&self) -> &str;
}

/// How a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Completed,
    /// A slot or reference was missing; nothing was called.
    Clarification,
    /// The collaborator answered but had nothing matching.
    NotFound,
    ServiceFailure,
    Unrecognized,
}

/// Response text plus how it came about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub outcome: Outcome,
}

impl Reply {
    pub fn completed(text: impl Into<String>) -> Self {
        Self::new(text, Outcome::Completed)
    }

    pub fn clarification(text: impl Into<String>) -> Self {
        Self::new(text, Outcome::Clarification)
    }

    pub fn not_found(text: impl Into<String>) -> Self {
        Self::new(text, Outcome::NotFound)
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self::new(text, Outcome::ServiceFailure)
    }

    pub fn unrecognized(text: impl Into<String>) -> Self {
        Self::new(text, Outcome::Unrecognized)
    }

    fn new(text: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            text: text.into(),
            outcome,
        }
    }
}

/// Routes an intent to its handler. Handlers are the only writers of the
/// dialogue state.
pub struct Dispatcher {
    weather: Arc<dyn WeatherService>,
    calendar: Arc<dyn CalendarService>,
    clock: Arc<dyn Clock>,
    default_location: String,
}

impl Dispatcher {
    pub fn new(weather: Arc<dyn WeatherService>, calendar: Arc<dyn CalendarService>) -> Self {
        Self {
            weather,
            calendar,
            clock: Arc::new(SystemClock),
            default_location: CalendarConfig::default().default_location,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Location given to newly created events.
    pub fn with_default_location(mut self, location: impl Into<String>) -> Self {
        self.default_location = location.into();
        self
    }

    pub async fn dispatch(&self, intent: &Intent, state: &mut DialogueState) -> String {
        self.handle(intent, state).await.text
    }

    pub async fn handle(&self, intent: &Intent, state: &mut DialogueState) -> Reply {
        debug!(
            intent = %intent.kind,
            weather = self.weather.name(),
            calendar = self.calendar.name(),
            "Dispatching intent"
        );

        match intent.kind {
            IntentKind::Greeting => Reply::completed(handlers::GREETING_REPLY),
            IntentKind::HowAreYou => Reply::completed(handlers::WELL_BEING_REPLY),
            IntentKind::GetWeather | IntentKind::CheckRain => {
                self.report_weather(intent, state).await
            }
            IntentKind::CreateEvent => self.create_event(intent, state).await,
            IntentKind::DeleteLastEvent => self.delete_last_event(state).await,
            IntentKind::DeleteThisEvent => self.delete_this_event(state).await,
            IntentKind::GetNextEvent => self.next_event(state).await,
            IntentKind::UpdateEventLocationForDay => {
                self.update_location_for_day(intent, state).await
            }
            IntentKind::UpdateThisEventLocation => {
                self.update_this_location(intent, state).await
            }
            IntentKind::Unknown => Reply::unrecognized(handlers::UNKNOWN_REPLY),
        }
    }
}
