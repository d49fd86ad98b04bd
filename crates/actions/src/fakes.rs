// crates/actions/src/fakes.rs

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::{CalendarService, WeatherService};
use voxcal_core::{
    CalendarEvent, EventId, EventUpdate, NewEvent, VoxcalError, VoxcalResult, WeatherReport,
};

/// Serves one canned report, or fails when it has none.
pub struct FakeWeather {
    report: Option<WeatherReport>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeWeather {
    pub fn returning(report: WeatherReport) -> Self {
        Self {
            report: Some(report),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            report: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl WeatherService for FakeWeather {
    async fn forecast(&self, place: &str) -> VoxcalResult<WeatherReport> {
        self.calls.lock().push(place.to_string());
        self.report
            .clone()
            .ok_or_else(|| VoxcalError::Network("weather offline".to_string()))
    }

    fn name(&self) -> &str {
        "fake_weather"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CalendarCall {
    Create(NewEvent),
    List,
    Update(EventId, EventUpdate),
    Delete(EventId),
}

/// In-memory calendar that records every call.
pub struct FakeCalendar {
    pub events: Mutex<Vec<CalendarEvent>>,
    pub calls: Mutex<Vec<CalendarCall>>,
    next_id: Mutex<u32>,
    offline: bool,
    reject_updates: bool,
}

impl FakeCalendar {
    pub fn new() -> Self {
        Self::with_events(Vec::new())
    }

    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        Self {
            events: Mutex::new(events),
            calls: Mutex::new(Vec::new()),
            next_id: Mutex::new(100),
            offline: false,
            reject_updates: false,
        }
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::new()
        }
    }

    /// Lists normally but refuses every update.
    pub fn rejecting_updates(self) -> Self {
        Self {
            reject_updates: true,
            ..self
        }
    }

    fn reachable(&self) -> VoxcalResult<()> {
        if self.offline {
            return Err(VoxcalError::Network("calendar offline".to_string()));
        }
        Ok(())
    }
}

pub fn event(id: &str, title: &str, start_time: &str) -> CalendarEvent {
    CalendarEvent {
        id: EventId::new(id),
        title: Some(title.to_string()),
        description: None,
        start_time: Some(start_time.to_string()),
        end_time: None,
        location: Some("Office".to_string()),
    }
}

#[async_trait]
impl CalendarService for FakeCalendar {
    async fn create_event(&self, new_event: &NewEvent) -> VoxcalResult<CalendarEvent> {
        self.calls.lock().push(CalendarCall::Create(new_event.clone()));
        self.reachable()?;

        let mut next_id = self.next_id.lock();
        *next_id += 1;
        let created = CalendarEvent {
            id: EventId::new(next_id.to_string()),
            title: Some(new_event.title.clone()),
            description: Some(new_event.description.clone()),
            start_time: Some(new_event.start_time.clone()),
            end_time: Some(new_event.end_time.clone()),
            location: Some(new_event.location.clone()),
        };
        self.events.lock().push(created.clone());
        Ok(created)
    }

    async fn list_events(&self) -> VoxcalResult<Vec<CalendarEvent>> {
        self.calls.lock().push(CalendarCall::List);
        self.reachable()?;
        Ok(self.events.lock().clone())
    }

    async fn update_event(&self, id: &EventId, update: &EventUpdate) -> VoxcalResult<Value> {
        self.calls
            .lock()
            .push(CalendarCall::Update(id.clone(), update.clone()));
        self.reachable()?;
        if self.reject_updates {
            return Err(VoxcalError::Calendar("update rejected".to_string()));
        }

        let mut events = self.events.lock();
        let target = events
            .iter_mut()
            .find(|event| &event.id == id)
            .ok_or_else(|| VoxcalError::Calendar(format!("no event {}", id)))?;
        if let Some(location) = &update.location {
            target.location = Some(location.clone());
        }
        Ok(json!({ "id": id.as_str() }))
    }

    async fn delete_event(&self, id: &EventId) -> VoxcalResult<()> {
        self.calls.lock().push(CalendarCall::Delete(id.clone()));
        self.reachable()?;
        self.events.lock().retain(|event| &event.id != id);
        Ok(())
    }

    fn name(&self) -> &str {
        "fake_calendar"
    }
}
