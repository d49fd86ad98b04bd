// crates/actions/src/handlers.rs

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, warn};
use voxcal_core::{
    CalendarEvent, DialogueState, EventUpdate, Intent, IntentKind, NewEvent, Reading,
    UNTITLED_APPOINTMENT,
};

use crate::{Dispatcher, Reply};

pub(crate) const GREETING_REPLY: &str = "Hello! How can I help you?";
pub(crate) const WELL_BEING_REPLY: &str = "I am doing well, thank you. How can I help you?";
pub(crate) const UNKNOWN_REPLY: &str = "Sorry, I did not understand that.";

const EVENT_START_HOUR: u32 = 9;
const EVENT_LENGTH_HOURS: i64 = 1;
const WIRE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
const SPOKEN_DATE_FORMAT: &str = "%A, %d %B %Y";

const UNKNOWN_EVENT_REFERENCE: &str = "I do not know which appointment you mean.";
const CALENDAR_UNREACHABLE: &str = "Sorry, I could not reach your calendar.";

fn reading(value: Option<&Reading>) -> String {
    value.map_or_else(|| "?".to_string(), |reading| reading.to_string())
}

fn event_start(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::from_hms_opt(EVENT_START_HOUR, 0, 0).unwrap_or_default())
}

impl Dispatcher {
    pub(crate) async fn report_weather(&self, intent: &Intent, state: &mut DialogueState) -> Reply {
        let place = intent
            .slots
            .place
            .clone()
            .or_else(|| state.last_place().map(str::to_string));
        let Some(place) = place else {
            return Reply::clarification("I am not sure which place you mean.");
        };
        let day = intent.slots.day.unwrap_or_else(|| self.clock.today());

        // Recorded on every attempt, failed or not.
        state.record_weather_query(place.as_str(), day);

        let report = match self.weather.forecast(&place).await {
            Ok(report) if !report.is_error() => report,
            Ok(_) => {
                warn!(place = %place, "Weather service flagged an error");
                return Reply::failure("Sorry, I could not reach the weather service.");
            }
            Err(e) => {
                warn!(place = %place, error = %e, "Weather lookup failed");
                return Reply::failure("Sorry, I could not reach the weather service.");
            }
        };

        let day_name = day.format("%A").to_string();
        let Some(entry) = report.entry_for(&day_name) else {
            return Reply::not_found(format!(
                "I could not find a forecast for {} on {}.",
                place, day_name
            ));
        };

        let text = match intent.kind {
            IntentKind::CheckRain if entry.mentions_rain() => {
                format!("Yes, it will rain in {} on {}.", place, day_name)
            }
            IntentKind::CheckRain => format!("No, it will not rain in {} on {}.", place, day_name),
            _ => format!(
                "The weather in {} on {} will be {}, between {} and {} degrees.",
                place,
                day_name,
                entry.weather,
                reading(entry.temperature.min.as_ref()),
                reading(entry.temperature.max.as_ref()),
            ),
        };
        Reply::completed(text)
    }

    pub(crate) async fn create_event(&self, intent: &Intent, state: &mut DialogueState) -> Reply {
        let Some(day) = intent.slots.day else {
            return Reply::clarification("I did not understand the date for the appointment.");
        };
        let title = intent
            .slots
            .title
            .clone()
            .unwrap_or_else(|| UNTITLED_APPOINTMENT.to_string());

        let start = event_start(day);
        let end = start + Duration::hours(EVENT_LENGTH_HOURS);
        let new_event = NewEvent {
            title: title.clone(),
            description: title.clone(),
            start_time: start.format(WIRE_TIME_FORMAT).to_string(),
            end_time: end.format(WIRE_TIME_FORMAT).to_string(),
            location: self.default_location.clone(),
        };

        match self.calendar.create_event(&new_event).await {
            Ok(created) => {
                debug!(event_id = %created.id, "Created event");
                state.record_created_event(created.id);
                Reply::completed(format!(
                    "I have added an appointment titled '{}' on {} at {}.",
                    title,
                    day.format(SPOKEN_DATE_FORMAT),
                    start.format("%H:%M")
                ))
            }
            Err(e) => {
                warn!(error = %e, "Creating event failed");
                Reply::failure("Sorry, I could not add the appointment.")
            }
        }
    }

    pub(crate) async fn delete_last_event(&self, state: &mut DialogueState) -> Reply {
        let Some(id) = state.last_created_event_id().cloned() else {
            return Reply::clarification("I do not know which appointment you want to delete.");
        };

        match self.calendar.delete_event(&id).await {
            Ok(()) => {
                debug!(event_id = %id, "Deleted last created event");
                state.forget_created_event();
                Reply::completed("I have deleted the previously created appointment.")
            }
            Err(e) => {
                warn!(event_id = %id, error = %e, "Deleting event failed");
                Reply::failure("Sorry, I could not delete the appointment.")
            }
        }
    }

    pub(crate) async fn delete_this_event(&self, state: &mut DialogueState) -> Reply {
        let Some(id) = state.last_referenced_event_id().cloned() else {
            return Reply::clarification(UNKNOWN_EVENT_REFERENCE);
        };

        match self.calendar.delete_event(&id).await {
            Ok(()) => {
                debug!(event_id = %id, "Deleted referenced event");
                Reply::completed("I have deleted this appointment.")
            }
            Err(e) => {
                warn!(event_id = %id, error = %e, "Deleting event failed");
                Reply::failure("Sorry, I could not delete the appointment.")
            }
        }
    }

    pub(crate) async fn next_event(&self, state: &mut DialogueState) -> Reply {
        let events = match self.calendar.list_events().await {
            Ok(events) => events,
            Err(e) => {
                warn!(error = %e, "Listing events failed");
                return Reply::failure(CALENDAR_UNREACHABLE);
            }
        };
        if events.is_empty() {
            return Reply::not_found("You have no appointments.");
        }

        let now = self.clock.now();
        let next = events
            .iter()
            .filter_map(|event| match event.starts_at() {
                Some(start) => Some((start, event)),
                None => {
                    debug!(event_id = %event.id, "Skipping event with unreadable start time");
                    None
                }
            })
            .filter(|(start, _)| *start >= now)
            .min_by_key(|(start, _)| *start);

        let Some((start, event)) = next else {
            return Reply::not_found("You have no upcoming appointments.");
        };

        state.record_referenced_event(event.id.clone());
        Reply::completed(format!(
            "Your next appointment is '{}' on {} in {}.",
            event.title.as_deref().unwrap_or(UNTITLED_APPOINTMENT),
            start.format("%A, %d %B %Y at %H:%M"),
            event.location.as_deref().unwrap_or("an unknown location"),
        ))
    }

    pub(crate) async fn update_location_for_day(
        &self,
        intent: &Intent,
        state: &mut DialogueState,
    ) -> Reply {
        let Some(day) = intent.slots.day else {
            return Reply::clarification("I did not understand which day the appointment is on.");
        };
        let Some(location) = intent.slots.location.clone() else {
            return Reply::clarification("I did not understand the new location.");
        };

        let events = match self.calendar.list_events().await {
            Ok(events) => events,
            Err(e) => {
                warn!(error = %e, "Listing events failed");
                return Reply::failure(CALENDAR_UNREACHABLE);
            }
        };

        let spoken_day = day.format(SPOKEN_DATE_FORMAT);
        let Some(target) = first_event_on(&events, day) else {
            return Reply::not_found(format!("I could not find an appointment on {}.", spoken_day));
        };

        match self
            .calendar
            .update_event(&target.id, &EventUpdate::location(location.as_str()))
            .await
        {
            Ok(_) => {
                debug!(event_id = %target.id, location = %location, "Moved event");
                state.record_referenced_event(target.id.clone());
                Reply::completed(format!(
                    "I have changed the location of your appointment on {} to {}.",
                    spoken_day, location
                ))
            }
            Err(e) => {
                warn!(event_id = %target.id, error = %e, "Updating event failed");
                Reply::failure("Sorry, I could not update the appointment.")
            }
        }
    }

    pub(crate) async fn update_this_location(
        &self,
        intent: &Intent,
        state: &mut DialogueState,
    ) -> Reply {
        let Some(id) = state.last_referenced_event_id().cloned() else {
            return Reply::clarification(UNKNOWN_EVENT_REFERENCE);
        };
        let Some(location) = intent.slots.location.clone() else {
            return Reply::clarification("I did not understand the new location.");
        };

        match self
            .calendar
            .update_event(&id, &EventUpdate::location(location.as_str()))
            .await
        {
            Ok(_) => {
                debug!(event_id = %id, location = %location, "Moved referenced event");
                Reply::completed(format!(
                    "I have updated the location of this appointment to {}.",
                    location
                ))
            }
            Err(e) => {
                warn!(event_id = %id, error = %e, "Updating event failed");
                Reply::failure("Sorry, I could not update the appointment.")
            }
        }
    }
}

/// First listed event starting on `day`. Unreadable start times are skipped.
fn first_event_on(events: &[CalendarEvent], day: NaiveDate) -> Option<&CalendarEvent> {
    events
        .iter()
        .find(|event| event.starts_at().map(|start| start.date()) == Some(day))
}
