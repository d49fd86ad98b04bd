// crates/actions/src/calendar.rs

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::CalendarService;
use voxcal_core::{CalendarEvent, EventId, EventUpdate, NewEvent, VoxcalError, VoxcalResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    #[serde(default = "default_timeout")]
    pub timeout_s: u64,
    /// Location given to events created by voice.
    #[serde(default = "default_location")]
    pub default_location: String,
}

fn default_api_url() -> String {
    "https://api.responsible-nlp.net/calendar.php".to_string()
}

fn default_calendar_id() -> String {
    "voxcal".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_location() -> String {
    "Office".to_string()
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            calendar_id: default_calendar_id(),
            timeout_s: default_timeout(),
            default_location: default_location(),
        }
    }
}

/// REST calendar addressed by `calenderid` (sic) in the query string.
pub struct HttpCalendarService {
    config: CalendarConfig,
    client: Client,
}

impl HttpCalendarService {
    pub fn new(config: CalendarConfig) -> VoxcalResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_s))
            .build()
            .map_err(|e| VoxcalError::Calendar(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn scoped(&self, request: RequestBuilder, id: Option<&EventId>) -> RequestBuilder {
        let request = request.query(&[("calenderid", self.config.calendar_id.as_str())]);
        match id {
            Some(id) => request.query(&[("id", id.as_str())]),
            None => request,
        }
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> VoxcalResult<Response> {
        debug!(operation, url = %self.config.api_url, "Calling calendar");

        let response = request
            .send()
            .await
            .map_err(|e| VoxcalError::Network(format!("Calendar {} failed: {}", operation, e)))?;

        if !response.status().is_success() {
            return Err(VoxcalError::Calendar(format!(
                "Calendar {} error: {}",
                operation,
                response.status()
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl CalendarService for HttpCalendarService {
    async fn create_event(&self, event: &NewEvent) -> VoxcalResult<CalendarEvent> {
        let request = self.scoped(self.client.post(&self.config.api_url), None).json(event);
        self.send("create", request)
            .await?
            .json::<CalendarEvent>()
            .await
            .map_err(|e| VoxcalError::Calendar(format!("Malformed created event: {}", e)))
    }

    async fn list_events(&self) -> VoxcalResult<Vec<CalendarEvent>> {
        let request = self.scoped(self.client.get(&self.config.api_url), None);
        self.send("list", request)
            .await?
            .json::<Vec<CalendarEvent>>()
            .await
            .map_err(|e| VoxcalError::Calendar(format!("Malformed event list: {}", e)))
    }

    async fn update_event(&self, id: &EventId, update: &EventUpdate) -> VoxcalResult<Value> {
        if update.is_empty() {
            return Err(VoxcalError::Calendar(format!(
                "Nothing to update for event {}",
                id
            )));
        }

        let request = self
            .scoped(self.client.put(&self.config.api_url), Some(id))
            .json(update);
        let body = self.send("update", request).await?.text().await.map_err(|e| {
            VoxcalError::Network(format!("Calendar update response unreadable: {}", e))
        })?;

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn delete_event(&self, id: &EventId) -> VoxcalResult<()> {
        let request = self.scoped(self.client.delete(&self.config.api_url), Some(id));
        self.send("delete", request).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "http_calendar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn service(server: &mockito::ServerGuard) -> HttpCalendarService {
        HttpCalendarService::new(CalendarConfig {
            api_url: format!("{}/calendar.php", server.url()),
            calendar_id: "1234".to_string(),
            timeout_s: 5,
            default_location: "Office".to_string(),
        })
        .unwrap()
    }

    fn calendar_query() -> Matcher {
        Matcher::UrlEncoded("calenderid".into(), "1234".into())
    }

    #[tokio::test]
    async fn test_create_posts_event_and_reads_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/calendar.php")
            .match_query(calendar_query())
            .match_body(Matcher::PartialJsonString(
                r#"{"title":"dentist","start_time":"2027-01-12T09:00"}"#.to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"id": 17, "title": "dentist"}"#)
            .create_async()
            .await;

        let created = service(&server)
            .create_event(&NewEvent {
                title: "dentist".to_string(),
                description: "dentist".to_string(),
                start_time: "2027-01-12T09:00".to_string(),
                end_time: "2027-01-12T10:00".to_string(),
                location: "Office".to_string(),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(created.id, EventId::new("17"));
    }

    #[tokio::test]
    async fn test_list_reads_all_events() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/calendar.php")
            .match_query(calendar_query())
            .with_status(200)
            .with_body(
                r#"[{"id":1,"title":"a","start_time":"2026-10-20T09:00"},
                    {"id":"2","start_time":"garbage"}]"#,
            )
            .create_async()
            .await;

        let events = service(&server).list_events().await.unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].starts_at().is_some());
        assert!(events[1].starts_at().is_none());
    }

    #[tokio::test]
    async fn test_update_sends_only_set_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/calendar.php")
            .match_query(Matcher::AllOf(vec![
                calendar_query(),
                Matcher::UrlEncoded("id".into(), "17".into()),
            ]))
            .match_body(Matcher::JsonString(r#"{"location":"berlin"}"#.to_string()))
            .with_status(200)
            .with_body(r#"{"id":17,"location":"berlin"}"#)
            .create_async()
            .await;

        let updated = service(&server)
            .update_event(&EventId::new("17"), &EventUpdate::location("berlin"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(updated["location"], "berlin");
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected_without_a_request() {
        let server = mockito::Server::new_async().await;
        let result = service(&server)
            .update_event(&EventId::new("17"), &EventUpdate::default())
            .await;
        assert!(matches!(result, Err(VoxcalError::Calendar(_))));
    }

    #[tokio::test]
    async fn test_delete_targets_the_event_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/calendar.php")
            .match_query(Matcher::AllOf(vec![
                calendar_query(),
                Matcher::UrlEncoded("id".into(), "17".into()),
            ]))
            .with_status(200)
            .create_async()
            .await;

        service(&server)
            .delete_event(&EventId::new("17"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_errors_surface_as_calendar_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/calendar.php")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let result = service(&server).list_events().await;
        assert!(matches!(result, Err(VoxcalError::Calendar(_))));
    }
}
