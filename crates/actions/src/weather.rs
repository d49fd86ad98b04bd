// crates/actions/src/weather.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::WeatherService;
use voxcal_core::{VoxcalError, VoxcalResult, WeatherReport};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_s: u64,
}

fn default_api_url() -> String {
    "https://api.responsible-nlp.net/weather.php".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_s: default_timeout(),
        }
    }
}

/// Form-encoded POST of `place`, JSON forecast back.
pub struct HttpWeatherService {
    config: WeatherConfig,
    client: Client,
}

impl HttpWeatherService {
    pub fn new(config: WeatherConfig) -> VoxcalResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_s))
            .build()
            .map_err(|e| VoxcalError::Weather(e.to_string()))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl WeatherService for HttpWeatherService {
    async fn forecast(&self, place: &str) -> VoxcalResult<WeatherReport> {
        debug!(place, url = %self.config.api_url, "Requesting forecast");

        let response = self
            .client
            .post(&self.config.api_url)
            .form(&[("place", place)])
            .send()
            .await
            .map_err(|e| VoxcalError::Network(format!("Weather request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(VoxcalError::Weather(format!(
                "Weather service error: {}",
                response.status()
            )));
        }

        response
            .json::<WeatherReport>()
            .await
            .map_err(|e| VoxcalError::Weather(format!("Malformed forecast: {}", e)))
    }

    fn name(&self) -> &str {
        "http_weather"
    }
}
