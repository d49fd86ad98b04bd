// crates/config/src/lib.rs

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use voxcal_core::VoxcalResult;

pub mod loader;
pub mod validator;

pub use loader::ConfigLoader;
pub use validator::ConfigValidator;
pub use voxcal_actions::{CalendarConfig, WeatherConfig};
pub use voxcal_nlu::NluConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoxcalConfig {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub nlu: NluConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Utterances that end the conversation.
    #[serde(default = "default_exit_words")]
    pub exit_words: Vec<String>,
    #[serde(default = "default_greeting")]
    pub greeting: String,
    #[serde(default = "default_farewell")]
    pub farewell: String,
}

fn default_exit_words() -> Vec<String> {
    vec!["exit".to_string(), "quit".to_string(), "stop".to_string()]
}

fn default_greeting() -> String {
    "Hello, I am your assistant. How can I help you?".to_string()
}

fn default_farewell() -> String {
    "Goodbye!".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            exit_words: default_exit_words(),
            greeting: default_greeting(),
            farewell: default_farewell(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_log_filter() -> String {
    "voxcal=debug,info".to_string()
}

const fn default_metrics_enabled() -> bool {
    true
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

impl VoxcalConfig {
    /// True when `utterance` is one of the configured exit words.
    pub fn is_exit_word(&self, utterance: &str) -> bool {
        let utterance = utterance.trim();
        self.app
            .exit_words
            .iter()
            .any(|word| word.trim().eq_ignore_ascii_case(utterance))
    }
}

/// Owns the active configuration
pub struct ConfigManager {
    config: VoxcalConfig,
}

impl ConfigManager {
    /// Loads `config_path`, applies `VOXCAL_*` overrides and validates.
    pub fn new(config_path: impl AsRef<Path>) -> VoxcalResult<Self> {
        let config_path = config_path.as_ref();
        let mut config = ConfigLoader::load_from_file(config_path)?;
        ConfigLoader::apply_env(&mut config)?;

        ConfigValidator::validate(&config)?;
        info!(path = %config_path.display(), "Configuration loaded");

        Ok(Self { config })
    }

    /// Defaults plus `VOXCAL_*` overrides.
    pub fn from_env() -> VoxcalResult<Self> {
        let config = ConfigLoader::load_from_env()?;
        ConfigValidator::validate(&config)?;

        Ok(Self { config })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: VoxcalConfig::default(),
        }
    }

    pub fn get(&self) -> VoxcalConfig {
        self.config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxcal_core::VoxcalError;

    #[test]
    fn test_defaults_are_valid() {
        let config = VoxcalConfig::default();
        assert!(ConfigValidator::validate(&config).is_ok());
        assert_eq!(config.calendar.default_location, "Office");
        assert_eq!(config.weather.timeout_s, 10);
        assert_eq!(config.observability.log_filter, "voxcal=debug,info");
    }

    #[test]
    fn test_exit_words_ignore_case_and_padding() {
        let config = VoxcalConfig::default();
        assert!(config.is_exit_word("Stop"));
        assert!(config.is_exit_word("  quit \n"));
        assert!(!config.is_exit_word("stop the rain"));
    }

    #[test]
    fn test_manager_loads_and_validates_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voxcal.toml");
        std::fs::write(
            &path,
            "[calendar]\ncalendar_id = \"team\"\n\n[nlu]\nextra_places = [\"Dresden\"]\n",
        )
        .unwrap();

        let manager = ConfigManager::new(&path).unwrap();
        assert_eq!(manager.get().calendar.calendar_id, "team");
        assert_eq!(manager.get().nlu.extra_places, vec!["Dresden".to_string()]);
        assert_eq!(manager.get().app.farewell, "Goodbye!");

        std::fs::write(&path, "[weather]\ntimeout_s = 0\n").unwrap();
        assert!(matches!(
            ConfigManager::new(&path),
            Err(VoxcalError::Config(_))
        ));
    }

    #[test]
    fn test_with_defaults_matches_default_config() {
        let config = ConfigManager::with_defaults().get();
        assert_eq!(config.app.exit_words, VoxcalConfig::default().app.exit_words);
        assert!(config.observability.metrics_enabled);
    }
}
