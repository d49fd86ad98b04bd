// crates/config/src/validator.rs

use tracing::warn;
use voxcal_core::{VoxcalError, VoxcalResult};

use crate::VoxcalConfig;

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &VoxcalConfig) -> VoxcalResult<()> {
        // Validate collaborator endpoints
        Self::validate_url("weather.api_url", &config.weather.api_url)?;
        Self::validate_url("calendar.api_url", &config.calendar.api_url)?;
        if config.weather.timeout_s == 0 {
            return Err(VoxcalError::Config("Weather timeout must be > 0".to_string()));
        }
        if config.calendar.timeout_s == 0 {
            return Err(VoxcalError::Config("Calendar timeout must be > 0".to_string()));
        }
        if config.calendar.calendar_id.trim().is_empty() {
            return Err(VoxcalError::Config("Calendar id must not be empty".to_string()));
        }
        if config.calendar.default_location.trim().is_empty() {
            warn!("No default event location configured");
        }

        // Validate conversation settings
        if config.app.exit_words.iter().all(|word| word.trim().is_empty()) {
            return Err(VoxcalError::Config(
                "At least one exit word is required".to_string(),
            ));
        }

        // Validate NLU settings
        if config
            .nlu
            .extra_places
            .iter()
            .any(|place| place.trim().is_empty())
        {
            return Err(VoxcalError::Config(
                "Extra places must not be blank".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_url(field: &str, url: &str) -> VoxcalResult<()> {
        let url = url.trim();
        let has_host = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .is_some_and(|rest| !rest.is_empty());

        if !has_host {
            return Err(VoxcalError::Config(format!(
                "{} must be an http(s) URL, got {:?}",
                field, url
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(mutate: impl FnOnce(&mut VoxcalConfig)) -> bool {
        let mut config = VoxcalConfig::default();
        mutate(&mut config);
        matches!(
            ConfigValidator::validate(&config),
            Err(VoxcalError::Config(_))
        )
    }

    #[test]
    fn test_endpoints_must_be_http() {
        assert!(rejected(|c| c.weather.api_url = "ftp://example.org".to_string()));
        assert!(rejected(|c| c.calendar.api_url = "https://".to_string()));
        assert!(!rejected(|c| c.calendar.api_url = "http://localhost:8080/cal".to_string()));
    }

    #[test]
    fn test_timeouts_and_ids_are_checked() {
        assert!(rejected(|c| c.weather.timeout_s = 0));
        assert!(rejected(|c| c.calendar.timeout_s = 0));
        assert!(rejected(|c| c.calendar.calendar_id = "  ".to_string()));
    }

    #[test]
    fn test_conversation_needs_an_exit_word() {
        assert!(rejected(|c| c.app.exit_words.clear()));
        assert!(rejected(|c| c.app.exit_words = vec![" ".to_string()]));
        assert!(!rejected(|c| c.app.exit_words = vec!["bye".to_string()]));
    }

    #[test]
    fn test_blank_extra_places_are_rejected() {
        assert!(rejected(|c| c.nlu.extra_places = vec!["".to_string()]));
        assert!(!rejected(|c| c.nlu.extra_places = vec!["Dresden".to_string()]));
    }
}
