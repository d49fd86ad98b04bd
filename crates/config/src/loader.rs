// crates/config/src/loader.rs

use std::path::Path;

use tracing::debug;
use voxcal_core::{VoxcalError, VoxcalResult};

use crate::VoxcalConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Yaml,
    Json,
}

impl Format {
    fn of(path: &Path) -> VoxcalResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("toml") | None => Ok(Format::Toml),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            Some(other) => Err(VoxcalError::Config(format!(
                "Unsupported config format: .{}",
                other
            ))),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load_from_file(path: &Path) -> VoxcalResult<VoxcalConfig> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| VoxcalError::Config(format!("Failed to read config: {}", e)))?;

        let parse_error = |e: &dyn std::fmt::Display| {
            VoxcalError::Config(format!("Failed to parse config: {}", e))
        };
        let config: VoxcalConfig = match format {
            Format::Toml => toml::from_str(&content).map_err(|e| parse_error(&e))?,
            Format::Yaml => serde_yaml::from_str(&content).map_err(|e| parse_error(&e))?,
            Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(&e))?,
        };

        debug!(path = %path.display(), ?format, "Parsed config file");
        Ok(config)
    }

    pub fn save_to_file(path: &Path, config: &VoxcalConfig) -> VoxcalResult<()> {
        let serialize_error = |e: &dyn std::fmt::Display| {
            VoxcalError::Config(format!("Failed to serialize config: {}", e))
        };
        let content = match Format::of(path)? {
            Format::Toml => toml::to_string_pretty(config).map_err(|e| serialize_error(&e))?,
            Format::Yaml => serde_yaml::to_string(config).map_err(|e| serialize_error(&e))?,
            Format::Json => {
                serde_json::to_string_pretty(config).map_err(|e| serialize_error(&e))?
            }
        };

        std::fs::write(path, content)
            .map_err(|e| VoxcalError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Defaults with `VOXCAL_*` overrides.
    pub fn load_from_env() -> VoxcalResult<VoxcalConfig> {
        let mut config = VoxcalConfig::default();
        Self::apply_env(&mut config)?;
        Ok(config)
    }

    pub fn apply_env(config: &mut VoxcalConfig) -> VoxcalResult<()> {
        Self::apply_overrides(config, |key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    pub fn apply_overrides<F>(config: &mut VoxcalConfig, lookup: F) -> VoxcalResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("VOXCAL_WEATHER_API_URL") {
            config.weather.api_url = url;
        }
        if let Some(url) = lookup("VOXCAL_CALENDAR_API_URL") {
            config.calendar.api_url = url;
        }
        if let Some(id) = lookup("VOXCAL_CALENDAR_ID") {
            config.calendar.calendar_id = id;
        }
        if let Some(timeout) = lookup("VOXCAL_HTTP_TIMEOUT_S") {
            let timeout: u64 = timeout
                .trim()
                .parse()
                .map_err(|_| VoxcalError::Config("Invalid HTTP timeout".to_string()))?;
            config.weather.timeout_s = timeout;
            config.calendar.timeout_s = timeout;
        }
        if let Some(filter) = lookup("VOXCAL_LOG_FILTER") {
            config.observability.log_filter = filter;
        }
        if let Some(enabled) = lookup("VOXCAL_METRICS_ENABLED") {
            config.observability.metrics_enabled = enabled
                .trim()
                .parse()
                .map_err(|_| VoxcalError::Config("Invalid metrics flag".to_string()))?;
        }

        Ok(())
    }
}
