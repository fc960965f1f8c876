use std::env;
use std::fmt;

use kpr_core::advisory::AdvisorSettings;

const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Runtime configuration assembled from the environment and `.env`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub advisor: AdvisorConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load `.env`, then read the process environment. A setting that does
    /// not parse keeps its default and is reported; the others still apply.
    pub fn load() -> (Self, Vec<ConfigError>) {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> (Self, Vec<ConfigError>) {
        let mut config = Self::default();
        let mut errors = Vec::new();
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        config.advisor.api_key = read("GOOGLE_API_KEY");
        if let Some(model) = read("KPR_MODEL") {
            config.advisor.settings.model = model;
        }
        if let Some(raw) = read("KPR_TEMPERATURE") {
            match raw.parse::<f32>() {
                Ok(temperature) => config.advisor.settings.temperature = temperature,
                Err(_) => errors.push(ConfigError::InvalidTemperature(raw)),
            }
        }
        if let Some(raw) = read("KPR_TIMEOUT_SECONDS") {
            match raw.parse::<u64>() {
                Ok(seconds) if seconds > 0 => config.advisor.timeout_seconds = seconds,
                _ => errors.push(ConfigError::InvalidTimeout(raw)),
            }
        }
        if let Some(level) = read("KPR_LOG_LEVEL") {
            config.telemetry.log_level = level;
        }

        (config, errors)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            advisor: AdvisorConfig {
                api_key: None,
                settings: AdvisorSettings::default(),
                timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            },
            telemetry: TelemetryConfig {
                log_level: DEFAULT_LOG_LEVEL.to_string(),
                from_flag: false,
            },
        }
    }
}

/// Settings for the hosted model behind the advisory chat.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub api_key: Option<String>,
    pub settings: AdvisorSettings,
    pub timeout_seconds: u64,
}

/// Log filter. `RUST_LOG` wins over `KPR_LOG_LEVEL`, but not over an
/// explicit `--log-level`.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub from_flag: bool,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    InvalidTemperature(String),
    InvalidTimeout(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTemperature(value) => write!(
                f,
                "KPR_TEMPERATURE must be a number, got '{value}'; using {}",
                kpr_core::advisory::DEFAULT_TEMPERATURE
            ),
            ConfigError::InvalidTimeout(value) => write!(
                f,
                "KPR_TIMEOUT_SECONDS must be a positive whole number, got '{value}'; using {DEFAULT_TIMEOUT_SECONDS}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
