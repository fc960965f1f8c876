use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "invalid log level/filter '{}'", value)
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Install the global subscriber. Logs go to stderr so stdout carries only
/// command output.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directive = filter_directive(config, rust_log.as_deref());
    let env_filter = EnvFilter::try_new(directive).map_err(|source| TelemetryError::EnvFilter {
        value: directive.to_string(),
        source,
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

/// `--log-level`, then `RUST_LOG`, then `KPR_LOG_LEVEL` or the default.
fn filter_directive<'a>(config: &'a TelemetryConfig, rust_log: Option<&'a str>) -> &'a str {
    match rust_log.map(str::trim).filter(|v| !v.is_empty()) {
        Some(directive) if !config.from_flag => directive,
        _ => &config.log_level,
    }
}
