//! Structured telemetry initialisation for the host process.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use shadowlint_config::{LogFormat, Settings};
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned when telemetry has been initialised.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured log filter expression is invalid.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// The tracing subscriber could not be installed, usually because the
    /// host already installed its own.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global tracing subscriber on first use.
///
/// Later calls return a fresh [`TelemetryHandle`] without touching global
/// state. Hosts that manage their own subscriber should skip this call; the
/// library only emits events and never requires a subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter does not parse or another
/// global subscriber is already installed.
///
/// ```rust
/// use shadowlint::telemetry;
/// use shadowlint_config::Settings;
///
/// # fn main() -> Result<(), shadowlint::telemetry::TelemetryError> {
/// let settings = Settings::default();
/// let first = telemetry::initialise(&settings)?;
/// let second = telemetry::initialise(&settings)?;
/// drop((first, second));
/// # Ok(())
/// # }
/// ```
pub fn initialise(settings: &Settings) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(settings))
        .map(|_| TelemetryHandle)
}

fn install_subscriber(settings: &Settings) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_new(settings.log_filter())
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;

    let builder = |env_filter: EnvFilter| {
        fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            // Editors capture stdout for other purposes.
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .with_timer(fmt::time::UtcTime::rfc_3339())
    };

    let subscriber: Box<dyn Subscriber + Send + Sync> = match settings.log_format() {
        LogFormat::Json => Box::new(builder(filter).json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder(filter).compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}
