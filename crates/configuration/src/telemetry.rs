use crate::error::ConfigError;
use crate::settings::LoggingSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "newsdesk.log";

/// Installs the global tracing subscriber.
///
/// When a log directory is configured, output goes to a daily-rotated file
/// through a non-blocking writer. The returned guard must be held for the
/// lifetime of the process, or buffered lines are lost on exit.
pub fn init_tracing(settings: &LoggingSettings) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter = env_filter(&settings.level)?;

    match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|e| ConfigError::TelemetryError(e.to_string()))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .try_init()
                .map_err(|e| ConfigError::TelemetryError(e.to_string()))?;
            Ok(None)
        }
    }
}

/// `RUST_LOG` wins over the configured directive.
fn env_filter(level: &str) -> Result<EnvFilter, ConfigError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| ConfigError::TelemetryError(format!("invalid log level `{level}`: {e}"))),
    }
}
