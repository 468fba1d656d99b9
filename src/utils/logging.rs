use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

use crate::config::LoggingConfig;
use crate::utils::{IntelError, IntelResult};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Initialize the logging system from the logging settings
///
/// `RUST_LOG` takes precedence over the configured level. When a log file is
/// configured, records are appended to it without ANSI colours.
pub fn init_logging(config: &LoggingConfig) -> IntelResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()));

    let result = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(|e| IntelError::Internal(format!("failed to set tracing subscriber: {}", e)))
}

/// Log a Cloudflare API event
pub fn log_cloudflare_event(event_type: &str, success: bool, details: Option<&str>) {
    if success {
        tracing::info!(event_type = %event_type, success, details = ?details);
    } else {
        tracing::error!(event_type = %event_type, success, details = ?details);
    }
}
