//! Structured logging setup
//!
//! Logs go to stderr so stdout stays free for command output. Filtering
//! honours `RUST_LOG` on top of the configured level for this crate.
//!
//! # Example
//!
//! ```no_run
//! use workflow_advisor::util::logging;
//! use tracing::{debug, info};
//!
//! logging::init_logging(logging::LoggingConfig::from_env());
//!
//! info!("Starting");
//! debug!(job = "go-build", "Added job");
//! ```

use std::env;
use std::io;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_LEVEL_ENV: &str = "WORKFLOW_ADVISOR_LOG_LEVEL";
const LOG_JSON_ENV: &str = "WORKFLOW_ADVISOR_LOG_JSON";

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for events from this crate
    pub level: Level,

    /// Emit one JSON object per event instead of human-readable lines
    pub use_json: bool,

    /// Include the module target (e.g. `workflow_advisor::detection`)
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,

    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    /// WARN level, plain text, targets only. A CLI run is quiet unless asked.
    fn default() -> Self {
        Self {
            level: Level::WARN,
            use_json: false,
            include_target: true,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Reads `WORKFLOW_ADVISOR_LOG_LEVEL` and `WORKFLOW_ADVISOR_LOG_JSON`
    pub fn from_env() -> Self {
        Self::from_values(env::var(LOG_LEVEL_ENV).ok(), env::var(LOG_JSON_ENV).ok())
    }

    /// Unset or unparsable values keep the defaults
    fn from_values(level: Option<String>, json: Option<String>) -> Self {
        Self {
            level: level.map_or(Level::WARN, |v| parse_level(&v)),
            use_json: json.and_then(|v| v.parse::<bool>().ok()).unwrap_or(false),
            ..Default::default()
        }
    }
}

/// Parses a log level, case-insensitively. Unknown values fall back to WARN.
pub fn parse_level(level_str: &str) -> Level {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to WARN. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::WARN
        }
    }
}

fn build_filter(level: Level) -> EnvFilter {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    match format!("workflow_advisor={}", level).parse::<Directive>() {
        Ok(directive) if env::var("RUST_LOG").is_err() => filter.add_directive(directive),
        _ => filter,
    }
}

/// Installs the global subscriber. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_thread_ids(config.include_thread_ids),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_thread_ids(config.include_thread_ids),
                )
                .init();
        }
    });
}
