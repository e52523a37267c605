//! Utility modules for workflow-advisor

pub mod logging;

pub use logging::{init_logging, parse_level, LoggingConfig};
