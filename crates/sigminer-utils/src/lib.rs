//! # sigminer Utilities
//!
//! Shared utilities for the sigminer workspace; currently the `tracing`
//! setup used by the command-line tool.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{
    init_logging, init_logging_from, init_logging_with_level, LogFormat, LogLevel, LoggingConfig, LoggingError,
    LoggingGuard,
};
pub use tracing::{debug, error, info, trace, warn};
