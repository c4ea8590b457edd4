//! Logging utilities.
//!
//! This module centralizes logger initialization. It is intentionally small and
//! avoids imposing a specific logging backend beyond the standard `log` facade.

mod init;

pub use init::{DEFAULT_FILTER, LoggingConfig, init_logging};
