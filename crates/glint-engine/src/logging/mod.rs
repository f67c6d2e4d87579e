//! Logging setup.
//!
//! The engine itself only uses the `log` facade; this module provides the
//! one-time `env_logger` initialization an application calls from `main`.

mod init;

pub use init::{LoggingConfig, init_logging};
