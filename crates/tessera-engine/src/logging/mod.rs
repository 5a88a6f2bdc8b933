//! Logger setup for binaries and tests built on the engine.
//!
//! The engine itself only emits through the `log` facade:
//! - `debug` for per-tile builds, uploads and pipeline creation
//! - `trace` for per-frame encoding
//! - `warn` for skipped layers and recoverable GPU fallbacks

mod init;

pub use init::{DEFAULT_FILTER, LoggingConfig, init_logging};
