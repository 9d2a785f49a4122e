//! Tracing setup: structured JSON logs, plus OTLP span export when configured.
//!
//! # Telemetry invariants
//!
//! - **No key material or tokens** may appear in any span attribute or log field.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`) and
//!   overridden by `RUST_LOG` when set.

pub mod init;

pub use init::init_telemetry;
