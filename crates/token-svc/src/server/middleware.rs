//! Defaults for the middleware layers attached in [`super::router::build`].

use std::time::Duration;

/// Per-request timeout used when `REQUEST_TIMEOUT_SECS` is unset.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
