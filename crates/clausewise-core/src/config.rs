//! Backend endpoints and timing constants.

use std::time::Duration;

pub const DEFAULT_PRIMARY_URL: &str = "http://localhost:5000";
pub const DEFAULT_SECONDARY_URL: &str = "http://localhost:8000";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(2000);
/// Simulated latency of the offline fallback. Not a timeout or retry interval.
pub const DEFAULT_FALLBACK_DELAY: Duration = Duration::from_millis(2000);

/// Where the two analysis services live and how long to wait on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Backend A, tried first. May answer in its native validation shape.
    pub primary_url: String,
    /// Backend B, tried second. Answers in the canonical shape.
    pub secondary_url: String,
    /// Bound on each health probe. Analysis calls are not bounded.
    pub probe_timeout: Duration,
    pub fallback_delay: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMARY_URL, DEFAULT_SECONDARY_URL)
    }
}

impl BackendConfig {
    /// Base URLs are stored without trailing slashes.
    pub fn new(primary_url: impl AsRef<str>, secondary_url: impl AsRef<str>) -> Self {
        Self {
            primary_url: trim_base(primary_url.as_ref()),
            secondary_url: trim_base(secondary_url.as_ref()),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            fallback_delay: DEFAULT_FALLBACK_DELAY,
        }
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_fallback_delay(mut self, delay: Duration) -> Self {
        self.fallback_delay = delay;
        self
    }
}

pub(crate) fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
