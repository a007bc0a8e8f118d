//! Advisory reachability checks for the analysis services.
//!
//! Probing only feeds the connectivity indicator. The orchestrator never
//! consults it: a healthy `/health` does not promise a working `/analyze`,
//! and a failed probe does not stop an analysis attempt.

use std::time::Duration;

use clausewise_core::BackendConfig;
use serde::Serialize;
use tracing::debug;

use crate::http::AnalysisClient;

/// Whether the service at `base_url` answers `GET /health` with a 2xx
/// within `timeout`. Never fails; every problem reads as `false`.
pub async fn probe(client: &reqwest::Client, base_url: &str, timeout: Duration) -> bool {
    let service = AnalysisClient::new(client.clone(), base_url);
    match tokio::time::timeout(timeout, service.health(timeout)).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            debug!(url = %base_url, error = %e, "health probe failed");
            false
        }
        Err(_) => {
            debug!(url = %base_url, ?timeout, "health probe timed out");
            false
        }
    }
}

/// Connectivity snapshot taken once at start-up and never re-polled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConnectivityStatus {
    pub primary: bool,
    pub secondary: bool,
}

impl ConnectivityStatus {
    /// Probe both services. The probes are independent, so they run together.
    pub async fn detect(client: &reqwest::Client, config: &BackendConfig) -> Self {
        let (primary, secondary) = tokio::join!(
            probe(client, &config.primary_url, config.probe_timeout),
            probe(client, &config.secondary_url, config.probe_timeout),
        );
        Self { primary, secondary }
    }

    /// Connected if either service answered.
    pub fn is_connected(&self) -> bool {
        self.primary || self.secondary
    }

    pub fn label(&self) -> &'static str {
        if self.is_connected() {
            "API Connected"
        } else {
            "Demo Mode"
        }
    }
}
