//! The fallback chain: primary service, then secondary service, then the
//! local synthetic result.
//!
//! Sources are tried strictly one after another. The next source is only
//! contacted once the previous call has fully resolved, so at most one
//! request is outstanding and the first usable answer wins. Health probes
//! play no part here.

use chrono::{DateTime, Utc};
use clausewise_core::{BackendConfig, CanonicalResult, DocumentFile};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::http::AnalysisClient;
use crate::source::{AnalysisSource, PrimarySource, SecondarySource, SyntheticSource};

/// One step of the chain, kept for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptRecord {
    pub source: &'static str,
    /// `None` when this attempt produced the result.
    pub error: Option<String>,
    pub at: DateTime<Utc>,
}

/// The result together with the path taken to get it.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: CanonicalResult,
    pub source: &'static str,
    pub attempts: Vec<AttemptRecord>,
}

impl AnalysisOutcome {
    /// Whether the result came from the offline dataset.
    pub fn is_synthetic(&self) -> bool {
        self.source == "synthetic"
    }
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("all {} analysis sources failed", .attempts.len())]
    Exhausted { attempts: Vec<AttemptRecord> },
}

pub struct Orchestrator {
    sources: Vec<Box<dyn AnalysisSource>>,
}

impl Orchestrator {
    /// Chain over explicit sources, tried in the given order.
    pub fn new(sources: Vec<Box<dyn AnalysisSource>>) -> Self {
        Self { sources }
    }

    /// The standard chain: primary, secondary, synthetic.
    pub fn from_config(client: reqwest::Client, config: &BackendConfig) -> Self {
        Self::new(vec![
            Box::new(PrimarySource::new(AnalysisClient::new(
                client.clone(),
                &config.primary_url,
            ))),
            Box::new(SecondarySource::new(AnalysisClient::new(
                client,
                &config.secondary_url,
            ))),
            Box::new(SyntheticSource::new(config.fallback_delay)),
        ])
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub async fn analyze(&self, file: &DocumentFile) -> Result<AnalysisOutcome, AnalysisError> {
        self.analyze_as(file, None).await
    }

    /// Analyze with an optional `document_type` hint forwarded to the services.
    pub async fn analyze_as(
        &self,
        file: &DocumentFile,
        document_type: Option<&str>,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let mut attempts = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            info!(source = source.name(), file = %file.name, "attempting analysis");
            match source.attempt(file, document_type).await {
                Ok(result) => {
                    info!(
                        source = source.name(),
                        clauses = result.clauses.len(),
                        overall_risk = %result.risk_assessment.overall_risk,
                        "analysis complete"
                    );
                    attempts.push(AttemptRecord {
                        source: source.name(),
                        error: None,
                        at: Utc::now(),
                    });
                    return Ok(AnalysisOutcome {
                        result,
                        source: source.name(),
                        attempts,
                    });
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "analysis source unavailable, falling through");
                    attempts.push(AttemptRecord {
                        source: source.name(),
                        error: Some(e.to_string()),
                        at: Utc::now(),
                    });
                }
            }
        }

        Err(AnalysisError::Exhausted { attempts })
    }
}
