//! Candidate analysis sources, tried in order by the orchestrator.

use std::time::Duration;

use async_trait::async_trait;
use clausewise_core::{BackendResponse, CanonicalResult, DocumentFile, fallback};
use thiserror::Error;
use tracing::debug;

use crate::http::{AnalysisClient, ClientError};

/// Why a source produced no usable result. Always recovered by moving on to
/// the next source.
#[derive(Error, Debug)]
pub enum AttemptFailure {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("malformed analysis body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("backend reported an unsuccessful analysis")]
    Unsuccessful,
}

/// One link of the fallback chain.
#[async_trait]
pub trait AnalysisSource: Send + Sync {
    /// Short name used in traces and attempt records.
    fn name(&self) -> &'static str;

    async fn attempt(
        &self,
        file: &DocumentFile,
        document_type: Option<&str>,
    ) -> Result<CanonicalResult, AttemptFailure>;
}

/// Backend A. Its body is either canonical or a native validation report,
/// which is adapted.
pub struct PrimarySource {
    client: AnalysisClient,
}

impl PrimarySource {
    pub fn new(client: AnalysisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnalysisSource for PrimarySource {
    fn name(&self) -> &'static str {
        "primary"
    }

    async fn attempt(
        &self,
        file: &DocumentFile,
        document_type: Option<&str>,
    ) -> Result<CanonicalResult, AttemptFailure> {
        let body = self.client.analyze(file, document_type).await?;
        let response = BackendResponse::from_slice(&body)?;
        if matches!(response, BackendResponse::Native(_)) {
            debug!(file = %file.name, "adapting native validation report");
        }
        usable(response.into_canonical(&file.name))
    }
}

/// Backend B. Its body is taken as canonical without adaptation.
pub struct SecondarySource {
    client: AnalysisClient,
}

impl SecondarySource {
    pub fn new(client: AnalysisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnalysisSource for SecondarySource {
    fn name(&self) -> &'static str {
        "secondary"
    }

    async fn attempt(
        &self,
        file: &DocumentFile,
        document_type: Option<&str>,
    ) -> Result<CanonicalResult, AttemptFailure> {
        let body = self.client.analyze(file, document_type).await?;
        let result = CanonicalResult::from_slice(&body)?;
        usable(result.normalize(&file.name))
    }
}

/// Local last resort: the fixed founder-agreement analysis after a simulated
/// processing delay. Never fails.
pub struct SyntheticSource {
    delay: Duration,
}

impl SyntheticSource {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn generate(&self, file: &DocumentFile) -> CanonicalResult {
        tokio::time::sleep(self.delay).await;
        fallback::founder_agreement(&file.name)
    }
}

#[async_trait]
impl AnalysisSource for SyntheticSource {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    async fn attempt(
        &self,
        file: &DocumentFile,
        _document_type: Option<&str>,
    ) -> Result<CanonicalResult, AttemptFailure> {
        Ok(self.generate(file).await)
    }
}

fn usable(result: CanonicalResult) -> Result<CanonicalResult, AttemptFailure> {
    if result.success {
        Ok(result)
    } else {
        Err(AttemptFailure::Unsuccessful)
    }
}
