//! Analysis session: the state a front end keeps around the orchestrator.
//!
//! Holds the start-up connectivity snapshot, the "analyzing" flag, and the
//! current result. Only one analysis runs at a time; a second request while
//! one is pending is rejected, not queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use clausewise_core::{BackendConfig, CanonicalResult, DocumentFile, ValidationError, validate};
use thiserror::Error;
use tracing::{info, warn};

use crate::orchestrator::{AnalysisError, AnalysisOutcome, Orchestrator};
use crate::probe::ConnectivityStatus;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("an analysis is already in progress")]
    Busy,
    #[error("Analysis failed. Please try again.")]
    Failed(#[from] AnalysisError),
}

pub struct AnalysisSession {
    orchestrator: Orchestrator,
    status: ConnectivityStatus,
    analyzing: AtomicBool,
    current: Mutex<Option<Arc<CanonicalResult>>>,
}

/// Clears the analyzing flag when the analysis ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AnalysisSession {
    pub fn new(orchestrator: Orchestrator, status: ConnectivityStatus) -> Self {
        Self {
            orchestrator,
            status,
            analyzing: AtomicBool::new(false),
            current: Mutex::new(None),
        }
    }

    /// Probe both services once, then build the standard chain.
    pub async fn connect(config: &BackendConfig) -> Self {
        let client = reqwest::Client::new();
        let status = ConnectivityStatus::detect(&client, config).await;
        info!(
            primary = status.primary,
            secondary = status.secondary,
            mode = status.label(),
            "connectivity detected"
        );
        Self::new(Orchestrator::from_config(client, config), status)
    }

    pub fn status(&self) -> ConnectivityStatus {
        self.status
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing.load(Ordering::Acquire)
    }

    /// The result of the last completed analysis, if it has not been reset.
    pub fn current(&self) -> Option<Arc<CanonicalResult>> {
        self.lock_current().clone()
    }

    /// Discard the current result.
    pub fn reset(&self) {
        *self.lock_current() = None;
    }

    /// Validate and analyze `file`, replacing the current result.
    ///
    /// Validation failures return before any network activity.
    pub async fn analyze(
        &self,
        file: &DocumentFile,
        document_type: Option<&str>,
    ) -> Result<Arc<CanonicalResult>, SessionError> {
        validate(file)?;

        if self.analyzing.swap(true, Ordering::AcqRel) {
            return Err(SessionError::Busy);
        }
        let _in_flight = InFlight(&self.analyzing);
        self.reset();

        match self.orchestrator.analyze_as(file, document_type).await {
            Ok(AnalysisOutcome { result, source, .. }) => {
                info!(source, file = %file.name, "analysis ready");
                let result = Arc::new(result);
                *self.lock_current() = Some(Arc::clone(&result));
                Ok(result)
            }
            Err(e) => {
                warn!(error = %e, file = %file.name, "analysis failed");
                Err(e.into())
            }
        }
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, Option<Arc<CanonicalResult>>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
