//! Backend layer: HTTP clients for the two analysis services, advisory
//! health probing, and the ordered fallback chain that always yields a result.

pub mod http;
pub mod orchestrator;
pub mod probe;
pub mod session;
pub mod source;

pub use http::{AnalysisClient, ClientError, ServiceInfo};
pub use orchestrator::{AnalysisError, AnalysisOutcome, AttemptRecord, Orchestrator};
pub use probe::{ConnectivityStatus, probe};
pub use session::{AnalysisSession, SessionError};
pub use source::{AnalysisSource, AttemptFailure, PrimarySource, SecondarySource, SyntheticSource};
