//! Core types for clausewise: the canonical analysis result, upload
//! validation, backend schema adaptation, and the offline fallback dataset.

pub mod adapter;
pub mod config;
pub mod document_type;
pub mod fallback;
mod lenient;
pub mod model;
pub mod upload;

pub use adapter::{
    BackendResponse, NativeFlaw, NativeResponse, NativeValidation, adapt, normalize_category,
};
pub use config::BackendConfig;
pub use document_type::{DocumentType, DocumentTypeList};
pub use model::{
    CanonicalResult, Clause, ComplianceEntry, DOCUMENT_STATUS_CLAUSE, Entity, IndividualRisk,
    RiskAssessment, RiskLevel, Severity,
};
pub use upload::{DocumentFile, MAX_UPLOAD_BYTES, ValidationError, validate};
