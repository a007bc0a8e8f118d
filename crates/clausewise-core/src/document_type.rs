//! Contract categories understood by the primary analysis service.

use serde::{Deserialize, Serialize};

use crate::lenient;

/// One entry of the service's document-type catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentType {
    /// Wire value sent as the `document_type` form field, e.g. `NDA`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub value: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub label: String,
}

impl DocumentType {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }

    /// Catalogue used when the service cannot be asked.
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::new("GENERAL", "General Contract"),
            Self::new("NDA", "Non-Disclosure Agreement"),
            Self::new("EMPLOYMENT_AGREEMENT", "Employment Agreement"),
            Self::new("FOUNDER_AGREEMENT", "Founder Agreement"),
            Self::new("SAFE_AGREEMENT", "SAFE Agreement"),
        ]
    }
}

/// Body of the catalogue endpoint: `{"types": [...]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentTypeList {
    #[serde(default, deserialize_with = "lenient::seq")]
    pub types: Vec<DocumentType>,
}
