//! Upload unit and the local checks that gate any analysis attempt.

use std::path::Path;

use thiserror::Error;

/// Largest accepted upload: 5 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

const ACCEPTED_MEDIA_TYPES: &[&str] = &[
    "text/plain",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Accepted extensions paired with the media type a browser would declare.
const EXTENSIONS: &[(&str, &str)] = &[
    (".txt", "text/plain"),
    (".pdf", "application/pdf"),
    (".doc", "application/msword"),
    (
        ".docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please upload a .txt, .pdf, .doc, or .docx file")]
    UnsupportedType,
    #[error("File size must be less than 5MB")]
    TooLarge { size: u64, limit: u64 },
}

/// A contract document selected for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub name: String,
    /// Declared media type, if any.
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    /// Build a document, inferring the declared media type from the name.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let media_type = media_type_for_extension(&name).map(str::to_string);
        Self {
            name,
            media_type,
            bytes,
        }
    }

    /// Read a document from disk.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, bytes))
    }

    /// Override the declared media type.
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Media type conventionally declared for an accepted extension.
pub fn media_type_for_extension(name: &str) -> Option<&'static str> {
    let lower = name.to_ascii_lowercase();
    EXTENSIONS
        .iter()
        .find(|(ext, _)| lower.ends_with(ext))
        .map(|(_, media)| *media)
}

/// Check type and size before anything is sent over the network.
///
/// A file passes the type check if either its declared media type or its
/// extension is accepted.
pub fn validate(file: &DocumentFile) -> Result<(), ValidationError> {
    let type_ok = file
        .media_type
        .as_deref()
        .is_some_and(|m| ACCEPTED_MEDIA_TYPES.contains(&m));
    let ext_ok = media_type_for_extension(&file.name).is_some();
    if !type_ok && !ext_ok {
        return Err(ValidationError::UnsupportedType);
    }

    let size = file.size();
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}
