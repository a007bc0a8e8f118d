//! HTTP client for a contract-analysis service.

use std::time::Duration;

use clausewise_core::{DocumentFile, DocumentType, DocumentTypeList};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Service description served at the primary backend's root.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub status: String,
    pub validator_loaded: bool,
}

/// Client for one analysis service's `/health` and `/analyze` endpoints.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    /// Create a client for the given service base URL.
    ///
    /// `base_url` should be like `http://localhost:5000`; a trailing slash is
    /// dropped.
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /health`, bounded by `timeout`. Any 2xx means ready.
    pub async fn health(&self, timeout: Duration) -> Result<(), ClientError> {
        let url = format!("{}/health", self.base_url);
        debug!(url = %url, "probing service health");
        let resp = self.client.get(&url).timeout(timeout).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Upload a document to `POST /analyze` as multipart field `file`.
    ///
    /// Returns the raw 2xx body; interpreting it is the caller's concern.
    /// The request has no timeout of its own.
    pub async fn analyze(
        &self,
        file: &DocumentFile,
        document_type: Option<&str>,
    ) -> Result<Vec<u8>, ClientError> {
        let url = format!("{}/analyze", self.base_url);

        let mut form = Form::new().part("file", file_part(file));
        if let Some(kind) = document_type {
            form = form.text("document_type", kind.to_string());
        }

        info!(url = %url, file = %file.name, bytes = file.bytes.len(), "submitting document for analysis");
        let resp = self.client.post(&url).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await?;
        debug!(bytes = body.len(), "analysis body received");
        Ok(body.to_vec())
    }

    /// `GET /document-types`: the contract categories the service recognises.
    pub async fn document_types(&self) -> Result<Vec<DocumentType>, ClientError> {
        let url = format!("{}/document-types", self.base_url);
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }
        let body = resp.bytes().await?;
        let list: DocumentTypeList = serde_json::from_slice(&body)?;
        info!(count = list.types.len(), "fetched document types");
        Ok(list.types)
    }

    /// `GET /`: service name, version and whether its validator is loaded.
    pub async fn service_info(&self) -> Result<ServiceInfo, ClientError> {
        let url = format!("{}/", self.base_url);
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Multipart part carrying the document. An unparsable declared media type is
/// left off rather than failing the upload.
fn file_part(file: &DocumentFile) -> Part {
    let part = || Part::bytes(file.bytes.clone()).file_name(file.name.clone());
    match file.media_type.as_deref().map(|m| part().mime_str(m)) {
        Some(Ok(p)) => p,
        _ => part(),
    }
}
