//! Blob storage access for archived invoice documents.
//!
//! The invoice record stores a full public URL; the sweep resolves it back to
//! an object path by the fixed `/object/public/invoices/` prefix and
//! downloads the raw bytes for hashing. Download failures are scoped to the
//! invoice being processed, never to the whole sweep.

use async_trait::async_trait;
use url::Url;

use crate::middleware::error_handling::{ComplianceError, Result};

/// Fixed public-bucket prefix embedded in every stored document URL.
pub const PUBLIC_OBJECT_PREFIX: &str = "/object/public/invoices/";

/// Resolve the storage object path from an invoice's public document URL.
/// Returns `None` when the URL does not parse or does not contain the fixed
/// prefix - the caller reports a per-invoice resolution failure.
pub fn extract_storage_path(document_url: &str) -> Option<String> {
    let parsed = Url::parse(document_url).ok()?;
    let path = parsed.path();

    let idx = path.find(PUBLIC_OBJECT_PREFIX)?;
    let object_path = &path[idx + PUBLIC_OBJECT_PREFIX.len()..];

    if object_path.is_empty() {
        return None;
    }

    Some(object_path.to_string())
}

/// "Download bytes at path" is the only operation this core needs from blob
/// storage.
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    async fn download(&self, path: &str) -> Result<Vec<u8>>;
}

/// Production implementation: HTTP GET against the public invoice bucket.
/// No timeout is enforced here; a stalled download stalls only the current
/// invoice's sweep step.
pub struct HttpDocumentStorage {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDocumentStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DocumentStorage for HttpDocumentStorage {
    async fn download(&self, path: &str) -> Result<Vec<u8>> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ComplianceError::ResourceResolution(format!(
                "document download returned status {} for {}",
                response.status(),
                path
            )));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
