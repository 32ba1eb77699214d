//! HTTP transport for the import service
//!
//! Wraps a pooled reqwest client with the service's three routes:
//! - `POST /import/products` (multipart upload of the whole file)
//! - `GET /import/products/result/{download_id}` (result spreadsheet)
//! - `GET /health`

use std::path::{Path, PathBuf};

use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, Response};
use serde::Deserialize;
use tracing::{debug, info, warn};

use bulkload_core::types::SourceFile;
use bulkload_core::{
    ClientConfig, HEALTH_PATH, IMPORT_PATH, RESULT_FILENAME, RESULT_PATH, UPLOAD_FIELD,
};

use crate::error::{ClientResult, ImportError};

/// Characters left as-is in a download id path segment
const ID_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Body of the health check
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Client for the remote import service
#[derive(Debug, Clone)]
pub struct ImportClient {
    client: Client,
    base_url: String,
}

impl ImportClient {
    /// Create a client for the configured endpoint
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let client = ClientBuilder::new()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(concat!("bulkload/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ImportError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn import_url(&self) -> String {
        format!("{}{}", self.base_url, IMPORT_PATH)
    }

    pub fn result_url(&self, download_id: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            RESULT_PATH,
            utf8_percent_encode(download_id, ID_SEGMENT)
        )
    }

    /// Build the multipart body carrying the complete file
    pub async fn build_form(&self, file: &SourceFile) -> ClientResult<Form> {
        let data = file.read_bytes().await?;
        let mime = mime_guess::from_path(file.name()).first_or_octet_stream();

        debug!(file = %file.name(), bytes = data.len(), mime = %mime, "Prepared upload body");

        let part = Part::bytes(data)
            .file_name(file.name().to_string())
            .mime_str(mime.as_ref())?;

        Ok(Form::new().part(UPLOAD_FIELD, part))
    }

    /// Dispatch the import request; resolves once response headers arrive
    pub async fn post_import(&self, form: Form) -> ClientResult<Response> {
        let url = self.import_url();
        debug!(url = %url, "Dispatching import request");

        let response = self.client.post(&url).multipart(form).send().await?;
        Ok(response)
    }

    /// Fetch a result artifact by its download id
    pub async fn fetch_artifact(&self, download_id: &str) -> ClientResult<Bytes> {
        let url = self.result_url(download_id);
        debug!(url = %url, "Fetching import result");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(download_failed)?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Result download rejected");
            return Err(ImportError::Download {
                status: Some(status.as_u16()),
                message: if text.is_empty() {
                    format!("Request failed with status {}", status)
                } else {
                    text
                },
            });
        }

        response.bytes().await.map_err(download_failed)
    }

    /// Download a result artifact and save it as `dir/import_results.xlsx`
    pub async fn save_artifact(&self, download_id: &str, dir: &Path) -> ClientResult<PathBuf> {
        let data = self.fetch_artifact(download_id).await?;

        let path = dir.join(RESULT_FILENAME);
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(download_failed)?;
        tokio::fs::write(&path, &data)
            .await
            .map_err(download_failed)?;

        info!(path = %path.display(), bytes = data.len(), "Saved import result");
        Ok(path)
    }

    /// Check the service health endpoint
    pub async fn health(&self) -> ClientResult<HealthStatus> {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ImportError::Transport(format!(
                "Health check failed: {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

/// A download that never produced a usable response; the summary stays valid
fn download_failed(err: impl std::fmt::Display) -> ImportError {
    warn!(error = %err, "Result download failed");
    ImportError::Download {
        status: None,
        message: err.to_string(),
    }
}
