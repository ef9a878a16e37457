//! ScreenshotClient - posts exported documents to a screenshot service.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tokio::io::AsyncWriteExt;

/// The environment variable naming the screenshot service URL.
pub const SERVICE_URL_ENV: &str = "ASCII_SNAP_SERVICE_URL";

/// Default screenshot service endpoint (a local `ascii-snap serve`).
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:3000/api/html-to-image";

/// Default timeout for the whole request; renders of large grids are slow.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Request body accepted by the service.
#[derive(Debug, Serialize)]
struct CaptureRequest<'a> {
    html: &'a str,
}

/// Client for the screenshot service.
#[derive(Debug, Clone)]
pub struct ScreenshotClient {
    url: String,
    http_client: reqwest::Client,
}

impl ScreenshotClient {
    /// Create a client for `$ASCII_SNAP_SERVICE_URL`, or the default local
    /// endpoint when unset.
    pub fn from_env() -> Result<Self, ClientError> {
        let url = std::env::var(SERVICE_URL_ENV)
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());
        Self::new(url)
    }

    /// Create a client for an explicit endpoint URL.
    pub fn new(url: impl Into<String>) -> Result<Self, ClientError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(ClientError::MissingUrl);
        }

        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()?;

        Ok(Self { url, http_client })
    }

    /// Get the endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post(&self, html: &str) -> Result<reqwest::Response, ClientError> {
        log::debug!("Posting {} bytes of markup to {}", html.len(), self.url);
        let response = self
            .http_client
            .post(&self.url)
            .json(&CaptureRequest { html })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::Service { status, message });
        }

        Ok(response)
    }

    /// Capture `html` and return the PNG bytes.
    pub async fn capture(&self, html: &str) -> Result<Vec<u8>, ClientError> {
        let response = self.post(html).await?;
        if let Some(renderer) = response
            .headers()
            .get(crate::screenshot::server::RENDERER_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            log::info!("Service rendered {}", renderer);
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Capture `html` and stream the PNG to `dest`.
    ///
    /// The body is streamed into a sibling `.part` file that is renamed over
    /// `dest` once complete. On failure the partial file is removed and an
    /// existing `dest` is left untouched.
    ///
    /// # Arguments
    ///
    /// * `html` - The exported document
    /// * `dest` - Destination path; parent directories are created
    ///
    /// # Returns
    ///
    /// The path the PNG was written to.
    pub async fn capture_to_file(&self, html: &str, dest: &Path) -> Result<PathBuf, ClientError> {
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let response = self.post(html).await?;

        let part = partial_path(dest);
        if let Err(e) = stream_to(response, &part).await {
            if let Err(cleanup) = tokio::fs::remove_file(&part).await {
                log::warn!("Failed to remove {}: {}", part.display(), cleanup);
            }
            return Err(e);
        }
        tokio::fs::rename(&part, dest).await?;

        Ok(dest.to_path_buf())
    }
}

/// Sibling path the download is written to before it is complete.
pub fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

async fn stream_to(response: reqwest::Response, path: &Path) -> Result<(), ClientError> {
    use futures_util::StreamExt;

    let mut file = tokio::fs::File::create(path).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result?;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}

/// Errors that can occur while talking to the screenshot service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Screenshot service URL not configured")]
    MissingUrl,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Screenshot service returned {status}: {message}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Response body, usually the service's error message
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
