//! HTTP client wrapper for downloading cell resources.
//!
//! Downloads stream the response body straight to disk; the whole payload
//! is never buffered in memory. The status code is checked before the
//! destination file is created, and a partial file left by a mid-stream
//! failure is removed, so an error never leaves a truncated or zero-byte
//! file behind.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::error::DownloadError;
use crate::user_agent;

/// Timeout for resource downloads (300 seconds, to accommodate large files).
const DOWNLOAD_TIMEOUT_SECS: u64 = 300;

/// Result of an existence-gated download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The file was downloaded; carries the number of bytes written.
    Downloaded(u64),
    /// The destination already existed; no network call was made.
    Skipped,
}

/// HTTP client for downloading cell resources with streaming support.
///
/// Designed to be created once and reused for all downloads, taking
/// advantage of connection pooling.
#[derive(Debug, Clone)]
pub struct FileDownloader {
    client: Client,
}

impl Default for FileDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl FileDownloader {
    /// Creates a new downloader with the default 300 second timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Downloads `url` to `path` unless the path already exists.
    ///
    /// This is the crawler's only idempotence check: a present file is
    /// treated as already done and never re-verified, and no network call
    /// is made for it.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] if the existence check or the download
    /// itself fails.
    #[instrument(skip(self), fields(url = %url, path = %path.display()))]
    pub async fn download_if_absent(
        &self,
        url: &str,
        path: &Path,
    ) -> Result<DownloadOutcome, DownloadError> {
        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
        if exists {
            debug!("file already present, skipping download");
            return Ok(DownloadOutcome::Skipped);
        }
        let bytes = self.download_to_path(url, path).await?;
        Ok(DownloadOutcome::Downloaded(bytes))
    }

    /// Downloads `url` to `path` unconditionally, streaming the body to disk.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns a non-success status
    /// - Creating or writing the file fails
    #[instrument(skip(self), fields(url = %url, path = %path.display()))]
    pub async fn download_to_path(&self, url: &str, path: &Path) -> Result<u64, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        // The file is only created after the status check, so an error
        // response never produces an empty file.
        let file = File::create(path)
            .await
            .map_err(|e| DownloadError::io(path, e))?;

        let stream_result = stream_to_file(file, response, url, path).await;

        if stream_result.is_err() {
            debug!("cleaning up partial file after stream error");
            let _ = tokio::fs::remove_file(path).await;
        }

        let bytes_written = stream_result?;
        info!(bytes = bytes_written, "download complete");
        Ok(bytes_written)
    }
}

/// Streams the response body to the file, returning bytes written.
///
/// Takes the file by value so the handle is closed before the caller
/// removes a partial file on error.
async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    Ok(bytes_written)
}
