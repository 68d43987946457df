//! Asset download with pluggable progress observation
//!
//! The downloader streams a release asset into a uniquely named temp file
//! and hands the file's path to the caller, which owns its lifecycle from
//! then on.
//!
//! # Example
//!
//! ```no_run
//! use upswap_core::UpdaterConfig;
//! use upswap_update::{BarProgress, Downloader};
//!
//! # async fn example() -> upswap_update::Result<()> {
//! let config = UpdaterConfig::default();
//! let downloader = Downloader::new(&config.network)?;
//! let path = downloader
//!     .download("https://example.com/tool_linux_amd64.tar.gz", &BarProgress::new("tool"))
//!     .await?;
//! println!("Downloaded to {}", path.display());
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use tracing::debug;
use upswap_core::types::NetworkConfig;

use crate::error::{InstallStage, Result, UpdateError};
use crate::releases::Asset;

/// Response body as seen by progress wrappers
pub type ByteStream = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

/// Observes a download by wrapping its byte stream.
///
/// Implementations must yield exactly the bytes they receive. Any
/// `Fn(u64, ByteStream) -> ByteStream` closure is a wrapper too.
pub trait ProgressWrap: Send + Sync {
    /// `content_length` is the declared response size, or 0 when unknown
    fn wrap(&self, content_length: u64, stream: ByteStream) -> ByteStream;
}

impl<F> ProgressWrap for F
where
    F: Fn(u64, ByteStream) -> ByteStream + Send + Sync,
{
    fn wrap(&self, content_length: u64, stream: ByteStream) -> ByteStream {
        self(content_length, stream)
    }
}

/// Pass-through wrapper; observes nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressWrap for NoProgress {
    fn wrap(&self, _content_length: u64, stream: ByteStream) -> ByteStream {
        stream
    }
}

/// Terminal progress bar, or a spinner when the size is unknown
#[derive(Debug, Clone)]
pub struct BarProgress {
    message: String,
}

impl BarProgress {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn bar(&self, content_length: u64) -> ProgressBar {
        let pb = if content_length > 0 {
            let pb = ProgressBar::new(content_length);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner:.blue} {msg} {bytes} ({bytes_per_sec})")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        };
        pb.set_message(self.message.clone());
        pb
    }
}

impl ProgressWrap for BarProgress {
    fn wrap(&self, content_length: u64, stream: ByteStream) -> ByteStream {
        Box::pin(Tracked {
            inner: stream,
            bar: self.bar(content_length),
        })
    }
}

/// Stream adapter advancing a progress bar per chunk
struct Tracked {
    inner: ByteStream,
    bar: ProgressBar,
}

impl Stream for Tracked {
    type Item = reqwest::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let polled = this.inner.as_mut().poll_next(cx);
        match &polled {
            Poll::Ready(Some(Ok(chunk))) => this.bar.inc(chunk.len() as u64),
            Poll::Ready(Some(Err(_))) => this.bar.abandon(),
            Poll::Ready(None) => this.bar.finish(),
            Poll::Pending => {}
        }
        polled
    }
}

/// Fetches assets into local temp files
pub struct Downloader {
    /// HTTP client without a total timeout; transfers run until done
    client: reqwest::Client,

    /// Directory the temp files are created in
    temp_dir: PathBuf,
}

impl Downloader {
    /// Create a downloader from network settings.
    ///
    /// Only connecting is time-bounded; the transfer itself is not.
    pub fn new(network: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .connect_timeout(Duration::from_secs(network.connect_timeout_secs))
            .build()
            .map_err(|e| UpdateError::transport("building http client", e))?;

        Ok(Self::with_client(client))
    }

    /// Create a downloader around an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            temp_dir: std::env::temp_dir(),
        }
    }

    /// Create temp files in `dir` instead of the system temp directory
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    /// Download a release asset
    pub async fn download_asset(
        &self,
        asset: &Asset,
        progress: &dyn ProgressWrap,
    ) -> Result<PathBuf> {
        self.download(asset.url(), progress).await
    }

    /// Download `url` into a new temp file and return its path.
    ///
    /// The file passes to the caller with the returned path, so only on
    /// success; deleting it is then the caller's job. Until then it is a
    /// [`tempfile::NamedTempFile`] and any error return removes it.
    pub async fn download(&self, url: &str, progress: &dyn ProgressWrap) -> Result<PathBuf> {
        let mut temp = tempfile::Builder::new()
            .prefix("update-")
            .tempfile_in(&self.temp_dir)
            .map_err(|e| UpdateError::fs(InstallStage::CreateTempFile, e))?;

        debug!("fetch {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpdateError::transport("fetching asset", e))?;

        let status = response.status();
        let kind = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("")
            .to_string();
        let size = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|cl| cl.to_str().ok())
            .and_then(|cl| cl.parse::<u64>().ok())
            .unwrap_or(0);
        debug!("response {} - {} ({} KiB)", status, kind, size / 1024);

        let mut body = progress.wrap(size, Box::pin(response.bytes_stream()));

        if status.as_u16() >= 400 {
            return Err(UpdateError::HttpStatus {
                stage: "fetching asset",
                status,
            });
        }

        debug!("copy to {}", temp.path().display());
        let file = temp.as_file_mut();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| UpdateError::transport("copying body", e))?;
            file.write_all(&chunk)
                .map_err(|e| UpdateError::fs(InstallStage::WriteDownload, e))?;
        }
        drop(body);

        file.flush()
            .map_err(|e| UpdateError::fs(InstallStage::WriteDownload, e))?;
        file.sync_all()
            .map_err(|e| UpdateError::fs(InstallStage::WriteDownload, e))?;

        let (file, path) = temp
            .keep()
            .map_err(|e| UpdateError::fs(InstallStage::WriteDownload, e.error))?;
        drop(file);

        debug!("copied {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn chunks(parts: &[&'static [u8]]) -> ByteStream {
        let items: Vec<reqwest::Result<Bytes>> =
            parts.iter().map(|p| Ok(Bytes::from_static(p))).collect();
        Box::pin(stream::iter(items))
    }

    async fn collect(stream: ByteStream) -> Vec<u8> {
        stream
            .fold(Vec::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk.unwrap());
                acc
            })
            .await
    }

    #[tokio::test]
    async fn test_no_progress_passes_bytes_through() {
        let wrapped = NoProgress.wrap(6, chunks(&[b"abc", b"def"]));
        assert_eq!(collect(wrapped).await, b"abcdef");
    }

    #[tokio::test]
    async fn test_bar_progress_preserves_content() {
        let wrapped = BarProgress::new("test").wrap(0, chunks(&[b"hello ", b"world"]));
        assert_eq!(collect(wrapped).await, b"hello world");
    }

    #[tokio::test]
    async fn test_closure_is_a_progress_wrapper() {
        let seen = std::sync::Arc::new(std::sync::atomic::AtomicU64::new(0));
        let seen_clone = seen.clone();
        let wrap = move |len: u64, stream: ByteStream| -> ByteStream {
            seen_clone.store(len, std::sync::atomic::Ordering::SeqCst);
            stream
        };

        let wrapped = wrap.wrap(42, chunks(&[b"x"]));
        assert_eq!(collect(wrapped).await, b"x");
        assert_eq!(seen.load(std::sync::atomic::Ordering::SeqCst), 42);
    }
}
