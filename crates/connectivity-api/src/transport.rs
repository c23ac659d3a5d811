//! HTTP transport.
//!
//! The client talks to the network only through [`Transport`], so tests can
//! substitute a recorder and assert on the exact URLs and paths requested.
//! There is no retry here: a failed request is returned to the caller as is.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use atlas_common::{ApiConfig, TransferError, TransferResult};
use futures::StreamExt;
use reqwest::{Client, Response};
use serde_json::Value;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

/// Fetches JSON documents and files.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and decode the body as JSON.
    async fn json_query(&self, url: &str) -> TransferResult<Value>;

    /// GET `url` and write the body to `destination`. The parent directory
    /// must already exist.
    async fn retrieve_file(&self, url: &str, destination: &Path) -> TransferResult<()>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the timeout and user agent from `config`.
    pub fn new(config: &ApiConfig) -> TransferResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .tcp_nodelay(true)
            .build()
            .map_err(|e| TransferError::request("", format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> TransferResult<Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransferError::request(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self))]
    async fn json_query(&self, url: &str) -> TransferResult<Value> {
        let response = self.get(url).await?;
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| TransferError::body(url, e.to_string()))?;
        debug!("Decoded JSON response");
        Ok(body)
    }

    #[instrument(skip(self, destination), fields(destination = %destination.display()))]
    async fn retrieve_file(&self, url: &str, destination: &Path) -> TransferResult<()> {
        let response = self.get(url).await?;
        let partial = partial_path(destination);

        let written = match stream_to_file(url, response, &partial).await {
            Ok(written) => written,
            Err(e) => {
                fs::remove_file(&partial).await.ok();
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&partial, destination).await {
            fs::remove_file(&partial).await.ok();
            return Err(e.into());
        }

        info!(bytes = written, "Download completed");
        Ok(())
    }
}

/// Sibling path the body is streamed to before the final rename.
fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    destination.with_file_name(name)
}

async fn stream_to_file(url: &str, response: Response, path: &Path) -> TransferResult<u64> {
    let mut file = File::create(path).await?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| TransferError::body(url, e.to_string()))?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    file.sync_all().await?;
    Ok(written)
}
