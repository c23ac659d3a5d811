//! Recording transport for client tests.
//!
//! Captures every URL and destination the client hands to the transport so
//! tests can assert on the exact requests without touching the network.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use atlas_common::{ApiConfig, TransferError, TransferResult};
use connectivity_api::{MouseConnectivityApi, Transport};
use serde_json::Value;

/// A single transport call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Json(String),
    Retrieve { url: String, destination: PathBuf },
}

#[derive(Debug, Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    responses: Mutex<VecDeque<Value>>,
    file_body: Option<Vec<u8>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue JSON bodies returned by successive `json_query` calls.
    pub fn with_responses(responses: impl IntoIterator<Item = Value>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Write `body` to the destination on every `retrieve_file` call.
    pub fn writing_files(mut self, body: &[u8]) -> Self {
        self.file_body = Some(body.to_vec());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn json_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Json(url) => Some(url),
                Call::Retrieve { .. } => None,
            })
            .collect()
    }

    pub fn retrievals(&self) -> Vec<(String, PathBuf)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Retrieve { url, destination } => Some((url, destination)),
                Call::Json(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn json_query(&self, url: &str) -> TransferResult<Value> {
        self.calls.lock().unwrap().push(Call::Json(url.to_string()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransferError::body(url, "no canned response queued"))
    }

    async fn retrieve_file(&self, url: &str, destination: &Path) -> TransferResult<()> {
        self.calls.lock().unwrap().push(Call::Retrieve {
            url: url.to_string(),
            destination: destination.to_path_buf(),
        });
        if let Some(body) = &self.file_body {
            std::fs::write(destination, body)?;
        }
        Ok(())
    }
}

/// Client against the public hosts backed by `transport`.
pub fn api(transport: RecordingTransport) -> MouseConnectivityApi<RecordingTransport> {
    MouseConnectivityApi::with_transport(transport, &ApiConfig::default())
}

/// Parse one of the canned fixture bodies.
pub fn fixture(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}
