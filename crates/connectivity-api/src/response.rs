//! RMA response envelope.
//!
//! Every query endpoint answers with
//! `{"success": bool, "id": n, "start_row": n, "num_rows": n, "total_rows": n, "msg": ...}`
//! where `msg` is the row array on success and an error string on failure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RmaResponse {
    pub success: bool,
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub start_row: u64,
    #[serde(default)]
    pub num_rows: u64,
    #[serde(default)]
    pub total_rows: u64,
    pub msg: Value,
}

impl RmaResponse {
    /// Interpret a decoded JSON body as an envelope.
    pub fn from_value(value: Value) -> ApiResult<Self> {
        serde_json::from_value(value).map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }

    /// The rows of a successful response.
    pub fn into_rows(self) -> ApiResult<Vec<Value>> {
        if !self.success {
            let message = match self.msg {
                Value::String(s) => s,
                other => other.to_string(),
            };
            return Err(ApiError::Query(message));
        }

        match self.msg {
            Value::Array(rows) => Ok(rows),
            other => Err(ApiError::MalformedResponse(format!(
                "expected a row array in msg, got {}",
                other
            ))),
        }
    }

    /// The rows of a successful response, deserialized as `T`.
    pub fn into_typed<T: DeserializeOwned>(self) -> ApiResult<Vec<T>> {
        self.into_rows()?
            .into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| ApiError::MalformedResponse(e.to_string()))
            })
            .collect()
    }
}

/// A `WellKnownFile` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellKnownFile {
    pub id: u64,
    /// Path on the API host, e.g. `/api/v2/well_known_file_download/123`.
    pub download_link: String,
    #[serde(default)]
    pub attachable_id: Option<u64>,
    #[serde(default)]
    pub path: Option<String>,
}
