//! Response envelope handling
//!
//! Explorer responses come in two shapes:
//!
//! ```text
//! {"status": "1", "message": "OK", "result": [...]}           // API modules
//! {"jsonrpc": "2.0", "id": 83, "result": "0x10d4f"}            // proxy module
//! {"jsonrpc": "2.0", "id": 83, "error": {"code": .., "message": ..}}
//! ```

use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<JsonValue>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Unwrap the `result` of a response body or turn it into an error
///
/// A `status` of `"0"` or a `NOTOK` message is an API error; known "no data"
/// messages come back as [`Error::EmptyResult`].
pub fn parse_response(body: JsonValue) -> Result<JsonValue> {
    let envelope: Envelope = serde_json::from_value(body)?;

    if let Some(error) = envelope.error {
        return Err(Error::proxy(error.code, error.message));
    }

    let message = envelope.message.unwrap_or_default();
    let failed = envelope.status.as_deref() == Some("0") || message.starts_with("NOTOK");
    if failed {
        return Err(Error::api(message, envelope.result.and_then(result_text)));
    }

    envelope
        .result
        .ok_or_else(|| Error::decode("Response has no 'result' field"))
}

/// Unwrap a result that must be a list of records
pub fn expect_records(result: JsonValue) -> Result<Vec<JsonValue>> {
    match result {
        JsonValue::Array(items) => Ok(items),
        other => Err(Error::decode(format!(
            "Expected a list of records, got: {other}"
        ))),
    }
}

fn result_text(result: JsonValue) -> Option<String> {
    match result {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
