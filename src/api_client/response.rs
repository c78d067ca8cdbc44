//! Shared handling of the JSON responses returned by the hosting APIs.
//!
//! Every call goes through [`read_json`], which logs the exchange and turns
//! anything other than a successful JSON body into a human-readable detail
//! string. Callers wrap that detail in the [`ApiError`](super::ApiError)
//! variant matching the step that failed.

use log::{debug, error};
use reqwest::Response;
use serde_json::Value;

/// Reads a response body and parses it as JSON.
///
/// Returns `Err(detail)` when the status is not 2xx (detail holds status and
/// body), when the body cannot be read, or when it is not valid JSON.
pub(crate) async fn read_json(response: Response) -> Result<Value, String> {
    let url = response.url().to_string();
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| format!("unable to read response body: {}", e))?;

    debug!("{} resulted in [status={}] body: {}", url, status, body);

    if !status.is_success() {
        error!("{} failed with [status={}] body: {}", url, status, body);
        return Err(format!("status {}: {}", status, body));
    }

    serde_json::from_str(&body).map_err(|e| format!("invalid JSON ({}): {}", e, body))
}

/// Looks up a string at a JSON pointer such as `/data/link`.
pub(crate) fn string_at(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Same as [`string_at`], reporting which field was missing.
pub(crate) fn require_string(value: &Value, pointer: &str) -> Result<String, String> {
    string_at(value, pointer).ok_or_else(|| format!("response is missing `{}`: {}", pointer, value))
}
