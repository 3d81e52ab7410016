// ABOUTME: HTTP fetching for BFF resources with status mapping and JSON decoding.
// ABOUTME: Non-success bodies of the form {success:false, message} supply the error message.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::ProxyError;

/// Result of a completed request, whatever its status.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self, op: &str) -> Result<T, ProxyError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            ProxyError::decode(
                &self.url,
                op,
                Some(anyhow::anyhow!("invalid response body: {}", e)),
            )
        })
    }
}

/// Error payload returned by the BFF.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Picks the message for a failed response: the body's `message` when present,
/// otherwise the status reason phrase.
pub fn error_message(status: u16, body: &[u8]) -> String {
    let from_body = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());
    if let Some(message) = from_body {
        return message;
    }
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP status {}", status))
}

/// Sends a GET to `url`. Only transport failures are errors here.
pub async fn fetch(
    client: &reqwest::Client,
    url: &Url,
    headers: &HashMap<String, String>,
    op: &str,
) -> Result<FetchResult, ProxyError> {
    let mut request = client.get(url.clone());
    for (key, value) in headers {
        request = request.header(key, value);
    }

    debug!(op, %url, "sending request");
    let response = request.send().await.map_err(|e| {
        let reason = if e.is_timeout() {
            anyhow::anyhow!("request timed out")
        } else {
            anyhow::anyhow!("could not reach the server: {}", e)
        };
        ProxyError::network(url.as_str(), op, Some(reason))
    })?;

    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response.bytes().await.map_err(|e| {
        ProxyError::network(
            url.as_str(),
            op,
            Some(anyhow::anyhow!("failed to read body: {}", e)),
        )
    })?;
    debug!(op, status, bytes = body.len(), "response received");

    Ok(FetchResult {
        status,
        url: url.to_string(),
        content_type,
        body,
    })
}

/// Fetches `url` and decodes a JSON body, mapping 404 to NotFound and any
/// other non-success status to Upstream.
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &Url,
    headers: &HashMap<String, String>,
    op: &str,
) -> Result<T, ProxyError> {
    let result = fetch(client, url, headers, op).await?;
    if !result.is_success() {
        let message = error_message(result.status, &result.body);
        let source = Some(anyhow::anyhow!(message));
        return Err(if result.status == 404 {
            ProxyError::not_found(&result.url, op, source)
        } else {
            ProxyError::upstream(result.status, &result.url, op, source)
        });
    }
    result.json(op)
}
