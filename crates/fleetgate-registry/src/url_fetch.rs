//! The URL-fetch tool: an outbound HTTP GET bounded by a fixed 30 s
//! request timeout and a 50 KiB response-body cap.

use async_trait::async_trait;
use fleetgate_core::GatingError;
use fleetgate_core::envelope::ToolEnvelope;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::time::Duration;

use crate::tool::GatingTool;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const BODY_CAP_BYTES: usize = 50 * 1024;

#[derive(Debug, Deserialize)]
struct FetchArgs {
    url: String,
}

async fn fetch_capped(client: &reqwest::Client, url: &str) -> Result<Value, String> {
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;
    let status_code = response.status().as_u16();

    let mut headers = Map::new();
    for (name, value) in response.headers() {
        headers.insert(name.to_string(), json!(value.to_str().unwrap_or_default()));
    }

    let mut body = Vec::with_capacity(BODY_CAP_BYTES.min(8192));
    let mut stream = response.bytes_stream();
    while body.len() < BODY_CAP_BYTES {
        let Some(chunk) = stream.next().await else {
            break;
        };
        let chunk = chunk.map_err(|e| e.to_string())?;
        let remaining = BODY_CAP_BYTES - body.len();
        let take = remaining.min(chunk.len());
        body.extend_from_slice(&chunk[..take]);
    }

    Ok(json!({
        "status_code": status_code,
        "headers": Value::Object(headers),
        "body": String::from_utf8_lossy(&body).into_owned(),
    }))
}

/// Fetches a URL with a 30 s timeout, capping the captured response body
/// at 50 KiB. Never mutates the fleet, so it is visible regardless of
/// control level.
pub struct UrlFetchTool {
    client: reqwest::Client,
}

impl UrlFetchTool {
    /// Build the tool with its own bounded HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

impl Default for UrlFetchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GatingTool for UrlFetchTool {
    fn name(&self) -> &'static str {
        "fetch_url"
    }

    fn description(&self) -> &'static str {
        "Fetch a URL over HTTP, capping the response body at 50 KiB with a 30 s timeout."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"url": {"type": "string"}},
            "required": ["url"],
        })
    }

    fn require_control(&self) -> bool {
        false
    }

    async fn execute(&self, args: Value) -> ToolEnvelope {
        let args: FetchArgs = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return ToolEnvelope::error(&GatingError::InvalidArgument { message: e.to_string() }),
        };

        match fetch_capped(&self.client, &args.url).await {
            Ok(body) => ToolEnvelope::json(&body),
            Err(message) => ToolEnvelope::json(&json!({ "error": message })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_requires_url() {
        let tool = UrlFetchTool::new();
        let schema = tool.input_schema();
        assert_eq!(schema["required"][0], "url");
    }

    #[tokio::test]
    async fn invalid_args_return_error_envelope() {
        let tool = UrlFetchTool::new();
        let result = tool.execute(json!({})).await;
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn unreachable_host_returns_error_field_not_error_envelope() {
        let tool = UrlFetchTool::new();
        let result = tool.execute(json!({"url": "http://127.0.0.1:1"})).await;
        assert_eq!(result.is_error, None);
        let fleetgate_core::envelope::ContentBlock::Text { text } = &result.content[0];
        assert!(text.contains("\"error\""));
    }
}
