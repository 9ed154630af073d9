//! HTTP client bound to the upstream service.
//!
//! # Responsibilities
//! - Hold one pooled `reqwest::Client` for the process lifetime
//! - Build target URLs from the fixed base address
//! - Treat any non-2xx status as a failure
//! - Decode the upstream body for verbatim relay

use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::http::X_REQUEST_ID;
use crate::numeric_id::NumericId;
use crate::upstream::error::{UpstreamError, UpstreamResult};

/// One call against the upstream `/data` resource.
#[derive(Debug, Clone, Copy)]
pub enum UpstreamCall<'a> {
    /// `GET /data`
    Fetch,
    /// `POST /data` with the JSON body.
    Create(&'a Value),
    /// `PUT /data/` with the JSON body. The id stays inside the body.
    Update(&'a Value),
    /// `DELETE /data?id=<id>`
    Remove(NumericId),
}

impl UpstreamCall<'_> {
    pub fn method(&self) -> Method {
        match self {
            UpstreamCall::Fetch => Method::GET,
            UpstreamCall::Create(_) => Method::POST,
            UpstreamCall::Update(_) => Method::PUT,
            UpstreamCall::Remove(_) => Method::DELETE,
        }
    }

    /// Path and query relative to the base address.
    pub fn path(&self) -> String {
        match self {
            UpstreamCall::Fetch | UpstreamCall::Create(_) => "/data".to_string(),
            UpstreamCall::Update(_) => "/data/".to_string(),
            UpstreamCall::Remove(id) => format!("/data?id={id}"),
        }
    }

    fn body(&self) -> Option<&Value> {
        match self {
            UpstreamCall::Create(body) | UpstreamCall::Update(body) => Some(*body),
            UpstreamCall::Fetch | UpstreamCall::Remove(_) => None,
        }
    }
}

/// Client for the upstream service.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

impl UpstreamClient {
    /// Create a client for the configured base address.
    ///
    /// Timeouts are only applied when configured; otherwise the transport
    /// defaults hold.
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> UpstreamResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = timeouts.connect_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = timeouts.upstream_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = Self {
            client: builder.build()?,
            base_url: upstream.base_url.trim_end_matches('/').to_string(),
        };
        // Fail at startup, not on the first request.
        client.url_for(&UpstreamCall::Fetch)?;

        tracing::info!(base_url = %client.base_url, "Upstream client initialized");
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute target URL for a call.
    pub fn url_for(&self, call: &UpstreamCall<'_>) -> UpstreamResult<Url> {
        let url = format!("{}{}", self.base_url, call.path());
        Url::parse(&url).map_err(|source| UpstreamError::Url { url, source })
    }

    /// Issue the call and return the upstream body.
    ///
    /// A JSON body is returned as parsed; anything else (plain text, empty)
    /// comes back as a JSON string holding the raw text.
    pub async fn send(&self, call: UpstreamCall<'_>, request_id: &str) -> UpstreamResult<Value> {
        let url = self.url_for(&call)?;
        let method = call.method();

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            url = %url,
            "Calling upstream"
        );

        let mut request = self
            .client
            .request(method, url)
            .header(X_REQUEST_ID, request_id);
        if let Some(body) = call.body() {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let text = response.text().await?;
        Ok(decode_body(text))
    }
}

fn decode_body(text: String) -> Value {
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => Value::String(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base_url: &str) -> UpstreamClient {
        UpstreamClient::new(
            &UpstreamConfig {
                base_url: base_url.to_string(),
            },
            &TimeoutConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_target_urls() {
        let client = client("http://server_c:3000/api");
        let body = json!({"id": "7"});

        let url = |call: &UpstreamCall<'_>| client.url_for(call).unwrap().to_string();
        assert_eq!(url(&UpstreamCall::Fetch), "http://server_c:3000/api/data");
        assert_eq!(url(&UpstreamCall::Create(&body)), "http://server_c:3000/api/data");
        assert_eq!(url(&UpstreamCall::Update(&body)), "http://server_c:3000/api/data/");

        let id = NumericId::from_query(Some("42")).unwrap();
        assert_eq!(url(&UpstreamCall::Remove(id)), "http://server_c:3000/api/data?id=42");
    }

    #[test]
    fn test_trailing_slash_in_base() {
        let client = client("http://localhost:4000/api/");
        assert_eq!(client.base_url(), "http://localhost:4000/api");
        assert_eq!(
            client.url_for(&UpstreamCall::Fetch).unwrap().as_str(),
            "http://localhost:4000/api/data"
        );
    }

    #[test]
    fn test_invalid_base_rejected() {
        let result = UpstreamClient::new(
            &UpstreamConfig {
                base_url: "no scheme here".into(),
            },
            &TimeoutConfig::default(),
        );
        assert!(matches!(result, Err(UpstreamError::Url { .. })));
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(r#"{"ok":true}"#.into()), json!({"ok": true}));
        assert_eq!(decode_body(" [1,2] ".into()), json!([1, 2]));
        assert_eq!(decode_body("plain text".into()), json!("plain text"));
        assert_eq!(decode_body(String::new()), json!(""));
    }
}
