//! reqwest-backed transport

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{Response, Transport};
use crate::config::ServerConfig;
use crate::error::Result;

/// HTTP transport rooted at a KF6 server URL
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    /// Create a transport with default timeout
    pub fn new(base_url: &str) -> Result<Self> {
        Self::from_config(&ServerConfig {
            url: base_url.to_string(),
            ..Default::default()
        })
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder, token: Option<&str>) -> Result<Response> {
        let request = match token {
            Some(token) => request.header(header::AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(Response { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, token: Option<&str>) -> Result<Response> {
        debug!(path, "GET");
        self.send(self.client.get(self.url(path)), token).await
    }

    async fn post(&self, path: &str, body: &Value, token: Option<&str>) -> Result<Response> {
        debug!(path, "POST");
        let request = self
            .client
            .post(self.url(path))
            .header(header::CONTENT_TYPE, "application/json")
            .json(body);
        self.send(request, token).await
    }
}
