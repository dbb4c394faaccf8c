//! Transport trait and HTTP implementation
//!
//! The session speaks to KF6 only through [`Transport`], which issues a
//! single request and hands back the status plus decoded JSON body. Status
//! interpretation (login failure vs. request failure) belongs to the caller.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Error, Result};

/// Status and decoded body of one request
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    /// Decoded JSON body. Non-JSON bodies arrive as a JSON string,
    /// empty bodies as `null`.
    pub body: Value,
}

impl Response {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body of a successful authenticated call, `Error::Request` otherwise
    pub fn into_json(self) -> Result<Value> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(Error::Request {
                status: self.status,
                message: self.message(),
            })
        }
    }

    /// Human-readable body for error reporting
    pub fn message(&self) -> String {
        match &self.body {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Request/response surface consumed by the session
///
/// `token`, when present, is sent as `Authorization: Bearer <token>`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` relative to the server root
    async fn get(&self, path: &str, token: Option<&str>) -> Result<Response>;

    /// POST `body` as JSON to `path` relative to the server root
    async fn post(&self, path: &str, body: &Value, token: Option<&str>) -> Result<Response>;
}
