/// Remote Data Gateway: the single point of entry for all backend REST calls.
///
/// ARCHITECTURAL RULE: handlers and controllers depend on the `Gateway` trait only.
/// `HttpGateway` is the production implementation; tests substitute their own.
///
/// One attempt per call: no retries, no backoff, and no timeout unless one is configured.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod endpoints;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl GatewayError {
    /// The machine-readable `{message}` the backend attached to a failed call, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            GatewayError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[async_trait]
pub trait Gateway: Send + Sync {
    /// Issues one request. `token`, when present, is sent as `Authorization: Bearer <token>`.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value, GatewayError>;

    async fn get(&self, path: &str, token: Option<&str>) -> Result<Value, GatewayError> {
        self.request(Method::GET, path, None, token).await
    }

    async fn post(
        &self,
        path: &str,
        body: &Value,
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        self.request(Method::POST, path, Some(body), token).await
    }

    async fn put(&self, path: &str, body: &Value, token: Option<&str>) -> Result<Value, GatewayError> {
        self.request(Method::PUT, path, Some(body), token).await
    }

    async fn delete(&self, path: &str, token: Option<&str>) -> Result<Value, GatewayError> {
        self.request(Method::DELETE, path, None, token).await
    }
}

/// Decodes a gateway payload into a typed model.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, GatewayError> {
    serde_json::from_value(value).map_err(GatewayError::Parse)
}

/// Like `decode`, but a `null` payload yields `T::default()`.
pub fn decode_or_default<T: DeserializeOwned + Default>(value: Value) -> Result<T, GatewayError> {
    if value.is_null() {
        return Ok(T::default());
    }
    decode(value)
}

/// reqwest-backed gateway bound to one base URL.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{method} {path}");

        let mut request = self.client.request(method.clone(), &url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.message);
            warn!("{method} {path} returned {status}");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}
