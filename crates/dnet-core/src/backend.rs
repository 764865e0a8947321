//! Backend message board client.
//!
//! The board exposes two endpoints, resolved against a fixed base address:
//! - `GET  /messages` -> JSON array of strings
//! - `POST /send`     <- `{"message": "..."}` (response body ignored)

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::sync::{MessageList, SyncError};

const MESSAGES_PATH: &str = "messages";
const SEND_PATH: &str = "send";

/// Read/write access to the message board.
///
/// `HttpBackend` is the real implementation; tests substitute in-memory
/// backends to control when each response resolves.
pub trait MessageBackend: Send + Sync + 'static {
    /// Fetches the full current message list.
    fn fetch_messages(&self) -> impl Future<Output = Result<MessageList, SyncError>> + Send;

    /// Posts one message. Only success or failure matters.
    fn send_message(&self, message: &str) -> impl Future<Output = Result<(), SyncError>> + Send;
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    message: &'a str,
}

/// HTTP implementation of [`MessageBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    messages_url: Url,
    send_url: Url,
}

impl HttpBackend {
    /// Creates a client for the board at `base`.
    ///
    /// # Errors
    /// Returns an error if the endpoints cannot be derived from `base` or
    /// the HTTP client cannot be built.
    pub fn new(base: &Url, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            http,
            messages_url: endpoint(base, MESSAGES_PATH)?,
            send_url: endpoint(base, SEND_PATH)?,
        })
    }

    /// Creates a client from the loaded configuration.
    ///
    /// # Errors
    /// Returns an error if `base_url` is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.base_url()?, config.request_timeout())
    }

    pub fn messages_url(&self) -> &Url {
        &self.messages_url
    }

    pub fn send_url(&self) -> &Url {
        &self.send_url
    }
}

impl MessageBackend for HttpBackend {
    async fn fetch_messages(&self) -> Result<MessageList, SyncError> {
        let response = self
            .http
            .get(self.messages_url.clone())
            .send()
            .await
            .map_err(SyncError::transient)?
            .error_for_status()
            .map_err(SyncError::transient)?;

        let body = response.bytes().await.map_err(SyncError::transient)?;
        decode_message_list(&body)
    }

    async fn send_message(&self, message: &str) -> Result<(), SyncError> {
        self.http
            .post(self.send_url.clone())
            .json(&SendRequest { message })
            .send()
            .await
            .map_err(SyncError::rejected)?
            .error_for_status()
            .map_err(SyncError::rejected)?;
        Ok(())
    }
}

/// Joins `name` onto `base`, keeping any path prefix `base` already has.
fn endpoint(base: &Url, name: &str) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(name)
        .with_context(|| format!("derive '{name}' endpoint from {base}"))
}

/// Decodes a `/messages` body.
///
/// Only a JSON array whose elements are all strings is usable; anything else
/// (invalid JSON, an object, an array containing numbers or nulls) is
/// rejected as a whole rather than partially applied.
pub fn decode_message_list(body: &[u8]) -> Result<MessageList, SyncError> {
    let value: Value = serde_json::from_slice(body).map_err(SyncError::malformed)?;

    let Value::Array(items) = value else {
        return Err(SyncError::malformed(format!(
            "expected a JSON array, got {}",
            json_kind(&value)
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::String(s) => Ok(s),
            other => Err(SyncError::malformed(format!(
                "element {idx} is {}, expected a string",
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
