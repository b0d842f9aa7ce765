#[cfg(test)]
#[path = "assistant_test.rs"]
mod tests;

use crate::backend::{ArcTransport, Transport};
use crate::config::constants::{DEFAULT_ENDPOINT, SEND_MESSAGE_PATH};
use crate::config::{AssistantConfig, user_agent};
use crate::models::{SendMessageRequest, SendMessageResponse};
use async_trait::async_trait;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::{fmt::Display, time};
use thiserror::Error;

/// HTTP client for the assistant routes of a dashboards server.
pub struct AssistantClient {
    alias: String,
    endpoint: String,
    username: Option<String>,
    password: Option<String>,
    timeout: Option<time::Duration>,
}

#[async_trait]
impl Transport for AssistantClient {
    fn name(&self) -> &str {
        &self.alias
    }

    async fn send_message(&self, request: SendMessageRequest) -> Result<SendMessageResponse> {
        let mut req = reqwest::Client::new()
            .post(format!("{}{}", self.endpoint, SEND_MESSAGE_PATH))
            .header("Content-Type", "application/json")
            .header("osd-xsrf", "true")
            .header("User-Agent", user_agent());

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        if let Some(username) = &self.username {
            req = req.basic_auth(username, self.password.as_ref());
        }

        log::trace!("Sending message request: {:?}", request);

        let res = req
            .json(&request)
            .send()
            .await
            .wrap_err("sending message request")?;

        if !res.status().is_success() {
            let http_code = res.status().as_u16();
            let resp = res.text().await.wrap_err("reading error response")?;
            log::error!("Error response: {}", resp);
            let mut err = serde_json::from_str::<AssistantError>(&resp).unwrap_or_else(|_| {
                AssistantError {
                    message: resp,
                    ..Default::default()
                }
            });
            err.status_code = http_code;
            return Err(err.into());
        }

        let resp = res
            .json::<SendMessageResponse>()
            .await
            .wrap_err("parsing send message response")?;
        log::debug!(
            "Received {} interactions and {} messages",
            resp.interactions.len(),
            resp.messages.len()
        );
        Ok(resp)
    }
}

impl From<AssistantClient> for ArcTransport {
    fn from(value: AssistantClient) -> Self {
        Arc::new(value)
    }
}

impl From<&AssistantConfig> for AssistantClient {
    fn from(value: &AssistantConfig) -> Self {
        let mut client = AssistantClient::default().with_endpoint(&value.endpoint);

        if let Some(username) = value.username.as_deref() {
            client = client.with_basic_auth(username, value.password.as_deref());
        }

        client.timeout = value.timeout();
        client
    }
}

impl AssistantClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn with_basic_auth(mut self, username: &str, password: Option<&str>) -> Self {
        self.username = Some(username.to_string());
        self.password = password.map(str::to_string);
        self
    }

    pub fn with_timeout(mut self, timeout: time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = alias.to_string();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Option<time::Duration> {
        self.timeout
    }
}

impl Default for AssistantClient {
    fn default() -> Self {
        Self {
            alias: "Assistant".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            username: None,
            password: None,
            timeout: None,
        }
    }
}

/// Error body returned by the dashboards server.
#[derive(Default, Error, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantError {
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl Display for AssistantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Assistant error ({}): {}", self.status_code, self.message)
    }
}
