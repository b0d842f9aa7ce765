pub mod assistant;

pub use assistant::{AssistantClient, AssistantError};

#[cfg(test)]
use mockall::automock;

use crate::config::AssistantConfig;
use crate::models::{SendMessageRequest, SendMessageResponse};
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;

/// Completion transport used to reach the assistant.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport {
    fn name(&self) -> &str;
    async fn send_message(&self, request: SendMessageRequest) -> Result<SendMessageResponse>;
}

pub type ArcTransport = Arc<dyn Transport + Send + Sync>;

pub fn new_transport(config: &AssistantConfig) -> ArcTransport {
    let client: AssistantClient = config.into();
    log::debug!("Using {} transport at {}", client.name(), client.endpoint());
    Arc::new(client)
}
