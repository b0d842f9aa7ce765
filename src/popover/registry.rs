use std::sync::Arc;

use async_trait::async_trait;
use eyre::{Context, Result};

#[cfg(test)]
use mockall::automock;

use crate::models::{ArcEventTx, Event, IncontextInsight};

/// Receives insights the user wants to keep discussing in the full chat.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChatRegistry {
    async fn continue_in_chat(&self, insight: &IncontextInsight, conversation_id: &str)
    -> Result<()>;
}

pub type ArcChatRegistry = Arc<dyn ChatRegistry + Send + Sync>;

/// Forwards hand-offs to the event channel so the chat surface can pick
/// them up.
pub struct EventChatRegistry {
    event_tx: ArcEventTx,
}

impl EventChatRegistry {
    pub fn new(event_tx: ArcEventTx) -> Self {
        Self { event_tx }
    }
}

#[async_trait]
impl ChatRegistry for EventChatRegistry {
    async fn continue_in_chat(
        &self,
        insight: &IncontextInsight,
        conversation_id: &str,
    ) -> Result<()> {
        log::debug!(
            "Continue insight {} in conversation {}",
            insight.key(),
            conversation_id
        );
        self.event_tx
            .send(Event::ContinueInChat {
                insight: insight.clone(),
                conversation_id: conversation_id.to_string(),
            })
            .await
            .wrap_err("sending continue in chat event")?;
        Ok(())
    }
}
