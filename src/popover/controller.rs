#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;

use std::fmt::Display;

use eyre::{Context, Result};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::backend::ArcTransport;
use crate::config::Configuration;
use crate::config::constants::GENERATE_SUMMARY_ERROR;
use crate::models::{
    ArcEventTx, Event, IncontextInsight, InputMessage, SendMessageRequest, SendMessageResponse,
};
use crate::notice_danger;

use super::{ArcChatRegistry, AssistantRoles};

/// What the summary popover currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryState {
    /// The "Generate summary" trigger is available
    Idle,
    /// A request is in flight; the trigger is disabled
    Generating,
    Completed(Summary),
    Closed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub conversation_id: String,
}

impl Summary {
    /// Takes the conversation id of the newest interaction and the text of
    /// the trailing output message. Anything the reply lacks is left as is.
    pub fn apply_reply(&mut self, reply: &SendMessageResponse) {
        if let Some(conversation_id) = reply.last_conversation_id() {
            self.conversation_id = conversation_id.to_string();
        }
        if let Some(text) = reply.last_output() {
            self.text = text;
        }
    }
}

impl SummaryState {
    pub fn name(&self) -> &'static str {
        match self {
            SummaryState::Idle => "idle",
            SummaryState::Generating => "generating",
            SummaryState::Completed(_) => "completed",
            SummaryState::Closed => "closed",
        }
    }
}

impl Display for SummaryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Error)]
pub enum PopoverError {
    #[error("no summary to continue with, popover is {0}")]
    NotCompleted(&'static str),
    #[error("continuing in chat: {0:#}")]
    Registry(eyre::Report),
}

pub struct SummaryPopover {
    insight: IncontextInsight,
    transport: ArcTransport,
    registry: Option<ArcChatRegistry>,
    event_tx: ArcEventTx,
    cancel_token: CancellationToken,
    roles: AssistantRoles,
    fallback_question: String,
    state: SummaryState,
}

impl SummaryPopover {
    pub fn new(insight: IncontextInsight, transport: ArcTransport, event_tx: ArcEventTx) -> Self {
        let config = &Configuration::instance().insight;
        Self {
            insight,
            transport,
            registry: None,
            event_tx,
            cancel_token: CancellationToken::new(),
            roles: AssistantRoles::from_config(config),
            fallback_question: config.fallback_question.clone(),
            state: SummaryState::Idle,
        }
    }

    pub fn with_registry(mut self, registry: ArcChatRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    pub fn with_roles(mut self, roles: AssistantRoles) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_fallback_question(mut self, question: impl Into<String>) -> Self {
        self.fallback_question = question.into();
        self
    }

    pub fn state(&self) -> &SummaryState {
        &self.state
    }

    pub fn insight(&self) -> &IncontextInsight {
        &self.insight
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SummaryState::Generating)
    }

    pub fn is_llm_responded(&self) -> bool {
        matches!(self.state, SummaryState::Completed(_))
    }

    pub fn summary(&self) -> Option<&Summary> {
        match &self.state {
            SummaryState::Completed(summary) => Some(summary),
            _ => None,
        }
    }

    /// The question sent with the summary request.
    pub fn question(&self) -> &str {
        self.insight
            .suggestions()
            .first()
            .map(String::as_str)
            .unwrap_or(&self.fallback_question)
    }

    pub fn build_request(&self, context: impl Into<String>) -> SendMessageRequest {
        let input = InputMessage::text(self.question())
            .with_context(context, self.insight.datasource_id().map(str::to_string))
            .with_prompt_prefix(self.roles.resolve(self.insight.key()).map(str::to_string));
        SendMessageRequest::single_turn(input)
    }

    /// Runs one generation cycle. Failures are reported through a danger
    /// notice and leave the popover idle; they never reach the caller.
    pub async fn generate_summary(&mut self) -> &SummaryState {
        if self.state != SummaryState::Idle {
            log::warn!("Ignoring summary trigger while popover is {}", self.state);
            return &self.state;
        }
        if self.cancel_token.is_cancelled() {
            log::warn!("Ignoring summary trigger on a torn down popover");
            self.state = SummaryState::Closed;
            return &self.state;
        }

        self.state = SummaryState::Generating;
        log::debug!("Generating summary for insight {}", self.insight.key());

        let outcome = tokio::select! {
            _ = self.cancel_token.cancelled() => None,
            res = self.summarize() => Some(res),
        };

        self.state = match outcome {
            None => {
                log::debug!("Popover torn down, discarding summary reply");
                SummaryState::Closed
            }
            Some(Ok(reply)) => {
                let mut summary = Summary::default();
                summary.apply_reply(&reply);
                log::debug!(
                    "Summary generated in conversation {}",
                    summary.conversation_id
                );
                SummaryState::Completed(summary)
            }
            Some(Err(err)) => {
                log::error!("Failed to generate summary: {:#}", err);
                if let Err(err) = self.event_tx.send(notice_danger!(GENERATE_SUMMARY_ERROR)).await {
                    log::warn!("Failed to send notice: {}", err);
                }
                SummaryState::Idle
            }
        };
        &self.state
    }

    async fn summarize(&self) -> Result<SendMessageResponse> {
        let context = match self.insight.context_provider() {
            Some(provider) => provider
                .context()
                .await
                .wrap_err("getting insight context")?,
            None => String::new(),
        };

        let request = self.build_request(context);
        self.transport
            .send_message(request)
            .await
            .wrap_err("sending summary request")
    }

    /// Hands the insight and its conversation to the chat surface, then
    /// closes the popover.
    pub async fn continue_in_chat(&mut self) -> Result<(), PopoverError> {
        let conversation_id = match &self.state {
            SummaryState::Completed(summary) => summary.conversation_id.clone(),
            state => return Err(PopoverError::NotCompleted(state.name())),
        };

        if let Some(registry) = self.registry.as_ref() {
            registry
                .continue_in_chat(&self.insight, &conversation_id)
                .await
                .map_err(PopoverError::Registry)?;
        }

        self.close().await;
        Ok(())
    }

    pub async fn close(&mut self) {
        if self.state == SummaryState::Closed {
            return;
        }
        self.state = SummaryState::Closed;
        if let Err(err) = self.event_tx.send(Event::ClosePopover).await {
            log::warn!("Failed to send close event: {}", err);
        }
    }
}
