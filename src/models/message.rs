use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Input,
    #[default]
    Output,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedAction {
    pub message: String,
    pub action_type: String,
}

/// A display-ready message derived from an interaction.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OutputMessage {
    #[serde(rename = "type")]
    message_type: MessageType,
    content: String,
    content_type: String,
    #[serde(default)]
    full_width: bool,
    #[serde(default)]
    suggested_actions: Vec<SuggestedAction>,
}

impl OutputMessage {
    pub fn new(content_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::Output,
            content: content.into(),
            content_type: content_type.into(),
            full_width: false,
            suggested_actions: vec![],
        }
    }

    pub fn with_full_width(mut self, full_width: bool) -> Self {
        self.full_width = full_width;
        self
    }

    pub fn with_suggested_action(
        mut self,
        message: impl Into<String>,
        action_type: impl Into<String>,
    ) -> Self {
        self.suggested_actions.push(SuggestedAction {
            message: message.into(),
            action_type: action_type.into(),
        });
        self
    }

    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn full_width(&self) -> bool {
        self.full_width
    }

    pub fn suggested_actions(&self) -> &[SuggestedAction] {
        &self.suggested_actions
    }
}

/// Message content as display text. Strings are taken as is, anything else
/// is rendered as compact JSON.
pub fn content_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InputContext {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source_id: Option<String>,
}

/// The user side of an exchange as the send-message route expects it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InputMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub content: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<InputContext>,
    pub prompt_prefix: Option<String>,
}

impl InputMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::Input,
            content: content.into(),
            content_type: "text".to_string(),
            context: None,
            prompt_prefix: None,
        }
    }

    pub fn with_context(mut self, content: impl Into<String>, data_source_id: Option<String>) -> Self {
        self.context = Some(InputContext {
            content: content.into(),
            data_source_id,
        });
        self
    }

    pub fn with_prompt_prefix(mut self, prefix: Option<String>) -> Self {
        self.prompt_prefix = prefix;
        self
    }
}
