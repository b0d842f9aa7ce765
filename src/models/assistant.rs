#[cfg(test)]
#[path = "assistant_test.rs"]
mod tests;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{InputMessage, content_text};

pub const OUTPUT_MESSAGE_TYPE: &str = "output";

/// Body of a send-message call.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SendMessageRequest {
    pub messages: Vec<Value>,
    pub input: InputMessage,
}

impl SendMessageRequest {
    /// A fresh single-turn exchange: no prior messages are carried.
    pub fn single_turn(input: InputMessage) -> Self {
        Self {
            messages: vec![],
            input,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SendMessageResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub interactions: Vec<ReplyInteraction>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<ReplyMessage>,
}

/// Interaction echoed back in a reply. Only the conversation id is read.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyInteraction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

/// Loosely typed message from a reply. Only `type` and `content` are read.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct ReplyMessage {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub message_type: String,

    #[serde(default)]
    pub content: Value,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl SendMessageResponse {
    pub fn last_conversation_id(&self) -> Option<&str> {
        self.interactions
            .last()
            .and_then(|interaction| interaction.conversation_id.as_deref())
    }

    /// Content of the last message as text, when that message is an output
    /// carrying content.
    pub fn last_output(&self) -> Option<String> {
        self.messages
            .last()
            .filter(|msg| msg.message_type == OUTPUT_MESSAGE_TYPE && !msg.content.is_null())
            .map(|msg| content_text(msg.content.clone()))
    }
}

impl ReplyInteraction {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: Some(conversation_id.into()),
        }
    }
}

impl ReplyMessage {
    pub fn output(content: impl Into<String>) -> Self {
        Self {
            message_type: OUTPUT_MESSAGE_TYPE.to_string(),
            content: Value::String(content.into()),
        }
    }
}
