use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One recorded exchange with the assistant backend, including the named
/// outputs of every tool it invoked.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Interaction {
    #[serde(default)]
    pub conversation_id: String,

    #[serde(default)]
    pub interaction_id: String,

    #[serde(default)]
    pub input: String,

    #[serde(default)]
    pub response: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_interaction_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<HashMap<String, Value>>,
}

impl Interaction {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            ..Default::default()
        }
    }

    pub fn with_tool_output(mut self, key: impl Into<String>, output: Value) -> Self {
        self.additional_info
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), output);
        self
    }

    /// Raw output recorded under `key`, e.g. `SomeTool.output`.
    pub fn tool_output(&self, key: &str) -> Option<&Value> {
        self.additional_info.as_ref().and_then(|info| info.get(key))
    }

    pub fn has_tool_output(&self, key: &str) -> bool {
        self.tool_output(key).is_some()
    }
}
