#[cfg(test)]
#[path = "create_monitor_test.rs"]
mod tests;

use serde_json::Value;

use super::MessageParser;
use crate::models::{Interaction, OutputMessage, content_text};

pub const CREATE_MONITOR_PARSER_ID: &str = "create_monitor_message";
pub const CREATE_MONITOR_TOOL_OUTPUT: &str = "GetCreateMonitorParametersTool.output";
pub const CREATE_MONITOR_CONTENT_TYPE: &str = "create_monitor_grid";
pub const CREATE_MONITOR_ACTION_MESSAGE: &str = "Create Monitor in Alerting Dashboard";
pub const CREATE_MONITOR_ACTION_TYPE: &str = "create_monitor_in_dashboard";

pub const CREATE_MONITOR_PARSER: MessageParser = MessageParser {
    id: CREATE_MONITOR_PARSER_ID,
    tool_output: CREATE_MONITOR_TOOL_OUTPUT,
    parse: parse_create_monitor,
};

/// One recorded tool output entry after JSON decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedOutput {
    /// Decoded to an array; its items are spliced into the candidates
    Sequence(Vec<Value>),
    Scalar(Value),
    /// Not valid JSON, kept verbatim
    Raw(String),
}

impl DecodedOutput {
    pub fn decode(item: &Value) -> Self {
        match item {
            Value::String(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Array(items)) => DecodedOutput::Sequence(items),
                Ok(value) => DecodedOutput::Scalar(value),
                Err(_) => DecodedOutput::Raw(raw.clone()),
            },
            Value::Array(items) => DecodedOutput::Sequence(items.clone()),
            other => DecodedOutput::Scalar(other.clone()),
        }
    }

    pub fn into_values(self) -> Vec<Value> {
        match self {
            DecodedOutput::Sequence(items) => items,
            DecodedOutput::Scalar(value) => vec![value],
            DecodedOutput::Raw(raw) => vec![Value::String(raw)],
        }
    }
}

/// Builds one "create monitor" card per distinct set of monitor parameters
/// recorded by the parameters tool.
pub fn parse_create_monitor(interaction: &Interaction) -> Vec<OutputMessage> {
    let items = match interaction.tool_output(CREATE_MONITOR_TOOL_OUTPUT) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            log::debug!("Ignoring non-array create monitor output: {}", other);
            return vec![];
        }
        None => return vec![],
    };

    let candidates = items
        .iter()
        .flat_map(|item| DecodedOutput::decode(item).into_values())
        .collect::<Vec<_>>();
    if candidates.is_empty() {
        return vec![];
    }

    let mut unique: Vec<Value> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !unique.iter().any(|seen| same_value(seen, &candidate)) {
            unique.push(candidate);
        }
    }

    unique
        .into_iter()
        .filter(is_truthy)
        .map(|parameters| {
            OutputMessage::new(CREATE_MONITOR_CONTENT_TYPE, content_text(parameters))
                .with_full_width(true)
                .with_suggested_action(CREATE_MONITOR_ACTION_MESSAGE, CREATE_MONITOR_ACTION_TYPE)
        })
        .collect()
}

/// Numbers compare by numeric value, so `1` and `1.0` are one candidate.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => a == b,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
