#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;

pub mod create_monitor;

pub use create_monitor::CREATE_MONITOR_PARSER;

use std::collections::HashSet;
use std::fmt::Debug;

use thiserror::Error;

use crate::models::{Interaction, OutputMessage};

/// Turns one tool's recorded output into display messages.
#[derive(Clone, Copy)]
pub struct MessageParser {
    pub id: &'static str,
    /// `additional_info` key the parser reads, e.g. `SomeTool.output`
    pub tool_output: &'static str,
    pub parse: fn(&Interaction) -> Vec<OutputMessage>,
}

impl Debug for MessageParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageParser")
            .field("id", &self.id)
            .field("tool_output", &self.tool_output)
            .finish()
    }
}

impl MessageParser {
    pub fn matches(&self, interaction: &Interaction) -> bool {
        interaction.has_tool_output(self.tool_output)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("parser {0} is already registered")]
    DuplicateParser(&'static str),
}

#[derive(Debug, Default)]
pub struct ParserRegistry {
    parsers: Vec<MessageParser>,
    ids: HashSet<&'static str>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every parser shipped with the crate.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for parser in [CREATE_MONITOR_PARSER] {
            if let Err(err) = registry.register(parser) {
                log::warn!("Skipping builtin parser: {}", err);
            }
        }
        registry
    }

    pub fn register(&mut self, parser: MessageParser) -> Result<(), RegistryError> {
        if !self.ids.insert(parser.id) {
            return Err(RegistryError::DuplicateParser(parser.id));
        }
        log::debug!("Registered message parser {}", parser.id);
        self.parsers.push(parser);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&MessageParser> {
        self.parsers.iter().find(|p| p.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.parsers.iter().map(|p| p.id)
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Runs every parser whose tool output is present and concatenates the
    /// results in registration order.
    pub fn parse(&self, interaction: &Interaction) -> Vec<OutputMessage> {
        self.parsers
            .iter()
            .filter(|p| p.matches(interaction))
            .flat_map(|p| {
                let messages = (p.parse)(interaction);
                log::trace!("Parser {} produced {} messages", p.id, messages.len());
                messages
            })
            .collect()
    }
}
