use std::collections::HashMap;
use std::time;

use serde::{Deserialize, Serialize};

use super::constants::{DEFAULT_ENDPOINT, FALLBACK_QUESTION, LOG_FILE_PATH};
use super::defaults::*;

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Configuration {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub insight: InsightConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct GeneralConfig {
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogConfig {
    #[serde(default = "log_level")]
    pub level: Option<String>,

    #[serde(default)]
    pub filters: Option<Vec<LogFilter>>,

    #[serde(default)]
    pub file: LogFile,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFilter {
    #[serde(default)]
    pub module: Option<String>,

    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFile {
    #[serde(default = "log_file_path")]
    pub path: String,

    #[serde(default)]
    pub append: bool,
}

/// Connection to the dashboards server hosting the assistant routes.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AssistantConfig {
    #[serde(default = "endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub timeout_secs: Option<u16>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub data_source_id: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InsightConfig {
    #[serde(default = "fallback_question")]
    pub fallback_question: String,

    /// Extra prompt prefixes keyed by insight key. Entries here take
    /// precedence over the built-in roles.
    #[serde(default)]
    pub roles: HashMap<String, String>,
}

impl AssistantConfig {
    pub fn timeout(&self) -> Option<time::Duration> {
        self.timeout_secs
            .map(|secs| time::Duration::from_secs(secs as u64))
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Some("info".to_string()),
            file: LogFile::default(),
            filters: None,
        }
    }
}

impl Default for LogFile {
    fn default() -> Self {
        Self {
            path: LOG_FILE_PATH.to_string(),
            append: false,
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: None,
            username: None,
            password: None,
            data_source_id: None,
        }
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            fallback_question: FALLBACK_QUESTION.to_string(),
            roles: HashMap::new(),
        }
    }
}
