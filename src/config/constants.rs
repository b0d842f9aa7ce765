/// Fallback question when an insight carries no suggestions
pub const FALLBACK_QUESTION: &str = "Please summarize the input";

pub const GENERATE_SUMMARY_ERROR: &str = "Generate summary error";

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5601";

/// Assistant plugin routes, relative to the dashboards endpoint
pub const SEND_MESSAGE_PATH: &str = "/api/assistant/send_message";

pub const LOG_FILE_PATH: &str = "/tmp/insight.log";

pub const ALERTS_INSIGHT_KEY: &str = "alerts";
