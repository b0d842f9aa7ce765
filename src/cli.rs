use clap::{Args, Parser, Subcommand};
use eyre::{Context, Result};

use crate::config::{self, Configuration, load_configuration, lookup_config_path};

#[derive(Debug, Parser)]
#[command(
    version,
    about,
    long_about = r#"In-context insights for the dashboards assistant

Default configuration file location looks up in the following order:
    * $XDG_CONFIG_HOME/insight/config.toml
    * $HOME/.config/insight/config.toml
    * $HOME/.insight.toml
"#,
    disable_version_flag = true
)]
pub struct Command {
    /// Configuration file path
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<String>,

    /// Show the version
    #[arg(short, long)]
    version: bool,

    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Debug, Subcommand)]
pub enum Action {
    /// Generate a summary for an insight
    Summarize(SummarizeArgs),
    /// Extract display messages from a stored interaction
    Parse(ParseArgs),
}

#[derive(Debug, Args)]
pub struct SummarizeArgs {
    /// Insight key, selects the assistant role (e.g. alerts)
    #[arg(short, long)]
    pub key: String,

    /// Context to summarize
    #[arg(long, conflicts_with = "context_file")]
    pub context: Option<String>,

    /// Read the context to summarize from a file
    #[arg(long, value_name = "PATH")]
    pub context_file: Option<String>,

    /// Suggested question, the first one is asked
    #[arg(short, long = "suggestion")]
    pub suggestions: Vec<String>,

    /// Data source the context belongs to
    #[arg(long)]
    pub data_source_id: Option<String>,

    /// Hand the summary over to the chat once generated
    #[arg(long)]
    pub continue_in_chat: bool,
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Interaction JSON file, reads stdin when omitted
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<String>,
}

impl Command {
    pub fn new() -> Command {
        Self::parse()
    }

    pub fn get_config(&self) -> Result<Configuration> {
        let config_path = self
            .config
            .clone()
            .unwrap_or_else(|| lookup_config_path().unwrap_or_default());

        if config_path.is_empty() {
            // No config path is specified just use the default config
            return Ok(Configuration::default());
        }
        load_configuration(config_path.as_str()).wrap_err("loading configuration")
    }

    pub fn version(&self) -> bool {
        self.version
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn print_version(&self) {
        println!("{}", config::version())
    }
}
