//! CLI parse: clap types for cortex-gate. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cortex Gate - guarded natural-language front end for the cortex CLI
#[derive(Parser)]
#[command(name = "cortex-gate")]
#[command(about = "Turn plain-language requests into safe cortex commands")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Gate a request and, if ready, send the built command to the terminal
    Submit {
        /// The request, e.g. `install nginx` or `rollback abc123`
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        request: Vec<String>,
    },
    /// Show the command a request would produce without gating or running it
    Build {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        request: Vec<String>,
    },
    /// Show platform, onboarding and credential status
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Check that the configured Ollama endpoint answers
        #[arg(long)]
        check_ollama: bool,
    },
    /// Show the detected environment and platform verdict
    Platform {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Record that the cortex CLI is installed
    ConfirmCli,
    /// Provider selection
    Provider {
        #[command(subcommand)]
        command: ProviderCommands,
    },
    /// API key management
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },
    /// Onboarding acknowledgement
    Setup {
        #[command(subcommand)]
        command: SetupCommands,
    },
    /// Show recent submissions
    Journal {
        /// Maximum number of entries
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum ProviderCommands {
    /// Select the LLM provider (anthropic, openai, ollama)
    Set { provider: String },
    /// Show the selected provider
    Show {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum KeyCommands {
    /// Store an API key for a provider; prompts when --value is omitted
    Set {
        provider: String,
        #[arg(long)]
        value: Option<String>,
    },
    /// Remove a stored API key
    Clear { provider: String },
}

#[derive(Subcommand)]
pub enum SetupCommands {
    /// Acknowledge onboarding so requests can be sent
    Confirm,
    /// Clear setup completion
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Rejoin request words the shell split apart.
pub fn request_text(words: &[String]) -> String {
    words.join(" ")
}
