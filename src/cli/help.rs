//! CLI command-name contract for logging and routing.

use crate::cli::parse::{Commands, KeyCommands, ProviderCommands, SetupCommands};

/// Command name string for log fields (e.g. "key.set", "status").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Submit { .. } => "submit".to_string(),
        Commands::Build { .. } => "build".to_string(),
        Commands::Status { .. } => "status".to_string(),
        Commands::Platform { .. } => "platform".to_string(),
        Commands::ConfirmCli => "confirm_cli".to_string(),
        Commands::Provider { command } => format!("provider.{}", provider_command_name(command)),
        Commands::Key { command } => format!("key.{}", key_command_name(command)),
        Commands::Setup { command } => format!("setup.{}", setup_command_name(command)),
        Commands::Journal { .. } => "journal".to_string(),
    }
}

pub fn provider_command_name(command: &ProviderCommands) -> &'static str {
    match command {
        ProviderCommands::Set { .. } => "set",
        ProviderCommands::Show { .. } => "show",
    }
}

pub fn key_command_name(command: &KeyCommands) -> &'static str {
    match command {
        KeyCommands::Set { .. } => "set",
        KeyCommands::Clear { .. } => "clear",
    }
}

pub fn setup_command_name(command: &SetupCommands) -> &'static str {
    match command {
        SetupCommands::Confirm => "confirm",
        SetupCommands::Reset { .. } => "reset",
    }
}
