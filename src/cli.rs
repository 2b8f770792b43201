//! CLI domain: parse, route, help, output, and presentation only.
//! No gate logic; a single route table dispatches to the session.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, KeyCommands, ProviderCommands, SetupCommands};
pub use route::RunContext;
