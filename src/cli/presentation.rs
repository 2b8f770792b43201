//! CLI presentation: text and json formatters per command family.

mod command;
mod journal;
mod platform;
mod provider;

pub use command::{format_build_result_json, format_build_result_text};
pub use journal::{format_journal_json, format_journal_text};
pub use platform::{format_platform_json, format_platform_text};
pub use provider::{format_provider_show_json, format_provider_show_text};
