//! Build command presentation: the command a request maps to.

use crate::command::Command;
use serde_json::json;

pub fn format_build_result_text(command: &Command) -> String {
    format!("{}\n  kind: {}", command, command.kind().as_str())
}

pub fn format_build_result_json(command: &Command) -> String {
    let out = json!({
        "command": command.as_str(),
        "kind": command.kind().as_str(),
    });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}
