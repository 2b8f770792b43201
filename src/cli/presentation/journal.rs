//! Journal presentation: recent submissions as a table or json.

use crate::store::JournalEntry;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

const INPUT_PREVIEW_CHARS: usize = 40;

fn preview(text: &str) -> String {
    if text.chars().count() <= INPUT_PREVIEW_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(INPUT_PREVIEW_CHARS - 3).collect();
        format!("{}...", cut)
    }
}

fn colored_outcome(outcome: &str) -> String {
    match outcome {
        "sent" => outcome.green().to_string(),
        "prompt" => outcome.yellow().to_string(),
        _ => outcome.red().to_string(),
    }
}

pub fn format_journal_text(entries: &[JournalEntry]) -> String {
    if entries.is_empty() {
        return "No submissions recorded.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["When", "Outcome", "Request", "Command / Detail"]);
    for entry in entries {
        let tail = entry
            .command
            .clone()
            .or_else(|| entry.detail.clone())
            .unwrap_or_default();
        table.add_row(vec![
            entry.submitted_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            colored_outcome(&entry.outcome),
            preview(&entry.input),
            preview(&tail),
        ]);
    }
    format!("{}\n\nShowing {} entr{}", table, entries.len(), if entries.len() == 1 { "y" } else { "ies" })
}

pub fn format_journal_json(entries: &[JournalEntry]) -> String {
    let out = json!({ "entries": entries, "total": entries.len() });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}
