//! Command builder: maps a user request to exactly one cortex command line.
//!
//! Dispatch order:
//! 1. `cortex ...` pass-through, rejected if it carries shell metacharacters
//! 2. bare verbs (`history`, `status`, `wizard`)
//! 3. `rollback <id>` with a strict identifier check
//! 4. anything else becomes a single-quoted `cortex install '...' --dry-run`
//!
//! Branches 1-3 interpolate raw text and must each validate it. Branch 4 is
//! safe for arbitrary bytes because the only way out of a single-quoted shell
//! word is another single quote, and those are rewritten to `'\''`.

use crate::error::InvalidInputError;
use crate::safety::{describe_metacharacter, first_dangerous_metacharacter};
use serde::Serialize;
use std::fmt;

/// Program name of the external package-management CLI.
pub const PROGRAM: &str = "cortex";

/// Suffix appended to every free-text install request.
pub const DRY_RUN_FLAG: &str = "--dry-run";

/// Verbs accepted on their own and forwarded as `cortex <verb>`.
pub const BARE_VERBS: &[&str] = &["history", "status", "wizard"];

const PASSTHROUGH_PREFIX: &str = "cortex ";
const ROLLBACK_PREFIX: &str = "rollback ";

/// Which dispatch branch produced a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Passthrough,
    Verb,
    Rollback,
    Install,
}

impl CommandKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Passthrough => "passthrough",
            CommandKind::Verb => "verb",
            CommandKind::Rollback => "rollback",
            CommandKind::Install => "install",
        }
    }
}

/// A validated shell command line. Only [`build_command`] constructs one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    line: String,
    kind: CommandKind,
}

impl Command {
    fn new(line: String, kind: CommandKind) -> Self {
        Self { line, kind }
    }

    pub fn as_str(&self) -> &str {
        &self.line
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

impl AsRef<str> for Command {
    fn as_ref(&self) -> &str {
        &self.line
    }
}

/// Build the single command line for `raw`.
pub fn build_command(raw: &str) -> Result<Command, InvalidInputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidInputError::new("request is empty"));
    }

    if starts_with_ignore_case(raw, PASSTHROUGH_PREFIX) {
        if let Some(c) = first_dangerous_metacharacter(raw) {
            return Err(InvalidInputError::new(format!(
                "direct cortex commands may not contain shell metacharacters (found {})",
                describe_metacharacter(c)
            )));
        }
        return Ok(Command::new(raw.to_string(), CommandKind::Passthrough));
    }

    if let Some(verb) = BARE_VERBS
        .iter()
        .find(|verb| trimmed.eq_ignore_ascii_case(verb))
    {
        return Ok(Command::new(
            format!("{} {}", PROGRAM, verb),
            CommandKind::Verb,
        ));
    }

    if starts_with_ignore_case(raw, ROLLBACK_PREFIX) {
        let id = raw[ROLLBACK_PREFIX.len()..].trim();
        if !is_valid_rollback_id(id) {
            return Err(InvalidInputError::new(
                "rollback id must match ^[A-Za-z0-9_-]+$ (letters, digits, '_' and '-' only)",
            ));
        }
        return Ok(Command::new(
            format!("{} rollback {}", PROGRAM, id),
            CommandKind::Rollback,
        ));
    }

    Ok(Command::new(
        format!(
            "{} install {} {}",
            PROGRAM,
            single_quote(trimmed),
            DRY_RUN_FLAG
        ),
        CommandKind::Install,
    ))
}

/// Wrap `text` in single quotes, rewriting each embedded `'` as `'\''`.
pub fn single_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

/// `^[A-Za-z0-9_-]+$`
pub fn is_valid_rollback_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}
