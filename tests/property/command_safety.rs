//! Properties of the command builder: pass-through fidelity, metacharacter
//! rejection, and quoting of free text.

use cortex_gate::command::{build_command, CommandKind};
use cortex_gate::safety::{contains_dangerous_metacharacters, DANGEROUS_METACHARACTERS};
use proptest::prelude::*;

/// Undo the builder's single quoting of one shell word.
fn unquote(word: &str) -> Option<String> {
    let inner = word.strip_prefix('\'')?.strip_suffix('\'')?;
    Some(inner.replace("'\\''", "'"))
}

proptest! {
    #[test]
    fn passthrough_is_returned_unchanged(tail in "[A-Za-z0-9 ._=/-]{0,40}") {
        let input = format!("cortex {}", tail);
        let command = build_command(&input).unwrap();
        prop_assert_eq!(command.kind(), CommandKind::Passthrough);
        prop_assert_eq!(command.as_str(), input.as_str());
    }

    #[test]
    fn passthrough_with_metacharacter_is_rejected(
        head in "[a-z ]{0,10}",
        idx in 0..DANGEROUS_METACHARACTERS.len(),
        tail in "[a-z ]{0,10}",
    ) {
        let input = format!("cortex {}{}{}", head, DANGEROUS_METACHARACTERS[idx], tail);
        prop_assert!(build_command(&input).is_err());
    }

    #[test]
    fn free_text_round_trips_through_quoting(
        text in r#"[a-z][a-zA-Z0-9 '"$;|&<>(){}`!*?#~.\\-]{0,40}"#
    ) {
        let trimmed = text.trim();
        let lower = text.to_ascii_lowercase();
        prop_assume!(!lower.starts_with("cortex "));
        prop_assume!(!lower.starts_with("rollback "));
        prop_assume!(!["history", "status", "wizard"].contains(&trimmed.to_ascii_lowercase().as_str()));

        let command = build_command(&text).unwrap();
        prop_assert_eq!(command.kind(), CommandKind::Install);

        let line = command.as_str();
        let quoted = line
            .strip_prefix("cortex install ")
            .and_then(|rest| rest.strip_suffix(" --dry-run"))
            .unwrap();
        let unquoted = unquote(quoted);
        prop_assert_eq!(unquoted.as_deref(), Some(trimmed));
    }

    #[test]
    fn every_accepted_non_install_command_is_metacharacter_free(input in any::<String>()) {
        if let Ok(command) = build_command(&input) {
            if command.kind() != CommandKind::Install {
                prop_assert!(!contains_dangerous_metacharacters(command.as_str()));
            }
        }
    }
}
