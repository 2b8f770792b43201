//! Command builder behaviour across all four dispatch branches.

use cortex_gate::command::{build_command, CommandKind};
use cortex_gate::safety::DANGEROUS_METACHARACTERS;

#[test]
fn test_dispatch_examples() {
    let cases = [
        ("cortex install nginx --dry-run", "cortex install nginx --dry-run", CommandKind::Passthrough),
        ("  History  ", "cortex history", CommandKind::Verb),
        ("WIZARD", "cortex wizard", CommandKind::Verb),
        ("rollback  rb_2024-01 ", "cortex rollback rb_2024-01", CommandKind::Rollback),
        ("install docker", "cortex install 'install docker' --dry-run", CommandKind::Install),
        ("what's new", "cortex install 'what'\\''s new' --dry-run", CommandKind::Install),
    ];
    for (input, expected, kind) in cases {
        let command = build_command(input).unwrap();
        assert_eq!(command.as_str(), expected, "input {:?}", input);
        assert_eq!(command.kind(), kind, "input {:?}", input);
    }
}

#[test]
fn test_passthrough_with_any_metacharacter_is_rejected() {
    for c in DANGEROUS_METACHARACTERS {
        let input = format!("cortex install nginx{}id", c);
        let err = build_command(&input).unwrap_err();
        assert!(
            err.reason.contains("metacharacters"),
            "{:?} should be rejected with a metacharacter reason",
            c
        );
    }
}

#[test]
fn test_free_text_metacharacters_are_quoted_not_rejected() {
    let command = build_command("nginx; rm -rf / && $(reboot)").unwrap();
    assert_eq!(
        command.as_str(),
        "cortex install 'nginx; rm -rf / && $(reboot)' --dry-run"
    );
}

#[test]
fn test_rollback_requires_strict_id() {
    assert!(build_command("rollback abc;rm").is_err());
    assert!(build_command("rollback ../x").is_err());
    assert!(build_command("rollback a b").is_err());
}

#[test]
fn test_verb_with_arguments_is_free_text() {
    let command = build_command("status of nginx").unwrap();
    assert_eq!(command.kind(), CommandKind::Install);
}

#[test]
fn test_blank_input_rejected() {
    assert!(build_command("").is_err());
    assert!(build_command(" \t\n").is_err());
}
