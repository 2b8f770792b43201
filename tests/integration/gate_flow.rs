//! End-to-end onboarding: each gate step, then dispatch, then reset.

use super::test_utils::memory_session;
use cortex_gate::gate::GateDecision;
use cortex_gate::platform::{EnvironmentDescriptor, OsFamily, RemoteContextKind};
use cortex_gate::provider::{Provider, SecretKey};
use cortex_gate::session::SubmissionOutcome;
use cortex_gate::store::{Flag, FlagStore, SecretStore};

#[tokio::test]
async fn test_ollama_onboarding_to_ready_and_reset() {
    let (store, h) = memory_session(EnvironmentDescriptor::local_linux(), false);

    assert_eq!(
        h.session.check_environment().await.unwrap(),
        GateDecision::NeedsCliInstall
    );
    assert!(FlagStore::get(store.as_ref(), Flag::InstallPromptShown.id(), false).unwrap());

    h.probe.set_found(true);
    assert_eq!(
        h.session.check_environment().await.unwrap(),
        GateDecision::NeedsCredential {
            provider: Provider::Anthropic
        }
    );

    h.session.select_provider(Provider::Ollama).unwrap();
    assert_eq!(h.session.check_environment().await.unwrap(), GateDecision::Ready);

    let outcome = h.session.handle_submission("install htop").await;
    assert_eq!(outcome.kind(), "sent");
    assert_eq!(
        h.terminal.sent(),
        vec!["cortex install 'install htop' --dry-run".to_string()]
    );

    h.session.reset_setup().unwrap();
    // Ollama needs no credential, so the reset lands on the acknowledgement step.
    assert_eq!(
        h.session.check_environment().await.unwrap(),
        GateDecision::NeedsOnboardingAck
    );
    h.session.confirm_setup().unwrap();
    assert_eq!(h.session.check_environment().await.unwrap(), GateDecision::Ready);
}

#[tokio::test]
async fn test_credential_step_for_anthropic() {
    let (store, h) = memory_session(EnvironmentDescriptor::local_linux(), true);

    let outcome = h.session.handle_submission("status").await;
    assert!(matches!(
        outcome,
        SubmissionOutcome::Prompt {
            decision: GateDecision::NeedsCredential { .. }
        }
    ));

    h.session
        .store_api_key(Provider::Anthropic, "  sk-ant-123  ")
        .unwrap();
    assert_eq!(
        SecretStore::get(store.as_ref(), SecretKey::Anthropic.id()).unwrap().as_deref(),
        Some("sk-ant-123")
    );
    assert_eq!(
        h.session.check_environment().await.unwrap(),
        GateDecision::NeedsOnboardingAck
    );

    h.session.confirm_setup().unwrap();
    let outcome = h.session.handle_submission("status").await;
    assert_eq!(outcome.message(), "Sent to terminal: cortex status");

    // Completed setup is not re-gated on credentials.
    h.session.clear_api_key(Provider::Anthropic).unwrap();
    assert_eq!(h.session.check_environment().await.unwrap(), GateDecision::Ready);

    h.session.reset_setup().unwrap();
    assert_eq!(
        h.session.check_environment().await.unwrap(),
        GateDecision::NeedsCredential {
            provider: Provider::Anthropic
        }
    );
    assert_eq!(h.terminal.sent().len(), 1);
}

#[tokio::test]
async fn test_unsupported_platform_never_probes_or_sends() {
    let mac = EnvironmentDescriptor::new(OsFamily::MacOs, RemoteContextKind::None, false);
    let (_store, h) = memory_session(mac, true);
    h.session.confirm_setup().unwrap();

    let outcome = h.session.handle_submission("cortex status").await;
    assert!(matches!(outcome, SubmissionOutcome::Blocked { .. }));
    assert_eq!(h.probe.calls(), 0);
    assert!(h.terminal.sent().is_empty());
}

#[tokio::test]
async fn test_windows_without_wsl_blocked_with_remediation() {
    let win = EnvironmentDescriptor::new(OsFamily::Windows, RemoteContextKind::None, false);
    let (_store, h) = memory_session(win, true);
    match h.session.check_environment().await.unwrap() {
        GateDecision::Blocked { reason } => assert!(reason.contains("wsl --install")),
        other => panic!("expected Blocked, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rejected_request_after_ready_sends_nothing() {
    let (_store, h) = memory_session(EnvironmentDescriptor::local_linux(), true);
    h.session.select_provider(Provider::Ollama).unwrap();

    let outcome = h.session.handle_submission("cortex install a | sh").await;
    assert_eq!(outcome.kind(), "rejected");
    assert!(outcome.message().starts_with("Invalid request:"));
    assert!(h.terminal.sent().is_empty());
}

#[tokio::test]
async fn test_self_confirmation_skips_probe() {
    let (store, h) = memory_session(EnvironmentDescriptor::local_linux(), false);
    h.session.confirm_cli_installed().unwrap();
    assert!(FlagStore::get(store.as_ref(), Flag::CliConfirmed.id(), false).unwrap());

    let decision = h.session.check_environment().await.unwrap();
    assert!(matches!(decision, GateDecision::NeedsCredential { .. }));
    assert_eq!(h.probe.calls(), 0);
}
