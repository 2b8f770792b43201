//! Session state persisted in sled across process restarts.

use super::test_utils::session_with;
use cortex_gate::gate::GateDecision;
use cortex_gate::platform::EnvironmentDescriptor;
use cortex_gate::provider::Provider;
use cortex_gate::store::{Journal, SledStore};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_onboarding_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store");

    {
        let store = Arc::new(SledStore::open(&path).unwrap());
        let h = session_with(store.clone(), EnvironmentDescriptor::local_linux(), false, None);
        h.session.confirm_cli_installed().unwrap();
        h.session.select_provider(Provider::OpenAi).unwrap();
        h.session.store_api_key(Provider::OpenAi, "sk-live").unwrap();
        h.session.confirm_setup().unwrap();
        store.flush().unwrap();
    }

    let store = Arc::new(SledStore::open(&path).unwrap());
    let h = session_with(store, EnvironmentDescriptor::local_linux(), false, None);
    assert_eq!(h.session.check_environment().await.unwrap(), GateDecision::Ready);
    assert_eq!(h.probe.calls(), 0, "persisted confirmation should skip the probe");

    let creds = h.session.credential_status().unwrap();
    assert_eq!(creds.provider, Provider::OpenAi);
    assert!(creds.has_openai_key);
    assert!(!creds.has_anthropic_key);
}

#[tokio::test]
async fn test_journal_records_every_outcome() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(SledStore::open(temp.path().join("store")).unwrap());
    let journal = Journal::new(store.db().clone()).unwrap();
    let h = session_with(
        store.clone(),
        EnvironmentDescriptor::local_linux(),
        true,
        Some(journal.clone()),
    );

    h.session.handle_submission("status").await;
    h.session.select_provider(Provider::Ollama).unwrap();
    h.session.handle_submission("rollback bad id").await;
    h.session.handle_submission("history").await;

    let entries = journal.recent(10).unwrap();
    let outcomes: Vec<&str> = entries.iter().map(|e| e.outcome.as_str()).collect();
    assert_eq!(outcomes, vec!["sent", "rejected", "prompt"]);
    assert_eq!(entries[0].command.as_deref(), Some("cortex history"));
    assert_eq!(entries[2].detail.as_deref(), Some("needs_credential"));

    assert_eq!(journal.prune(1).unwrap(), 2);
    assert_eq!(journal.recent(usize::MAX).unwrap().len(), 1);
}
