//! Shared fixtures: a session over in-memory stores, a scripted probe, and a
//! recording terminal.

use async_trait::async_trait;
use cortex_gate::error::ProbeError;
use cortex_gate::platform::EnvironmentDescriptor;
use cortex_gate::probe::CliProbe;
use cortex_gate::session::{Collaborators, Session};
use cortex_gate::store::{FlagStore, Journal, MemoryStore, SecretStore, SettingStore};
use cortex_gate::terminal::RecordingTerminal;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Probe whose answer can be flipped mid-test.
pub struct ScriptedProbe {
    found: AtomicBool,
    calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new(found: bool) -> Arc<Self> {
        Arc::new(Self {
            found: AtomicBool::new(found),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set_found(&self, found: bool) {
        self.found.store(found, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CliProbe for ScriptedProbe {
    async fn probe(&self, _env: &EnvironmentDescriptor) -> Result<bool, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.found.load(Ordering::SeqCst))
    }
}

pub struct Harness {
    pub terminal: Arc<RecordingTerminal>,
    pub probe: Arc<ScriptedProbe>,
    pub session: Session,
}

/// Session over the given stores.
pub fn session_with<S>(
    store: Arc<S>,
    env: EnvironmentDescriptor,
    cli_found: bool,
    journal: Option<Journal>,
) -> Harness
where
    S: SecretStore + FlagStore + SettingStore + 'static,
{
    let terminal = Arc::new(RecordingTerminal::new());
    let probe = ScriptedProbe::new(cli_found);
    let collaborators = Collaborators {
        secrets: store.clone(),
        flags: store.clone(),
        settings: store,
        probe: probe.clone(),
        terminal: terminal.clone(),
        journal,
    };
    Harness {
        terminal,
        probe,
        session: Session::with_environment(collaborators, env),
    }
}

/// Session over a fresh [`MemoryStore`].
pub fn memory_session(env: EnvironmentDescriptor, cli_found: bool) -> (Arc<MemoryStore>, Harness) {
    let store = Arc::new(MemoryStore::new());
    let harness = session_with(store.clone(), env, cli_found, None);
    (store, harness)
}
