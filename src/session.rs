//! Session coordinator
//!
//! A [`Session`] owns the per-session state and the collaborator handles and
//! runs one submission end to end: platform, gate, command builder, terminal.
//! It performs no IO of its own; stores, the probe and the terminal do.
//!
//! State transitions (evaluate-and-dispatch, reset, confirmations) take the
//! session lock, so a `Ready` decision cannot be dispatched after a concurrent
//! reset has already cleared setup. The CLI probe runs before the lock is
//! taken and is never awaited while holding it.

use crate::command::{build_command, Command};
use crate::error::{ApiError, InvalidInputError, StorageError};
use crate::gate::{evaluate_gate, CredentialStatus, GateDecision, SetupState};
use crate::platform::{resolve_platform, EnvironmentDescriptor, PlatformVerdict};
use crate::probe::CliProbe;
use crate::provider::{Provider, SecretKey, PROVIDER_SETTING_KEY};
use crate::store::{Flag, FlagStore, Journal, SecretStore, SettingStore};
use crate::terminal::TerminalSink;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Produces a fresh environment snapshot for each check.
pub type EnvironmentSource = Arc<dyn Fn() -> EnvironmentDescriptor + Send + Sync>;

/// Result of one submission. Every variant carries something to show the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// The command was handed to the terminal.
    Sent { command: Command },
    /// The platform cannot run cortex.
    Blocked { reason: String },
    /// Onboarding is incomplete; nothing was executed.
    Prompt { decision: GateDecision },
    /// The request could not be turned into a safe command.
    Rejected { reason: String },
    /// A collaborator failed.
    Failed { message: String },
}

impl SubmissionOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            SubmissionOutcome::Sent { .. } => "sent",
            SubmissionOutcome::Blocked { .. } => "blocked",
            SubmissionOutcome::Prompt { .. } => "prompt",
            SubmissionOutcome::Rejected { .. } => "rejected",
            SubmissionOutcome::Failed { .. } => "failed",
        }
    }

    /// User-visible message for this outcome.
    pub fn message(&self) -> String {
        match self {
            SubmissionOutcome::Sent { command } => format!("Sent to terminal: {}", command),
            SubmissionOutcome::Blocked { reason } => reason.clone(),
            SubmissionOutcome::Prompt { decision } => decision.prompt_text(),
            SubmissionOutcome::Rejected { reason } => format!("Invalid request: {}", reason),
            SubmissionOutcome::Failed { message } => message.clone(),
        }
    }
}

/// Handles to everything the session talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub secrets: Arc<dyn SecretStore>,
    pub flags: Arc<dyn FlagStore>,
    pub settings: Arc<dyn SettingStore>,
    pub probe: Arc<dyn CliProbe>,
    pub terminal: Arc<dyn TerminalSink>,
    pub journal: Option<Journal>,
}

/// Per-session state. Lives only as long as the [`Session`].
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Probe success or a persisted self-confirmation seen in this session.
    pub cli_confirmed: bool,
    pub last_decision: Option<GateDecision>,
}

pub struct Session {
    collaborators: Collaborators,
    environment: EnvironmentSource,
    state: Mutex<SessionState>,
}

impl Session {
    pub fn new(collaborators: Collaborators, environment: EnvironmentSource) -> Self {
        Self {
            collaborators,
            environment,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Session over a fixed environment snapshot.
    pub fn with_environment(collaborators: Collaborators, env: EnvironmentDescriptor) -> Self {
        Self::new(collaborators, Arc::new(move || env))
    }

    pub fn environment(&self) -> EnvironmentDescriptor {
        (self.environment)()
    }

    pub fn platform(&self) -> PlatformVerdict {
        resolve_platform(&self.environment())
    }

    /// Snapshot of the session state.
    pub fn state(&self) -> SessionState {
        self.state.lock().clone()
    }

    /// Re-run the gate against current collaborator state.
    pub async fn check_environment(&self) -> Result<GateDecision, ApiError> {
        let env = self.environment();
        let verdict = resolve_platform(&env);
        let cli_known = if verdict.supported {
            self.cli_presence(&env).await?
        } else {
            false
        };
        let mut state = self.state.lock();
        Ok(self.evaluate_locked(&mut state, &verdict, cli_known)?)
    }

    /// Run one user submission end to end.
    pub async fn handle_submission(&self, raw: &str) -> SubmissionOutcome {
        let outcome = self.submit(raw).await;
        match &outcome {
            SubmissionOutcome::Sent { command } => {
                info!(command = %command, kind = command.kind().as_str(), "Command sent")
            }
            SubmissionOutcome::Failed { message } => warn!(error = %message, "Submission failed"),
            other => debug!(outcome = other.kind(), "Submission not dispatched"),
        }
        self.record(raw, &outcome);
        outcome
    }

    async fn submit(&self, raw: &str) -> SubmissionOutcome {
        let env = self.environment();
        let verdict = resolve_platform(&env);
        if let Err(e) = verdict.ensure_supported() {
            return SubmissionOutcome::Blocked { reason: e.reason };
        }

        let cli_known = match self.cli_presence(&env).await {
            Ok(known) => known,
            Err(e) => return failed(e),
        };

        let mut state = self.state.lock();
        let decision = match self.evaluate_locked(&mut state, &verdict, cli_known) {
            Ok(d) => d,
            Err(e) => return failed(e),
        };

        match decision {
            GateDecision::Ready => {}
            GateDecision::Blocked { reason } => return SubmissionOutcome::Blocked { reason },
            other => return SubmissionOutcome::Prompt { decision: other },
        }

        match build_command(raw) {
            Ok(command) => {
                self.collaborators.terminal.send(&command);
                SubmissionOutcome::Sent { command }
            }
            Err(InvalidInputError { reason }) => SubmissionOutcome::Rejected { reason },
        }
    }

    /// Record the user's assertion that the CLI is installed. Trusted for the
    /// rest of the process lifetime and persisted for later sessions.
    pub fn confirm_cli_installed(&self) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        self.collaborators.flags.set(Flag::CliConfirmed.id(), true)?;
        state.cli_confirmed = true;
        info!("CLI installation confirmed by user");
        Ok(())
    }

    /// Persist the provider selection. Selecting Ollama also completes setup,
    /// since it has no credential step.
    pub fn select_provider(&self, provider: Provider) -> Result<(), ApiError> {
        let _state = self.state.lock();
        self.collaborators
            .settings
            .set_setting(PROVIDER_SETTING_KEY, provider.slug())?;
        if provider == Provider::Ollama {
            self.collaborators
                .flags
                .set(Flag::SetupComplete.id(), true)?;
        }
        info!(provider = provider.slug(), "Provider selected");
        Ok(())
    }

    pub fn store_api_key(&self, provider: Provider, key: &str) -> Result<(), ApiError> {
        let secret = secret_for(provider)?;
        let key = key.trim();
        if key.is_empty() {
            return Err(InvalidInputError::new("API key is empty").into());
        }
        if key.chars().any(char::is_whitespace) {
            return Err(InvalidInputError::new("API key may not contain whitespace").into());
        }
        let _state = self.state.lock();
        self.collaborators.secrets.set(secret.id(), key)?;
        info!(provider = provider.slug(), "API key stored");
        Ok(())
    }

    pub fn clear_api_key(&self, provider: Provider) -> Result<(), ApiError> {
        let secret = secret_for(provider)?;
        let _state = self.state.lock();
        self.collaborators.secrets.delete(secret.id())?;
        info!(provider = provider.slug(), "API key cleared");
        Ok(())
    }

    pub fn confirm_setup(&self) -> Result<(), ApiError> {
        let _state = self.state.lock();
        self.collaborators
            .flags
            .set(Flag::SetupComplete.id(), true)?;
        info!("Setup confirmed");
        Ok(())
    }

    /// Clear setup completion; the next check re-enters at the credential step.
    pub fn reset_setup(&self) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        self.collaborators
            .flags
            .set(Flag::SetupComplete.id(), false)?;
        state.last_decision = None;
        info!("Setup reset");
        Ok(())
    }

    pub fn setup_state(&self) -> Result<SetupState, StorageError> {
        let flags = &self.collaborators.flags;
        Ok(SetupState {
            cli_confirmed_installed: flags.get(Flag::CliConfirmed.id(), false)?,
            install_prompt_shown: flags.get(Flag::InstallPromptShown.id(), false)?,
            setup_complete: flags.get(Flag::SetupComplete.id(), false)?,
        })
    }

    pub fn credential_status(&self) -> Result<CredentialStatus, StorageError> {
        Ok(CredentialStatus {
            has_anthropic_key: self.has_secret(SecretKey::Anthropic)?,
            has_openai_key: self.has_secret(SecretKey::OpenAi)?,
            provider: self.selected_provider()?,
        })
    }

    pub fn selected_provider(&self) -> Result<Provider, StorageError> {
        let stored = self
            .collaborators
            .settings
            .get_setting(PROVIDER_SETTING_KEY)?;
        Ok(match stored {
            Some(value) => Provider::parse(&value).unwrap_or_else(|_| {
                warn!(value = %value, "Ignoring unknown stored provider");
                Provider::default()
            }),
            None => Provider::default(),
        })
    }

    fn has_secret(&self, key: SecretKey) -> Result<bool, StorageError> {
        Ok(self
            .collaborators
            .secrets
            .get(key.id())?
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false))
    }

    /// Session confirmation, then the persisted flag, then a live probe.
    /// Probe failures count as "not confirmed".
    async fn cli_presence(&self, env: &EnvironmentDescriptor) -> Result<bool, StorageError> {
        if self.state.lock().cli_confirmed {
            return Ok(true);
        }
        if self
            .collaborators
            .flags
            .get(Flag::CliConfirmed.id(), false)?
        {
            self.state.lock().cli_confirmed = true;
            return Ok(true);
        }
        match self.collaborators.probe.probe(env).await {
            Ok(true) => {
                self.state.lock().cli_confirmed = true;
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(e) => {
                warn!(error = %e, "CLI presence probe failed; treating CLI as not installed");
                Ok(false)
            }
        }
    }

    fn evaluate_locked(
        &self,
        state: &mut SessionState,
        verdict: &PlatformVerdict,
        cli_known: bool,
    ) -> Result<GateDecision, StorageError> {
        let (credentials, setup) = if verdict.supported {
            (self.credential_status()?, self.setup_state()?)
        } else {
            (CredentialStatus::default(), SetupState::default())
        };
        let cli_known = cli_known || state.cli_confirmed;
        let decision = evaluate_gate(verdict, cli_known, &credentials, &setup);

        if decision == GateDecision::NeedsCliInstall && !setup.install_prompt_shown {
            self.collaborators
                .flags
                .set(Flag::InstallPromptShown.id(), true)?;
        }
        if state.last_decision.as_ref() != Some(&decision) {
            info!(
                from = state.last_decision.as_ref().map(|d| d.kind()).unwrap_or("none"),
                to = decision.kind(),
                "Gate state changed"
            );
        }
        state.last_decision = Some(decision.clone());
        Ok(decision)
    }

    fn record(&self, raw: &str, outcome: &SubmissionOutcome) {
        let Some(journal) = &self.collaborators.journal else {
            return;
        };
        let (command, detail) = match outcome {
            SubmissionOutcome::Sent { command } => (Some(command.as_str().to_string()), None),
            SubmissionOutcome::Prompt { decision } => (None, Some(decision.kind().to_string())),
            SubmissionOutcome::Blocked { reason } | SubmissionOutcome::Rejected { reason } => {
                (None, Some(reason.clone()))
            }
            SubmissionOutcome::Failed { message } => (None, Some(message.clone())),
        };
        if let Err(e) = journal.append(raw, outcome.kind(), command, detail) {
            warn!(error = %e, "Failed to record submission in journal");
        }
    }
}

fn secret_for(provider: Provider) -> Result<SecretKey, InvalidInputError> {
    provider.secret_key().ok_or_else(|| {
        InvalidInputError::new(format!(
            "{} runs locally and does not use an API key",
            provider.display_name()
        ))
    })
}

fn failed(err: StorageError) -> SubmissionOutcome {
    SubmissionOutcome::Failed {
        message: format!("Could not read cortex settings: {}", err),
    }
}
