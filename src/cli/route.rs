//! CLI route: single route table and run context. Dispatches to the session and presentation.

use crate::cli::help::command_name;
use crate::cli::parse::{request_text, Commands, KeyCommands, ProviderCommands, SetupCommands};
use crate::cli::presentation::{
    format_build_result_json, format_build_result_text, format_journal_json, format_journal_text,
    format_platform_json, format_platform_text, format_provider_show_json,
    format_provider_show_text,
};
use crate::command::build_command;
use crate::config::{ConfigLoader, GateConfig};
use crate::error::{ApiError, StorageError, UnsupportedPlatformError};
use crate::gate_status::{build_gate_status, format_gate_status_json, format_gate_status_text};
use crate::platform::{detect_environment, resolve_platform};
use crate::probe::ProcessProbe;
use crate::provider::diagnostics::check_ollama;
use crate::provider::Provider;
use crate::session::{Collaborators, EnvironmentSource, Session, SubmissionOutcome};
use crate::store::{EnvSecretStore, Journal, SecretStore, SledStore};
use crate::terminal::ProcessTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Runtime context for CLI execution: config, the sled store, and the session.
pub struct RunContext {
    config: GateConfig,
    session: Session,
    secrets: Arc<EnvSecretStore>,
    store: Arc<SledStore>,
    journal: Option<Journal>,
}

impl RunContext {
    /// Create run context from an optional config path. Uses ConfigLoader only.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load_with_override(config_path.as_deref())?.validated()?;
        Self::from_config(config)
    }

    /// Wire production collaborators from a loaded config.
    pub fn from_config(config: GateConfig) -> Result<Self, ApiError> {
        let store_path = config.storage.resolve_store_path()?;
        std::fs::create_dir_all(&store_path)
            .map_err(|e| ApiError::StorageError(StorageError::IoError(e)))?;
        let store = Arc::new(SledStore::open(&store_path)?);
        debug!(path = %store_path.display(), "Opened store");

        let journal = if config.journal.enabled {
            Some(Journal::new(store.db().clone())?)
        } else {
            None
        };

        let secrets = Arc::new(EnvSecretStore::new(store.clone() as Arc<dyn SecretStore>));

        let overrides = config.platform.clone();
        let environment: EnvironmentSource = Arc::new(move || overrides.apply(detect_environment()));
        let current = environment();

        let probe = Arc::new(ProcessProbe::new(
            config.cli.program.clone(),
            Duration::from_millis(config.probe.timeout_ms),
        ));
        let terminal = Arc::new(ProcessTerminal::for_environment(&current));

        let collaborators = Collaborators {
            secrets: secrets.clone(),
            flags: store.clone(),
            settings: store.clone(),
            probe,
            terminal,
            journal: journal.clone(),
        };

        Ok(Self {
            config,
            session: Session::new(collaborators, environment),
            secrets,
            store,
            journal,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Execute a command and return the text to print.
    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        info!(command = %command_name(command), "Executing command");
        let result = self.dispatch(command).await;
        if let Err(e) = self.store.flush() {
            warn!(error = %e, "Failed to flush store");
        }
        result
    }

    async fn dispatch(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Submit { request } => self.handle_submit(&request_text(request)).await,
            Commands::Build { request, format } => {
                let command = build_command(&request_text(request))?;
                Ok(match format.as_str() {
                    "json" => format_build_result_json(&command),
                    _ => format_build_result_text(&command),
                })
            }
            Commands::Status {
                format,
                check_ollama: with_ollama,
            } => self.handle_status(format, *with_ollama).await,
            Commands::Platform { format } => {
                let env = self.session.environment();
                let verdict = resolve_platform(&env);
                Ok(match format.as_str() {
                    "json" => format_platform_json(&env, &verdict),
                    _ => format_platform_text(&env, &verdict),
                })
            }
            Commands::ConfirmCli => {
                self.session.confirm_cli_installed()?;
                self.with_next_step("Marked the cortex CLI as installed.").await
            }
            Commands::Provider { command } => self.handle_provider(command).await,
            Commands::Key { command } => self.handle_key(command).await,
            Commands::Setup { command } => self.handle_setup(command).await,
            Commands::Journal { limit, format } => {
                let Some(ref journal) = self.journal else {
                    return Ok("Journal is disabled (journal.enabled = false).".to_string());
                };
                let entries = journal.recent(*limit)?;
                Ok(match format.as_str() {
                    "json" => format_journal_json(&entries),
                    _ => format_journal_text(&entries),
                })
            }
        }
    }

    async fn handle_submit(&self, request: &str) -> Result<String, ApiError> {
        let outcome = self.session.handle_submission(request).await;
        self.prune_journal();
        match outcome {
            SubmissionOutcome::Sent { .. } | SubmissionOutcome::Prompt { .. } => {
                Ok(outcome.message())
            }
            SubmissionOutcome::Blocked { reason } => {
                Err(UnsupportedPlatformError {
                    tag: self.session.platform().tag,
                    reason,
                }
                .into())
            }
            other => Err(ApiError::NotDispatched(other.message())),
        }
    }

    fn prune_journal(&self) {
        let Some(ref journal) = self.journal else {
            return;
        };
        match journal.prune(self.config.journal.max_entries) {
            Ok(0) => {}
            Ok(removed) => debug!(removed, "Pruned journal"),
            Err(e) => warn!(error = %e, "Failed to prune journal"),
        }
    }

    async fn handle_status(&self, format: &str, with_ollama: bool) -> Result<String, ApiError> {
        let mut status =
            build_gate_status(&self.session, |key| self.secrets.from_environment(key)).await?;
        if with_ollama {
            let timeout = Duration::from_millis(self.config.probe.timeout_ms);
            status.ollama = Some(check_ollama(&self.config.ollama.endpoint, timeout).await?);
        }
        Ok(match format {
            "json" => format_gate_status_json(&status),
            _ => format_gate_status_text(&status),
        })
    }

    async fn handle_provider(&self, command: &ProviderCommands) -> Result<String, ApiError> {
        match command {
            ProviderCommands::Set { provider } => {
                let provider = Provider::parse(provider)?;
                self.session.select_provider(provider)?;
                self.with_next_step(&format!("Provider set to {}.", provider.display_name()))
                    .await
            }
            ProviderCommands::Show { format } => {
                let credentials = self.session.credential_status()?;
                Ok(match format.as_str() {
                    "json" => format_provider_show_json(&credentials),
                    _ => format_provider_show_text(&credentials),
                })
            }
        }
    }

    async fn handle_key(&self, command: &KeyCommands) -> Result<String, ApiError> {
        match command {
            KeyCommands::Set { provider, value } => {
                let provider = Provider::parse(provider)?;
                let Some(secret) = provider.secret_key() else {
                    return Err(ApiError::ProviderError(format!(
                        "{} does not use an API key",
                        provider.display_name()
                    )));
                };
                let key = match value {
                    Some(v) => v.clone(),
                    None => dialoguer::Password::new()
                        .with_prompt(format!("{} API key", provider.display_name()))
                        .interact()
                        .map_err(|e| ApiError::Interaction(e.to_string()))?,
                };
                self.session.store_api_key(provider, &key)?;
                let mut message = format!("Stored {} API key.", provider.display_name());
                if self.secrets.from_environment(secret.id()) {
                    message.push_str(&format!(
                        "\nNote: {} is set and takes precedence over the stored key.",
                        secret.env_var()
                    ));
                }
                self.with_next_step(&message).await
            }
            KeyCommands::Clear { provider } => {
                let provider = Provider::parse(provider)?;
                self.session.clear_api_key(provider)?;
                Ok(format!("Cleared {} API key.", provider.display_name()))
            }
        }
    }

    async fn handle_setup(&self, command: &SetupCommands) -> Result<String, ApiError> {
        match command {
            SetupCommands::Confirm => {
                self.session.confirm_setup()?;
                self.with_next_step("Setup confirmed.").await
            }
            SetupCommands::Reset { yes } => {
                if !yes {
                    let proceed = dialoguer::Confirm::new()
                        .with_prompt("Clear setup completion?")
                        .default(false)
                        .interact()
                        .map_err(|e| ApiError::Interaction(e.to_string()))?;
                    if !proceed {
                        return Ok("Reset cancelled.".to_string());
                    }
                }
                self.session.reset_setup()?;
                Ok("Setup completion cleared.".to_string())
            }
        }
    }

    /// `message` followed by what the gate asks for next.
    async fn with_next_step(&self, message: &str) -> Result<String, ApiError> {
        let decision = self.session.check_environment().await?;
        Ok(format!("{}\n{}", message, decision.prompt_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parse::Cli;
    use crate::config::PlatformOverrides;
    use crate::platform::PlatformTag;
    use clap::Parser;
    use tempfile::TempDir;

    fn context(temp: &TempDir, os: &str) -> RunContext {
        let mut config = GateConfig::default();
        config.storage.data_dir = Some(temp.path().to_path_buf());
        config.cli.program = "cortex-gate-test-missing-binary".to_string();
        config.platform = PlatformOverrides {
            os_override: Some(os.to_string()),
            remote_override: Some("none".to_string()),
            wsl_available_override: Some(false),
        };
        RunContext::from_config(config).unwrap()
    }

    fn parse(args: &[&str]) -> Commands {
        let mut full = vec!["cortex-gate"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap().command
    }

    #[tokio::test]
    async fn test_build_does_not_touch_gate() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp, "macos");
        let out = ctx.execute(&parse(&["build", "install", "nginx"])).await.unwrap();
        assert!(out.starts_with("cortex install 'install nginx' --dry-run"));
    }

    #[tokio::test]
    async fn test_submit_on_macos_is_blocked() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp, "macos");
        let err = ctx.execute(&parse(&["submit", "status"])).await.unwrap_err();
        match &err {
            ApiError::UnsupportedPlatform(e) => assert_eq!(e.tag, PlatformTag::MacOs),
            other => panic!("expected UnsupportedPlatform, got {:?}", other),
        }
        assert!(crate::cli::map_error(&err).contains("macOS"));

        let journal = ctx.execute(&parse(&["journal", "--format", "json"])).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&journal).unwrap();
        assert_eq!(value["entries"][0]["outcome"], "blocked");
    }

    #[tokio::test]
    async fn test_onboarding_through_cli_commands() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp, "linux");

        let out = ctx.execute(&parse(&["submit", "status"])).await.unwrap();
        assert!(out.contains("confirm-cli"));

        ctx.execute(&parse(&["confirm-cli"])).await.unwrap();
        let out = ctx
            .execute(&parse(&["key", "set", "openai", "--value", "sk-test"]))
            .await
            .unwrap();
        assert!(out.starts_with("Stored OpenAI API key."));

        let out = ctx.execute(&parse(&["provider", "set", "openai"])).await.unwrap();
        assert!(out.contains("setup confirm"));

        let out = ctx.execute(&parse(&["setup", "confirm"])).await.unwrap();
        assert!(out.contains("Ready."));

        let out = ctx
            .execute(&parse(&["status", "--format", "json"]))
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["decision"]["state"], "ready");
        assert_eq!(value["provider"], "openai");
    }

    #[tokio::test]
    async fn test_key_set_rejects_ollama() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp, "linux");
        let err = ctx
            .execute(&parse(&["key", "set", "ollama", "--value", "x"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ProviderError(_)));
    }

    #[tokio::test]
    async fn test_key_clear_rejects_ollama() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp, "linux");
        let err = ctx
            .execute(&parse(&["key", "clear", "ollama"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert!(err.to_string().contains("does not use an API key"));
    }

    #[tokio::test]
    async fn test_setup_reset_with_yes() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp, "linux");
        ctx.execute(&parse(&["setup", "confirm"])).await.unwrap();
        let out = ctx.execute(&parse(&["setup", "reset", "--yes"])).await.unwrap();
        assert_eq!(out, "Setup completion cleared.");
        assert!(!ctx.session().setup_state().unwrap().setup_complete);
    }
}
