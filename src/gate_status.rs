//! Gate status data and formatting.
//!
//! Produces the report behind `cortex-gate status`: environment, platform
//! verdict, onboarding flags, credential presence, and the current gate
//! decision, plus an optional Ollama reachability section.

use crate::error::ApiError;
use crate::gate::{CredentialStatus, GateDecision, SetupState};
use crate::platform::{EnvironmentDescriptor, PlatformVerdict};
use crate::provider::diagnostics::OllamaStatus;
use crate::provider::Provider;
use crate::session::Session;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};

/// Where an API key came from, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySource {
    Stored,
    Environment,
    Missing,
}

impl KeySource {
    pub fn label(self) -> &'static str {
        match self {
            KeySource::Stored => "set",
            KeySource::Environment => "set (from environment)",
            KeySource::Missing => "not set",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateStatus {
    pub environment: EnvironmentDescriptor,
    pub platform: PlatformVerdict,
    pub decision: GateDecision,
    pub setup: SetupState,
    pub provider: Provider,
    pub anthropic_key: KeySource,
    pub openai_key: KeySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama: Option<OllamaStatus>,
}

/// Build the status report. `env_key` reports whether a key id is supplied by
/// the environment rather than the store.
pub async fn build_gate_status<F>(session: &Session, env_key: F) -> Result<GateStatus, ApiError>
where
    F: Fn(&str) -> bool,
{
    let environment = session.environment();
    let platform = session.platform();
    let decision = session.check_environment().await?;
    let setup = session.setup_state()?;
    let credentials = session.credential_status()?;

    Ok(GateStatus {
        environment,
        platform,
        decision,
        setup,
        provider: credentials.provider,
        anthropic_key: key_source(
            credentials.has_anthropic_key,
            env_key(crate::provider::SecretKey::Anthropic.id()),
        ),
        openai_key: key_source(
            credentials.has_openai_key,
            env_key(crate::provider::SecretKey::OpenAi.id()),
        ),
        ollama: None,
    })
}

fn key_source(present: bool, from_env: bool) -> KeySource {
    match (present, from_env) {
        (false, _) => KeySource::Missing,
        (true, true) => KeySource::Environment,
        (true, false) => KeySource::Stored,
    }
}

/// Credential summary without secrets.
pub fn credential_summary(credentials: &CredentialStatus) -> String {
    if credentials.has_valid_config() {
        format!("{} configured", credentials.provider.display_name())
    } else {
        format!("{} missing API key", credentials.provider.display_name())
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn colored_decision(decision: &GateDecision) -> String {
    let label = decision.status_text();
    match decision {
        GateDecision::Ready => label.green().to_string(),
        GateDecision::Blocked { .. } => label.red().to_string(),
        _ => label.yellow().to_string(),
    }
}

pub fn format_gate_status_text(status: &GateStatus) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Item", "Value"]);
    table.add_row(vec![
        "Host OS".to_string(),
        format!("{:?}", status.environment.os_family).to_lowercase(),
    ]);
    table.add_row(vec![
        "Remote context".to_string(),
        status.environment.remote.as_str().to_string(),
    ]);
    table.add_row(vec![
        "Platform".to_string(),
        format!(
            "{} ({})",
            status.platform.tag,
            if status.platform.supported {
                "supported"
            } else {
                "unsupported"
            }
        ),
    ]);
    table.add_row(vec![
        "CLI confirmed".to_string(),
        yes_no(status.setup.cli_confirmed_installed).to_string(),
    ]);
    table.add_row(vec![
        "Provider".to_string(),
        status.provider.display_name().to_string(),
    ]);
    table.add_row(vec![
        "Anthropic key".to_string(),
        status.anthropic_key.label().to_string(),
    ]);
    table.add_row(vec![
        "OpenAI key".to_string(),
        status.openai_key.label().to_string(),
    ]);
    table.add_row(vec![
        "Setup complete".to_string(),
        yes_no(status.setup.setup_complete).to_string(),
    ]);

    let mut output = format!("{}\n\n", "Cortex Gate Status".bold());
    output.push_str(&table.to_string());
    output.push_str(&format!("\n\nState: {}\n", colored_decision(&status.decision)));
    output.push_str(&format!("{}\n", status.decision.prompt_text()));
    if status.platform.supported && !status.platform.reason.is_empty() {
        output.push_str(&format!("Note: {}\n", status.platform.reason));
    }

    if let Some(ref ollama) = status.ollama {
        output.push_str(&format!("\nOllama ({})\n", ollama.endpoint));
        if ollama.reachable {
            output.push_str(&format!("  reachable: {}\n", "yes".green()));
            if ollama.models.is_empty() {
                output.push_str("  models: (none pulled)\n");
            } else {
                output.push_str(&format!("  models: {}\n", ollama.models.join(", ")));
            }
        } else {
            output.push_str(&format!("  reachable: {}\n", "no".red()));
        }
        if let Some(ref err) = ollama.error {
            output.push_str(&format!("  error: {}\n", err));
        }
    }

    output
}

pub fn format_gate_status_json(status: &GateStatus) -> String {
    serde_json::to_string_pretty(status).unwrap_or_else(|_| "{}".to_string())
}
