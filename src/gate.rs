//! Environment gate
//!
//! Composes platform support, CLI presence, credential presence, and setup
//! completion into a single [`GateDecision`]. Checks run in a fixed order and
//! the first failing one decides:
//!
//! 1. unsupported platform: `Blocked`
//! 2. CLI not confirmed: `NeedsCliInstall`
//! 3. no usable credential and setup not complete: `NeedsCredential`
//! 4. setup not complete: `NeedsOnboardingAck`
//! 5. otherwise `Ready`

use crate::platform::PlatformVerdict;
use crate::provider::Provider;
use serde::{Deserialize, Serialize};

/// Which credentials exist and which provider is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CredentialStatus {
    pub has_anthropic_key: bool,
    pub has_openai_key: bool,
    pub provider: Provider,
}

impl CredentialStatus {
    /// Ollama needs no key; the other providers need their own.
    pub fn has_valid_config(&self) -> bool {
        match self.provider {
            Provider::Ollama => true,
            Provider::Anthropic => self.has_anthropic_key,
            Provider::OpenAi => self.has_openai_key,
        }
    }
}

/// Persisted onboarding flags. Each is set once and only cleared by an explicit reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetupState {
    pub cli_confirmed_installed: bool,
    pub install_prompt_shown: bool,
    pub setup_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GateDecision {
    Blocked { reason: String },
    NeedsCliInstall,
    NeedsCredential { provider: Provider },
    NeedsOnboardingAck,
    Ready,
}

impl GateDecision {
    pub fn is_ready(&self) -> bool {
        matches!(self, GateDecision::Ready)
    }

    /// Stable tag for logs and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            GateDecision::Blocked { .. } => "blocked",
            GateDecision::NeedsCliInstall => "needs_cli_install",
            GateDecision::NeedsCredential { .. } => "needs_credential",
            GateDecision::NeedsOnboardingAck => "needs_onboarding_ack",
            GateDecision::Ready => "ready",
        }
    }

    /// Short label for a status bar.
    pub fn status_text(&self) -> String {
        match self {
            GateDecision::Blocked { .. } => "Cortex: unsupported platform".to_string(),
            GateDecision::NeedsCliInstall => "Cortex: CLI not installed".to_string(),
            GateDecision::NeedsCredential { provider } => {
                format!("Cortex: {} API key required", provider.display_name())
            }
            GateDecision::NeedsOnboardingAck => "Cortex: finish setup".to_string(),
            GateDecision::Ready => "Cortex: ready".to_string(),
        }
    }

    /// What the user should do next.
    pub fn prompt_text(&self) -> String {
        match self {
            GateDecision::Blocked { reason } => reason.clone(),
            GateDecision::NeedsCliInstall => {
                "The cortex CLI was not found. Install it, or run `cortex-gate confirm-cli` \
                 if it is already installed somewhere this check cannot see."
                    .to_string()
            }
            GateDecision::NeedsCredential { provider } => format!(
                "{} is selected but no API key is stored. Run `cortex-gate key set {}` \
                 or switch providers with `cortex-gate provider set ollama`.",
                provider.display_name(),
                provider.slug()
            ),
            GateDecision::NeedsOnboardingAck => {
                "Setup is almost done. Run `cortex-gate setup confirm` to start sending requests."
                    .to_string()
            }
            GateDecision::Ready => "Ready. Describe what you want to install.".to_string(),
        }
    }
}

/// Evaluate the gate. Pure and total; same inputs, same decision.
pub fn evaluate_gate(
    verdict: &PlatformVerdict,
    cli_installed_known: bool,
    credentials: &CredentialStatus,
    setup: &SetupState,
) -> GateDecision {
    if !verdict.supported {
        return GateDecision::Blocked {
            reason: verdict.reason.clone(),
        };
    }

    if !cli_installed_known {
        return GateDecision::NeedsCliInstall;
    }

    if !credentials.has_valid_config() && !setup.setup_complete {
        return GateDecision::NeedsCredential {
            provider: credentials.provider,
        };
    }

    if !setup.setup_complete {
        return GateDecision::NeedsOnboardingAck;
    }

    GateDecision::Ready
}
