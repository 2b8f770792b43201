//! CLI presence probe
//!
//! Answers "is the cortex executable reachable from where commands will run?".
//! Local Linux and remote contexts check the process PATH; a Windows host with
//! WSL asks a login shell inside WSL. Every check is bounded by a timeout and
//! a probe that times out reports [`ProbeError::Timeout`].

use crate::error::ProbeError;
use crate::platform::{EnvironmentDescriptor, OsFamily, RemoteContextKind};
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 3000;

#[async_trait]
pub trait CliProbe: Send + Sync {
    /// `Ok(true)` when the CLI is reachable.
    async fn probe(&self, env: &EnvironmentDescriptor) -> Result<bool, ProbeError>;
}

/// How a probe reaches the CLI for a given environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStrategy {
    /// PATH lookup in this process
    Native,
    /// `wsl.exe -e sh -lc 'command -v <program>'`
    WslShell,
}

pub fn probe_strategy(env: &EnvironmentDescriptor) -> ProbeStrategy {
    if env.os_family == OsFamily::Windows && env.remote == RemoteContextKind::None {
        ProbeStrategy::WslShell
    } else {
        ProbeStrategy::Native
    }
}

/// Probe backed by PATH lookup or a WSL subprocess.
#[derive(Debug, Clone)]
pub struct ProcessProbe {
    program: String,
    timeout: Duration,
}

impl ProcessProbe {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn probe_native(&self) -> Result<bool, ProbeError> {
        let program = self.program.clone();
        let lookup = tokio::task::spawn_blocking(move || which::which(&program).is_ok());
        match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(found)) => Ok(found),
            Ok(Err(join_err)) => Err(ProbeError::Spawn(join_err.to_string())),
            Err(_) => Err(self.timed_out()),
        }
    }

    async fn probe_wsl(&self) -> Result<bool, ProbeError> {
        let script = format!("command -v {}", self.program);
        let mut child = Command::new("wsl.exe");
        child
            .args(["-e", "sh", "-lc", &script])
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true);

        match tokio::time::timeout(self.timeout, child.status()).await {
            Ok(Ok(status)) => Ok(status.success()),
            Ok(Err(e)) => Err(ProbeError::Spawn(e.to_string())),
            Err(_) => Err(self.timed_out()),
        }
    }

    fn timed_out(&self) -> ProbeError {
        ProbeError::Timeout {
            after_ms: self.timeout.as_millis() as u64,
        }
    }
}

#[async_trait]
impl CliProbe for ProcessProbe {
    async fn probe(&self, env: &EnvironmentDescriptor) -> Result<bool, ProbeError> {
        let strategy = probe_strategy(env);
        let result = match strategy {
            ProbeStrategy::Native => self.probe_native().await,
            ProbeStrategy::WslShell => self.probe_wsl().await,
        };
        debug!(
            program = %self.program,
            strategy = ?strategy,
            result = ?result,
            "CLI presence probe finished"
        );
        result
    }
}
