//! Terminal sink: where validated commands go.
//!
//! The core never observes a result from [`TerminalSink::send`]. Sinks that
//! can fail log the failure themselves.

use crate::command::Command;
use crate::probe::{probe_strategy, ProbeStrategy};
use crate::platform::EnvironmentDescriptor;
use parking_lot::Mutex;
use std::process::Stdio;
use tokio::runtime::RuntimeFlavor;
use tracing::{info, warn};

pub trait TerminalSink: Send + Sync {
    fn send(&self, command: &Command);
}

/// Runs each command in a shell attached to this process's terminal and
/// waits for it to exit.
#[derive(Debug, Clone)]
pub struct ProcessTerminal {
    strategy: ProbeStrategy,
}

impl ProcessTerminal {
    /// Shell selection follows the probe: native `sh` or a login shell inside WSL.
    pub fn for_environment(env: &EnvironmentDescriptor) -> Self {
        Self {
            strategy: probe_strategy(env),
        }
    }

    fn shell_command(&self, line: &str) -> std::process::Command {
        match self.strategy {
            ProbeStrategy::Native => {
                let mut cmd = std::process::Command::new("sh");
                cmd.args(["-c", line]);
                cmd
            }
            ProbeStrategy::WslShell => {
                let mut cmd = std::process::Command::new("wsl.exe");
                cmd.args(["-e", "sh", "-lc", line]);
                cmd
            }
        }
    }
}

impl TerminalSink for ProcessTerminal {
    fn send(&self, command: &Command) {
        let mut child = self.shell_command(command.as_str());
        child
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        match run_blocking(|| child.status()) {
            Ok(status) if status.success() => {
                info!(command = %command, "Command finished");
            }
            Ok(status) => {
                warn!(command = %command, status = %status, "Command exited with failure");
            }
            Err(e) => {
                warn!(command = %command, error = %e, "Failed to start shell for command");
            }
        }
    }
}

/// Run `f` without stalling other tasks on a multi-threaded runtime.
/// Outside a runtime, or on a current-thread runtime, `f` runs inline.
fn run_blocking<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

/// Captures commands instead of running them.
#[derive(Debug, Default)]
pub struct RecordingTerminal {
    sent: Mutex<Vec<String>>,
}

impl RecordingTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }
}

impl TerminalSink for RecordingTerminal {
    fn send(&self, command: &Command) {
        self.sent.lock().push(command.as_str().to_string());
    }
}
