//! Environment detection for the running process.
//!
//! Reads process environment variables and a couple of well-known paths to
//! build an [`EnvironmentDescriptor`]. Configuration may pin any of the three
//! fields, which is how hosts that know better (an editor extension host, CI)
//! feed their own view in.

use super::{EnvironmentDescriptor, OsFamily, RemoteContextKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Configured overrides for detected environment fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformOverrides {
    /// linux, windows, macos, other
    #[serde(default)]
    pub os_override: Option<String>,

    /// none, wsl, ssh-remote, dev-container, attached-container
    #[serde(default)]
    pub remote_override: Option<String>,

    #[serde(default)]
    pub wsl_available_override: Option<bool>,
}

impl PlatformOverrides {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref os) = self.os_override {
            if OsFamily::parse(os).is_none() {
                return Err(format!(
                    "Invalid os_override '{}' (must be linux, windows, macos, or other)",
                    os
                ));
            }
        }
        if let Some(ref remote) = self.remote_override {
            if RemoteContextKind::parse(remote).is_none() {
                return Err(format!(
                    "Invalid remote_override '{}' (must be none, wsl, ssh-remote, dev-container, or attached-container)",
                    remote
                ));
            }
        }
        Ok(())
    }

    /// Apply overrides on top of a detected descriptor. Unparseable values are ignored.
    pub fn apply(&self, detected: EnvironmentDescriptor) -> EnvironmentDescriptor {
        let os_family = self
            .os_override
            .as_deref()
            .and_then(OsFamily::parse)
            .unwrap_or(detected.os_family);
        let remote = self
            .remote_override
            .as_deref()
            .and_then(RemoteContextKind::parse)
            .unwrap_or(detected.remote);
        let wsl_available = self
            .wsl_available_override
            .unwrap_or(detected.wsl_available);
        EnvironmentDescriptor::new(os_family, remote, wsl_available)
    }
}

/// Detect the environment of the current process.
pub fn detect_environment() -> EnvironmentDescriptor {
    let os = std::env::consts::OS;
    let in_docker = Path::new("/.dockerenv").exists();
    let wsl_on_path = os == "windows" && which::which("wsl.exe").is_ok();
    let descriptor = detect_from(os, |key| std::env::var(key).ok(), in_docker, wsl_on_path);
    debug!(
        os = os,
        remote = descriptor.remote.as_str(),
        wsl_available = descriptor.wsl_available,
        "Detected environment"
    );
    descriptor
}

/// Detection from explicit inputs.
pub fn detect_from<F>(
    os: &str,
    var: F,
    in_docker: bool,
    wsl_on_path: bool,
) -> EnvironmentDescriptor
where
    F: Fn(&str) -> Option<String>,
{
    let os_family = OsFamily::parse(os).unwrap_or(OsFamily::Other);
    let has = |key: &str| var(key).map(|v| !v.is_empty()).unwrap_or(false);

    let remote = if os_family == OsFamily::Linux && (has("WSL_DISTRO_NAME") || has("WSL_INTEROP")) {
        RemoteContextKind::Wsl
    } else if has("REMOTE_CONTAINERS") || has("CODESPACES") {
        RemoteContextKind::DevContainer
    } else if in_docker {
        RemoteContextKind::AttachedContainer
    } else if has("SSH_CONNECTION") || has("SSH_CLIENT") {
        RemoteContextKind::SshRemote
    } else {
        RemoteContextKind::None
    };

    EnvironmentDescriptor::new(os_family, remote, os_family == OsFamily::Windows && wsl_on_path)
}
