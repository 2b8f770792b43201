//! Platform resolver.
//!
//! Maps an [`EnvironmentDescriptor`] to a [`PlatformVerdict`]. Remote-context
//! signals are checked before the local OS family, so a Windows host attached
//! to a Linux remote resolves as Linux. Probing the environment lives in
//! [`detect`]; this module is pure.

use crate::error::UnsupportedPlatformError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod detect;

pub use detect::detect_environment;

/// Local operating system family of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Linux,
    Windows,
    MacOs,
    Other,
}

impl OsFamily {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "linux" => Some(OsFamily::Linux),
            "windows" => Some(OsFamily::Windows),
            "macos" | "darwin" => Some(OsFamily::MacOs),
            "other" => Some(OsFamily::Other),
            _ => None,
        }
    }
}

/// Remote context the host is attached to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemoteContextKind {
    None,
    Wsl,
    SshRemote,
    DevContainer,
    AttachedContainer,
}

impl RemoteContextKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "none" | "" => Some(RemoteContextKind::None),
            "wsl" => Some(RemoteContextKind::Wsl),
            "ssh-remote" => Some(RemoteContextKind::SshRemote),
            "dev-container" => Some(RemoteContextKind::DevContainer),
            "attached-container" => Some(RemoteContextKind::AttachedContainer),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RemoteContextKind::None => "none",
            RemoteContextKind::Wsl => "wsl",
            RemoteContextKind::SshRemote => "ssh-remote",
            RemoteContextKind::DevContainer => "dev-container",
            RemoteContextKind::AttachedContainer => "attached-container",
        }
    }
}

/// Snapshot of the environment a request is evaluated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvironmentDescriptor {
    pub os_family: OsFamily,
    pub remote: RemoteContextKind,
    /// Whether WSL is installed on a Windows host. Ignored elsewhere.
    pub wsl_available: bool,
}

impl EnvironmentDescriptor {
    pub fn new(os_family: OsFamily, remote: RemoteContextKind, wsl_available: bool) -> Self {
        Self {
            os_family,
            remote,
            wsl_available,
        }
    }

    /// Plain local Linux host.
    pub fn local_linux() -> Self {
        Self::new(OsFamily::Linux, RemoteContextKind::None, false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformTag {
    Linux,
    Wsl,
    MacOs,
    Windows,
    Unknown,
}

impl PlatformTag {
    pub fn as_str(self) -> &'static str {
        match self {
            PlatformTag::Linux => "linux",
            PlatformTag::Wsl => "wsl",
            PlatformTag::MacOs => "macos",
            PlatformTag::Windows => "windows",
            PlatformTag::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformVerdict {
    pub supported: bool,
    pub tag: PlatformTag,
    /// Advisory text when supported, remediation text when not.
    pub reason: String,
}

impl PlatformVerdict {
    fn supported(tag: PlatformTag, reason: impl Into<String>) -> Self {
        Self {
            supported: true,
            tag,
            reason: reason.into(),
        }
    }

    fn unsupported(tag: PlatformTag, reason: impl Into<String>) -> Self {
        Self {
            supported: false,
            tag,
            reason: reason.into(),
        }
    }

    /// `Err` with the verdict's reason when the platform is unsupported.
    pub fn ensure_supported(&self) -> Result<(), UnsupportedPlatformError> {
        if self.supported {
            Ok(())
        } else {
            Err(UnsupportedPlatformError {
                tag: self.tag,
                reason: self.reason.clone(),
            })
        }
    }
}

pub const WSL_ADVISORY: &str =
    "Windows host with WSL detected: cortex commands will run inside WSL.";
pub const WINDOWS_REMEDIATION: &str = "cortex requires Linux. Install WSL with `wsl --install`, \
     restart, and reopen this workspace inside WSL.";
pub const MACOS_REASON: &str = "cortex depends on Linux package managers (apt, dnf, pacman) \
     and cannot run on macOS. Connect to a Linux machine over SSH or use a dev container.";
pub const UNKNOWN_REASON: &str =
    "cortex requires Linux. Use a Linux host, WSL, an SSH remote, or a dev container.";

/// Resolve platform support. First match wins; remote context beats OS family.
pub fn resolve_platform(env: &EnvironmentDescriptor) -> PlatformVerdict {
    match env.remote {
        RemoteContextKind::Wsl => {
            return PlatformVerdict::supported(PlatformTag::Wsl, "Running inside WSL.")
        }
        RemoteContextKind::SshRemote => {
            return PlatformVerdict::supported(PlatformTag::Linux, "Connected to an SSH remote.")
        }
        RemoteContextKind::DevContainer | RemoteContextKind::AttachedContainer => {
            return PlatformVerdict::supported(PlatformTag::Linux, "Running inside a container.")
        }
        RemoteContextKind::None => {}
    }

    match env.os_family {
        OsFamily::Linux => PlatformVerdict::supported(PlatformTag::Linux, "Running on Linux."),
        OsFamily::Windows if env.wsl_available => {
            PlatformVerdict::supported(PlatformTag::Wsl, WSL_ADVISORY)
        }
        OsFamily::Windows => PlatformVerdict::unsupported(PlatformTag::Windows, WINDOWS_REMEDIATION),
        OsFamily::MacOs => PlatformVerdict::unsupported(PlatformTag::MacOs, MACOS_REASON),
        OsFamily::Other => PlatformVerdict::unsupported(PlatformTag::Unknown, UNKNOWN_REASON),
    }
}
