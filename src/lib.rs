//! Cortex Gate: guarded natural-language front end for the cortex CLI
//!
//! Decides whether a request may run at all (platform support, CLI presence,
//! provider credentials, onboarding acknowledgement) and, when it may, turns
//! free text into exactly one cortex command line that is safe to hand to a
//! shell.
//!
//! The decision core ([`platform`], [`gate`], [`command`], [`safety`]) is pure.
//! [`session::Session`] wires it to collaborator traits for storage, the CLI
//! probe, and the terminal.

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod gate;
pub mod gate_status;
pub mod logging;
pub mod platform;
pub mod probe;
pub mod provider;
pub mod safety;
pub mod session;
pub mod store;
pub mod terminal;

pub use command::{build_command, Command, CommandKind};
pub use error::ApiError;
pub use gate::{evaluate_gate, CredentialStatus, GateDecision, SetupState};
pub use platform::{resolve_platform, EnvironmentDescriptor, PlatformVerdict};
pub use session::{Collaborators, Session, SubmissionOutcome};
