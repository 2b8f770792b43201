//! Properties of the platform resolver and the gate evaluator.

use cortex_gate::gate::{evaluate_gate, CredentialStatus, GateDecision, SetupState};
use cortex_gate::platform::{
    resolve_platform, EnvironmentDescriptor, OsFamily, PlatformTag, RemoteContextKind,
};
use cortex_gate::provider::Provider;
use proptest::prelude::*;

fn os_family() -> impl Strategy<Value = OsFamily> {
    prop_oneof![
        Just(OsFamily::Linux),
        Just(OsFamily::Windows),
        Just(OsFamily::MacOs),
        Just(OsFamily::Other),
    ]
}

fn remote() -> impl Strategy<Value = RemoteContextKind> {
    prop_oneof![
        Just(RemoteContextKind::None),
        Just(RemoteContextKind::Wsl),
        Just(RemoteContextKind::SshRemote),
        Just(RemoteContextKind::DevContainer),
        Just(RemoteContextKind::AttachedContainer),
    ]
}

fn environment() -> impl Strategy<Value = EnvironmentDescriptor> {
    (os_family(), remote(), any::<bool>())
        .prop_map(|(os, remote, wsl)| EnvironmentDescriptor::new(os, remote, wsl))
}

fn provider() -> impl Strategy<Value = Provider> {
    prop_oneof![
        Just(Provider::Anthropic),
        Just(Provider::OpenAi),
        Just(Provider::Ollama),
    ]
}

fn credentials() -> impl Strategy<Value = CredentialStatus> {
    (any::<bool>(), any::<bool>(), provider()).prop_map(|(a, o, provider)| CredentialStatus {
        has_anthropic_key: a,
        has_openai_key: o,
        provider,
    })
}

fn setup() -> impl Strategy<Value = SetupState> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(c, p, s)| SetupState {
        cli_confirmed_installed: c,
        install_prompt_shown: p,
        setup_complete: s,
    })
}

proptest! {
    #[test]
    fn remote_context_always_supported(env in environment()) {
        let verdict = resolve_platform(&env);
        if env.remote != RemoteContextKind::None {
            prop_assert!(verdict.supported);
            prop_assert_ne!(verdict.tag, PlatformTag::Windows);
            prop_assert_ne!(verdict.tag, PlatformTag::MacOs);
        }
        if !verdict.supported {
            prop_assert!(!verdict.reason.is_empty());
        }
    }

    #[test]
    fn unsupported_platform_short_circuits(
        env in environment(),
        cli in any::<bool>(),
        creds in credentials(),
        state in setup(),
    ) {
        let verdict = resolve_platform(&env);
        let decision = evaluate_gate(&verdict, cli, &creds, &state);
        if !verdict.supported {
            prop_assert_eq!(decision, GateDecision::Blocked { reason: verdict.reason.clone() });
        } else {
            let is_blocked = matches!(decision, GateDecision::Blocked { .. });
            prop_assert!(!is_blocked);
        }
    }

    #[test]
    fn evaluation_is_deterministic(
        env in environment(),
        cli in any::<bool>(),
        creds in credentials(),
        state in setup(),
    ) {
        let verdict = resolve_platform(&env);
        prop_assert_eq!(
            evaluate_gate(&verdict, cli, &creds, &state),
            evaluate_gate(&verdict, cli, &creds, &state)
        );
    }

    #[test]
    fn ready_requires_every_step(
        env in environment(),
        cli in any::<bool>(),
        creds in credentials(),
        state in setup(),
    ) {
        let verdict = resolve_platform(&env);
        if evaluate_gate(&verdict, cli, &creds, &state).is_ready() {
            prop_assert!(verdict.supported);
            prop_assert!(cli);
            prop_assert!(state.setup_complete);
        }
    }
}
