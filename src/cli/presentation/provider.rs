//! Provider presentation: the selected provider and its credential state.

use crate::gate::CredentialStatus;
use crate::provider::Provider;
use serde_json::json;

pub fn format_provider_show_text(credentials: &CredentialStatus) -> String {
    let mut output = format!("Provider: {}\n", credentials.provider.display_name());
    output.push_str("\nAvailable:\n");
    for provider in Provider::ALL {
        let marker = if provider == credentials.provider { "*" } else { " " };
        let key = match provider {
            Provider::Anthropic if credentials.has_anthropic_key => "key set",
            Provider::OpenAi if credentials.has_openai_key => "key set",
            Provider::Ollama => "no key needed",
            _ => "no key",
        };
        output.push_str(&format!(
            "  {} {:<10} {}\n",
            marker,
            provider.slug(),
            key
        ));
    }
    output
}

pub fn format_provider_show_json(credentials: &CredentialStatus) -> String {
    let out = json!({
        "provider": credentials.provider.slug(),
        "has_anthropic_key": credentials.has_anthropic_key,
        "has_openai_key": credentials.has_openai_key,
        "ready": credentials.has_valid_config(),
    });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}
