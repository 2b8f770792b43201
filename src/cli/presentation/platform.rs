//! Platform presentation: detected environment and verdict.

use crate::platform::{EnvironmentDescriptor, PlatformVerdict};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn format_platform_text(env: &EnvironmentDescriptor, verdict: &PlatformVerdict) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Host OS:        {}\n",
        format!("{:?}", env.os_family).to_lowercase()
    ));
    output.push_str(&format!("Remote context: {}\n", env.remote.as_str()));
    output.push_str(&format!(
        "WSL available:  {}\n",
        if env.wsl_available { "yes" } else { "no" }
    ));
    let supported = if verdict.supported {
        "supported".green().to_string()
    } else {
        "unsupported".red().to_string()
    };
    output.push_str(&format!("Platform:       {} ({})\n", verdict.tag, supported));
    if !verdict.reason.is_empty() {
        output.push_str(&format!("\n{}\n", verdict.reason));
    }
    output
}

pub fn format_platform_json(env: &EnvironmentDescriptor, verdict: &PlatformVerdict) -> String {
    let out = json!({
        "environment": env,
        "verdict": verdict,
    });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}
