//! Shared helpers for command handlers.

use std::path::Path;

use tfunifi_core::ProviderClient;

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;

/// Build a provider client from settings and flags. No traffic until first use.
pub fn provider(global: &GlobalOpts) -> Result<ProviderClient, CliError> {
    let config = config::build_provider_config(global)?;
    tracing::debug!(url = %config.url, site = %config.site, "provider configured");
    Ok(ProviderClient::new(config))
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Numbered list, one entry per line, or `(none)`.
pub fn numbered(ids: &[String]) -> String {
    if ids.is_empty() {
        return "  (none)".into();
    }
    ids.iter()
        .enumerate()
        .map(|(i, id)| format!("  {:>3}. {id}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
