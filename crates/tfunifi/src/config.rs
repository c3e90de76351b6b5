//! Flag overrides on top of the layered provider settings.
//!
//! This is the single place where CLI options cross into
//! `tfunifi_core::ProviderConfig`.

use std::path::PathBuf;

use tfunifi_config::{ProviderSettings, config_path, load_settings, to_provider_config};
use tfunifi_core::ProviderConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Settings file in effect: `--config` or the platform default.
pub fn settings_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Apply flags to loaded settings (flag > env > file > default).
pub fn apply_overrides(settings: &mut ProviderSettings, global: &GlobalOpts) {
    if let Some(ref url) = global.controller {
        settings.api_url = Some(url.clone());
    }
    if let Some(ref site) = global.site {
        settings.site.clone_from(site);
    }
    if global.insecure {
        settings.insecure = true;
    }
    if let Some(timeout) = global.timeout {
        settings.timeout = timeout;
    }
}

/// Load, override and validate the provider configuration.
pub fn build_provider_config(global: &GlobalOpts) -> Result<ProviderConfig, CliError> {
    let path = settings_path(global);
    let mut settings =
        load_settings(Some(&path)).map_err(|e| CliError::config(e, &path))?;
    apply_overrides(&mut settings, global);
    to_provider_config(&settings).map_err(|e| CliError::config(e, &path))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["tfunifi"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["completions", "bash"]);
        Cli::parse_from(argv).global
    }

    #[test]
    fn flags_override_settings() {
        let mut settings = ProviderSettings {
            api_url: Some("https://file.example".into()),
            ..ProviderSettings::default()
        };
        let opts = global(&[
            "--controller",
            "https://flag.example",
            "--site",
            "branch",
            "--insecure",
            "--timeout",
            "7",
        ]);

        apply_overrides(&mut settings, &opts);

        assert_eq!(settings.api_url.as_deref(), Some("https://flag.example"));
        assert_eq!(settings.site, "branch");
        assert!(settings.insecure);
        assert_eq!(settings.timeout, 7);
    }

    #[test]
    fn absent_flags_keep_settings() {
        let mut settings = ProviderSettings {
            site: "home".into(),
            timeout: 12,
            ..ProviderSettings::default()
        };
        apply_overrides(&mut settings, &global(&[]));
        assert_eq!(settings.site, "home");
        assert_eq!(settings.timeout, 12);
        assert!(settings.api_url.is_none());
    }

    #[test]
    fn explicit_config_path_wins() {
        let opts = global(&["--config", "/etc/tfunifi.toml"]);
        assert_eq!(settings_path(&opts), PathBuf::from("/etc/tfunifi.toml"));
    }
}
