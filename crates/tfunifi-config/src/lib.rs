//! Provider configuration for tfunifi.
//!
//! Settings are layered: built-in defaults, then a TOML file, then `UNIFI_*`
//! environment variables. The result is validated into
//! `tfunifi_core::ProviderConfig`; the CLI applies its flag overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tfunifi_core::{ProviderConfig, TlsVerification, check_site_name};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {missing} configured (set it in the config file or UNIFI_{env})")]
    NoCredentials { missing: &'static str, env: &'static str },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Provider settings as written in `config.toml` or the environment.
///
/// ```toml
/// api_url  = "https://192.168.1.1"
/// username = "terraform"
/// password = "..."
/// site     = "default"
/// insecure = true
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderSettings {
    /// Controller root URL. `UNIFI_API_URL`.
    pub api_url: Option<String>,

    /// Local controller account. `UNIFI_USERNAME`.
    pub username: Option<String>,

    /// Plaintext password; prefer `UNIFI_PASSWORD`.
    pub password: Option<String>,

    /// Site used by resources that do not name one. `UNIFI_SITE`.
    #[serde(default = "default_site")]
    pub site: String,

    /// Skip TLS certificate verification. `UNIFI_INSECURE`.
    #[serde(default)]
    pub insecure: bool,

    /// PEM file with the controller's CA. `UNIFI_CA_CERT`.
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds. `UNIFI_TIMEOUT`.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_url: None,
            username: None,
            password: None,
            site: default_site(),
            insecure: false,
            ca_cert: None,
            timeout: default_timeout(),
        }
    }
}

fn default_site() -> String {
    "default".into()
}
fn default_timeout() -> u64 {
    30
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "tfunifi", "tfunifi").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("tfunifi");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Defaults, then the TOML file at `path` (skipped when absent), then the
/// environment.
pub fn figment(path: &Path) -> Figment {
    file_figment(path).merge(Env::prefixed("UNIFI_"))
}

fn file_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ProviderSettings::default()))
        .merge(Toml::file(path))
}

/// Load settings from `path`, or the platform config path when `None`.
pub fn load_settings(path: Option<&Path>) -> Result<ProviderSettings, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    if path.is_dir() {
        return Err(ConfigError::Validation {
            field: "config".into(),
            reason: format!("{} is a directory", path.display()),
        });
    }
    Ok(figment(&path).extract()?)
}

// ── Validation ──────────────────────────────────────────────────────

/// Validate settings into the runtime configuration.
pub fn to_provider_config(settings: &ProviderSettings) -> Result<ProviderConfig, ConfigError> {
    let raw_url = settings
        .api_url
        .as_deref()
        .ok_or(ConfigError::NoCredentials {
            missing: "controller URL",
            env: "API_URL",
        })?;
    let url: url::Url = raw_url.parse().map_err(|e| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("'{raw_url}' is not a URL: {e}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("expected an http(s) URL, got '{raw_url}'"),
        });
    }

    let username = settings
        .username
        .clone()
        .filter(|u| !u.is_empty())
        .ok_or(ConfigError::NoCredentials {
            missing: "username",
            env: "USERNAME",
        })?;
    let password = settings
        .password
        .clone()
        .map(SecretString::from)
        .ok_or(ConfigError::NoCredentials {
            missing: "password",
            env: "PASSWORD",
        })?;

    check_site_name(&settings.site).map_err(|reason| ConfigError::Validation {
        field: "site".into(),
        reason,
    })?;
    if settings.timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least one second".into(),
        });
    }

    let tls = if settings.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = settings.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = ProviderConfig::new(url, username, password);
    config.site.clone_from(&settings.site);
    config.tls = tls;
    config.timeout = Duration::from_secs(settings.timeout);
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use secrecy::ExposeSecret;

    use super::*;

    fn settings_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn complete() -> ProviderSettings {
        ProviderSettings {
            api_url: Some("https://192.168.1.1".into()),
            username: Some("terraform".into()),
            password: Some("hunter2".into()),
            ..ProviderSettings::default()
        }
    }

    #[test]
    fn file_values_override_defaults() {
        let file = settings_file(
            r#"
            api_url = "https://unifi.lan:8443"
            username = "admin"
            site = "branch"
            timeout = 5
            "#,
        );
        let settings: ProviderSettings = file_figment(file.path()).extract().unwrap();

        assert_eq!(settings.api_url.as_deref(), Some("https://unifi.lan:8443"));
        assert_eq!(settings.site, "branch");
        assert_eq!(settings.timeout, 5);
        assert!(!settings.insecure);
        assert!(settings.password.is_none());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings: ProviderSettings = file_figment(&dir.path().join("absent.toml"))
            .extract()
            .unwrap();
        assert_eq!(settings.site, "default");
        assert_eq!(settings.timeout, 30);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let file = settings_file("timeout = \"soon\"");
        let err = file_figment(file.path()).extract::<ProviderSettings>().unwrap_err();
        assert!(ConfigError::from(err).to_string().contains("config loading failed"));
    }

    #[test]
    fn directory_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings(Some(dir.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "config"));
    }

    #[test]
    fn complete_settings_validate() {
        let config = to_provider_config(&complete()).unwrap();
        assert_eq!(config.url.as_str(), "https://192.168.1.1/");
        assert_eq!(config.username, "terraform");
        assert_eq!(config.password.expose_secret(), "hunter2");
        assert_eq!(config.site, "default");
        assert_eq!(config.tls, TlsVerification::SystemDefaults);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn tls_mode_follows_insecure_then_ca_cert() {
        let mut settings = complete();
        settings.ca_cert = Some(PathBuf::from("/etc/unifi/ca.pem"));
        assert_eq!(
            to_provider_config(&settings).unwrap().tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/unifi/ca.pem"))
        );

        settings.insecure = true;
        assert_eq!(
            to_provider_config(&settings).unwrap().tls,
            TlsVerification::DangerAcceptInvalid
        );
    }

    #[test]
    fn missing_credentials_are_reported() {
        let mut settings = complete();
        settings.password = None;
        assert!(matches!(
            to_provider_config(&settings),
            Err(ConfigError::NoCredentials { missing: "password", .. })
        ));

        settings = complete();
        settings.api_url = None;
        let err = to_provider_config(&settings).unwrap_err();
        assert!(err.to_string().contains("UNIFI_API_URL"), "{err}");
    }

    #[test]
    fn bad_values_are_rejected() {
        let mut settings = complete();
        settings.api_url = Some("ftp://controller".into());
        assert!(matches!(
            to_provider_config(&settings),
            Err(ConfigError::Validation { ref field, .. }) if field == "api_url"
        ));

        settings = complete();
        settings.timeout = 0;
        assert!(to_provider_config(&settings).is_err());

        settings = complete();
        settings.site = String::new();
        assert!(to_provider_config(&settings).is_err());
    }

    #[test]
    fn site_must_be_a_single_path_segment() {
        for site in ["x/../../self", "branch:1", "a?b", ".."] {
            let mut settings = complete();
            settings.site = site.into();
            assert!(
                matches!(
                    to_provider_config(&settings),
                    Err(ConfigError::Validation { ref field, .. }) if field == "site"
                ),
                "{site}"
            );
        }
    }
}
