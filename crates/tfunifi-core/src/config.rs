// ── Provider connection configuration ──
//
// Describes how a provider instance reaches its controller. Built by the
// configuration layer or the CLI and handed in; core never reads files.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use tfunifi_api::{TlsMode, TransportConfig};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Default, since most controllers ship a self-signed cert.
    #[default]
    DangerAcceptInvalid,
}

impl TlsVerification {
    pub(crate) fn to_transport(&self) -> TlsMode {
        match self {
            Self::SystemDefaults => TlsMode::System,
            Self::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            Self::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Everything needed to open a session with one controller.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Controller root, e.g. `https://192.168.1.1` or `https://unifi:8443`.
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    /// Site used when a resource does not name one.
    pub site: String,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(url: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            url,
            username: username.into(),
            password,
            site: "default".into(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.to_transport(),
            timeout: self.timeout,
            cookie_jar: None,
        }
        .with_cookie_jar()
    }
}
