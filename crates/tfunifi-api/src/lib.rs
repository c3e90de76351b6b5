// tfunifi-api: async client for the UniFi controller's firewall rule endpoints

pub mod auth;
pub mod error;
pub mod legacy;
pub mod transport;

pub use auth::ControllerPlatform;
pub use error::Error;
pub use legacy::LegacyClient;
pub use legacy::models::{FirewallRule, FirewallRuleIndexUpdate};
pub use transport::{TlsMode, TransportConfig};
