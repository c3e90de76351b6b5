// Legacy API client modules
//
// Hand-written client for the UniFi controller's legacy (non-OpenAPI)
// endpoints, all wrapped in the `{ meta: { rc, msg }, data: [...] }` envelope.

pub mod auth;
pub mod client;
pub mod firewall;
pub mod models;

pub use client::LegacyClient;
