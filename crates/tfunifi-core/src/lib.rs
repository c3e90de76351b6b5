//! Firewall rule ordering for UniFi controllers.
//!
//! `tfunifi-core` sits between the configuration/CLI layers and the
//! controller API client:
//!
//! - [`reconcile`] turns a desired rule order into the minimal set of index
//!   updates, refusing to write when the configuration and the controller
//!   disagree about which rules exist.
//! - [`resource`] exposes that as a declarative firewall ruleset object with
//!   create, read, update, delete, import and plan operations.
//! - [`ProviderClient`] owns the controller session and the settings locks
//!   for one configured controller.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod reconcile;
pub mod resource;

pub use config::{ProviderConfig, TlsVerification};
pub use error::CoreError;
pub use model::{Ruleset, RulesetId, check_site_name};
pub use provider::{ProviderClient, SettingsKind, SettingsLocks};
pub use reconcile::{DesiredOrder, DriftReport, FirewallRuleApi};
pub use resource::{
    AppliedRuleset, ApplyError, FirewallRulesetConfig, FirewallRulesetResource,
    FirewallRulesetState, RulesetPlan,
};

// Re-exported so downstream crates need not depend on tfunifi-api directly.
pub use tfunifi_api::{Error as ApiError, FirewallRule, FirewallRuleIndexUpdate};
