// ── Provider client ──
//
// One `ProviderClient` per configured controller. The controller session is
// opened on first use: detect the platform, build the transport, log in.
// Concurrent first uses wait on the same login.

mod locks;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use tfunifi_api::{FirewallRule, FirewallRuleIndexUpdate, LegacyClient};

use crate::config::ProviderConfig;
use crate::model::Ruleset;
use crate::reconcile::FirewallRuleApi;
use crate::resource::FirewallRulesetResource;

pub use locks::{SettingsKind, SettingsLocks};

pub struct ProviderClient {
    config: ProviderConfig,
    legacy: OnceCell<LegacyClient>,
    locks: SettingsLocks,
}

impl ProviderClient {
    /// Create a client. No network traffic happens until the first call.
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            legacy: OnceCell::new(),
            locks: SettingsLocks::new(),
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn default_site(&self) -> &str {
        &self.config.site
    }

    pub fn locks(&self) -> &SettingsLocks {
        &self.locks
    }

    /// The logged-in legacy client, connecting on first use.
    pub async fn legacy(&self) -> Result<&LegacyClient, tfunifi_api::Error> {
        self.legacy.get_or_try_init(|| self.connect()).await
    }

    async fn connect(&self) -> Result<LegacyClient, tfunifi_api::Error> {
        let http = self.config.transport().build_client()?;
        let platform = LegacyClient::detect_platform(&http, &self.config.url).await?;
        debug!(?platform, url = %self.config.url, "detected controller platform");

        let client = LegacyClient::with_client(http, self.config.url.clone(), platform);
        client
            .login(&self.config.username, &self.config.password)
            .await?;
        info!(url = %self.config.url, user = %self.config.username, "logged in to controller");
        Ok(client)
    }

    /// Firewall ruleset resource bound to this client and its default site.
    pub fn firewall_rulesets(&self) -> FirewallRulesetResource<'_, Self> {
        FirewallRulesetResource::new(self, self.default_site())
    }

    /// End the controller session if one was opened. Failures are logged.
    pub async fn close(&self) {
        let Some(client) = self.legacy.get() else {
            return;
        };
        match client.logout().await {
            Ok(()) => debug!("logged out of controller"),
            Err(e) => warn!(error = %e, "logout failed"),
        }
    }
}

impl FirewallRuleApi for ProviderClient {
    async fn list_firewall_rules(&self, site: &str) -> Result<Vec<FirewallRule>, tfunifi_api::Error> {
        self.legacy().await?.list_firewall_rules(site).await
    }

    async fn reorder_firewall_rules(
        &self,
        site: &str,
        ruleset: Ruleset,
        updates: &[FirewallRuleIndexUpdate],
    ) -> Result<(), tfunifi_api::Error> {
        self.legacy()
            .await?
            .reorder_firewall_rules(site, ruleset.as_str(), updates)
            .await
    }
}
