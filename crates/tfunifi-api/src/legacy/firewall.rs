// Legacy API firewall rule endpoints
//
// Rules are listed site-wide through the REST collection; ordering is
// changed through the `cmd/firewall` command endpoint, one ruleset at a time.

use serde::Serialize;
use tracing::debug;

use crate::error::Error;
use crate::legacy::client::LegacyClient;
use crate::legacy::models::{FirewallRule, FirewallRuleIndexUpdate};

#[derive(Serialize)]
struct ReorderRequest<'a> {
    cmd: &'static str,
    ruleset: &'a str,
    rules: &'a [FirewallRuleIndexUpdate],
}

impl LegacyClient {
    /// List every firewall rule on a site, across all rulesets.
    ///
    /// `GET /api/s/{site}/rest/firewallrule`
    pub async fn list_firewall_rules(&self, site: &str) -> Result<Vec<FirewallRule>, Error> {
        let url = self.site_url(site, "rest/firewallrule")?;
        debug!(site, "listing firewall rules");
        self.get(url).await
    }

    /// Assign new rule indices within one ruleset in a single request.
    ///
    /// `POST /api/s/{site}/cmd/firewall` with
    /// `{"cmd": "reorder", "ruleset": "...", "rules": [{"_id": "...", "rule_index": "..."}]}`
    pub async fn reorder_firewall_rules(
        &self,
        site: &str,
        ruleset: &str,
        rules: &[FirewallRuleIndexUpdate],
    ) -> Result<(), Error> {
        let url = self.site_url(site, "cmd/firewall")?;
        debug!(site, ruleset, count = rules.len(), "reordering firewall rules");
        let _: Vec<serde_json::Value> = self
            .post(
                url,
                &ReorderRequest {
                    cmd: "reorder",
                    ruleset,
                    rules,
                },
            )
            .await?;
        Ok(())
    }
}
