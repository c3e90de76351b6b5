// ── Firewall ruleset reconciler ──
//
// Converts a desired rule order for one (site, ruleset) into the smallest set
// of index reassignments, applies them in a single reorder call, and reads
// the ruleset back. Every operation lists the rules fresh; nothing is cached
// between calls.

mod drift;
mod reindex;
mod snapshot;

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tfunifi_api::{FirewallRule, FirewallRuleIndexUpdate, LegacyClient};

use crate::error::CoreError;
use crate::model::Ruleset;

pub use drift::DriftReport;
pub use reindex::{band_updates, build_updates};
pub use snapshot::{BAND_WIDTH, Band, RuleAtIndex, RulesetSnapshot};

// ── Backend seam ────────────────────────────────────────────────────

/// The two controller calls the reconciler depends on.
pub trait FirewallRuleApi: Send + Sync {
    /// Every firewall rule on `site`, across all rulesets.
    fn list_firewall_rules(
        &self,
        site: &str,
    ) -> impl Future<Output = Result<Vec<FirewallRule>, tfunifi_api::Error>> + Send;

    /// Reassign indices within one ruleset in a single request.
    fn reorder_firewall_rules(
        &self,
        site: &str,
        ruleset: Ruleset,
        updates: &[FirewallRuleIndexUpdate],
    ) -> impl Future<Output = Result<(), tfunifi_api::Error>> + Send;
}

impl FirewallRuleApi for LegacyClient {
    async fn list_firewall_rules(&self, site: &str) -> Result<Vec<FirewallRule>, tfunifi_api::Error> {
        LegacyClient::list_firewall_rules(self, site).await
    }

    async fn reorder_firewall_rules(
        &self,
        site: &str,
        ruleset: Ruleset,
        updates: &[FirewallRuleIndexUpdate],
    ) -> Result<(), tfunifi_api::Error> {
        LegacyClient::reorder_firewall_rules(self, site, ruleset.as_str(), updates).await
    }
}

// ── Desired order ───────────────────────────────────────────────────

/// Rule IDs in the order they should be evaluated, split around the
/// controller's predefined rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredOrder {
    pub before_predefined: Vec<String>,
    pub after_predefined: Vec<String>,
}

impl DesiredOrder {
    pub fn new(before_predefined: Vec<String>, after_predefined: Vec<String>) -> Self {
        Self {
            before_predefined,
            after_predefined,
        }
    }

    /// The order currently on the controller.
    pub fn from_snapshot(snapshot: &RulesetSnapshot) -> Self {
        Self::new(snapshot.ids(true, false), snapshot.ids(false, true))
    }

    /// Both lists concatenated, before-band first.
    pub fn all_ids(&self) -> Vec<String> {
        self.before_predefined
            .iter()
            .chain(&self.after_predefined)
            .cloned()
            .collect()
    }
}

// ── Operations ──────────────────────────────────────────────────────

/// List the site's rules and snapshot the ones belonging to `ruleset`.
pub async fn load_snapshot<A: FirewallRuleApi>(
    api: &A,
    site: &str,
    ruleset: Ruleset,
) -> Result<RulesetSnapshot, CoreError> {
    let rules = api.list_firewall_rules(site).await?;
    let snapshot = RulesetSnapshot::from_rules(
        rules
            .iter()
            .filter(|rule| rule.ruleset == ruleset.as_str()),
    );
    debug!(
        site,
        %ruleset,
        listed = rules.len(),
        managed = snapshot.len(),
        "loaded ruleset snapshot"
    );
    Ok(snapshot)
}

/// Check `desired` against the snapshot and compute the index updates.
///
/// Fails with [`CoreError::RulesetDrift`] unless the desired IDs are exactly
/// the managed rules, each listed once.
pub fn plan(
    snapshot: &RulesetSnapshot,
    desired: &DesiredOrder,
    site: &str,
    ruleset: Ruleset,
) -> Result<Vec<FirewallRuleIndexUpdate>, CoreError> {
    let report = DriftReport::compare(&snapshot.ids(true, true), &desired.all_ids());
    if !report.is_empty() {
        return Err(CoreError::RulesetDrift {
            site: site.to_owned(),
            ruleset,
            report,
        });
    }

    let updates = build_updates(
        snapshot,
        ruleset,
        &desired.before_predefined,
        &desired.after_predefined,
    )?;
    debug!(site, %ruleset, updates = updates.len(), "computed reorder plan");
    Ok(updates)
}

/// Result of a successful [`apply`].
#[derive(Debug, Clone)]
pub struct Reconciled {
    /// Updates that were sent; empty when the order already matched.
    pub updates: Vec<FirewallRuleIndexUpdate>,
    /// The ruleset as read back after the reorder.
    pub snapshot: RulesetSnapshot,
}

/// Bring the controller's order for `ruleset` in line with `desired`.
pub async fn apply<A: FirewallRuleApi>(
    api: &A,
    site: &str,
    ruleset: Ruleset,
    desired: &DesiredOrder,
) -> Result<Reconciled, CoreError> {
    let current = load_snapshot(api, site, ruleset).await?;
    let updates = plan(&current, desired, site, ruleset)?;

    if updates.is_empty() {
        debug!(site, %ruleset, "rule order already matches, skipping reorder");
    } else {
        api.reorder_firewall_rules(site, ruleset, &updates).await?;
        info!(site, %ruleset, count = updates.len(), "reordered firewall rules");
    }

    let snapshot = load_snapshot(api, site, ruleset).await?;
    Ok(Reconciled { updates, snapshot })
}
