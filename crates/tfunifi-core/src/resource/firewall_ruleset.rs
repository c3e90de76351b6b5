// ── Firewall ruleset resource ──
//
// Declarative object for the rule order of one (site, ruleset). The
// configuration arrives as a JSON-shaped object, is decoded and validated
// once into `FirewallRulesetConfig`, and every operation then runs against a
// fresh listing through the reconciler.

use std::error::Error as _;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tfunifi_api::FirewallRuleIndexUpdate;

use crate::error::CoreError;
use crate::model::{Ruleset, RulesetId, check_site_name};
use crate::reconcile::{self, BAND_WIDTH, DesiredOrder, FirewallRuleApi};

// ── Configuration ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    site: Option<String>,
    ruleset: String,
    #[serde(default)]
    before_predefined: Vec<String>,
    #[serde(default)]
    after_predefined: Vec<String>,
}

/// Validated configuration of a firewall ruleset object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirewallRulesetConfig {
    /// Explicit site; the provider's default site applies when absent.
    pub site: Option<String>,
    pub ruleset: Ruleset,
    pub order: DesiredOrder,
}

impl FirewallRulesetConfig {
    pub fn new(site: Option<String>, ruleset: Ruleset, order: DesiredOrder) -> Self {
        Self {
            site,
            ruleset,
            order,
        }
    }

    /// Decode and validate a raw configuration object.
    ///
    /// Accepted keys: `site` (optional), `ruleset` (any case),
    /// `before_predefined` and `after_predefined` (lists of rule IDs, both
    /// optional). Repeated IDs are not rejected here; the drift check
    /// reports them against the live rules.
    pub fn decode(raw: serde_json::Value) -> Result<Self, CoreError> {
        let raw: RawConfig =
            serde_json::from_value(raw).map_err(|e| CoreError::ValidationFailed {
                message: format!("invalid firewall ruleset configuration: {e}"),
            })?;

        if let Some(ref site) = raw.site {
            check_site_name(site).map_err(|message| CoreError::ValidationFailed { message })?;
        }

        let ruleset: Ruleset = raw
            .ruleset
            .parse()
            .map_err(|e: crate::model::ParseRulesetError| CoreError::ValidationFailed {
                message: e.to_string(),
            })?;

        for (field, ids) in [
            ("before_predefined", &raw.before_predefined),
            ("after_predefined", &raw.after_predefined),
        ] {
            if ids.len() > BAND_WIDTH {
                return Err(CoreError::ValidationFailed {
                    message: format!(
                        "{field} lists {} rules, at most {BAND_WIDTH} are allowed",
                        ids.len()
                    ),
                });
            }
            if let Some(pos) = ids.iter().position(|id| id.trim().is_empty()) {
                return Err(CoreError::ValidationFailed {
                    message: format!("{field}[{pos}] is an empty rule ID"),
                });
            }
        }

        Ok(Self::new(
            raw.site,
            ruleset,
            DesiredOrder::new(raw.before_predefined, raw.after_predefined),
        ))
    }
}

// ── State ───────────────────────────────────────────────────────────

/// What the resource records after a successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRulesetState {
    /// `<site>:<RULESET>`.
    pub id: String,
    pub site: String,
    pub ruleset: Ruleset,
    pub before_predefined: Vec<String>,
    pub after_predefined: Vec<String>,
}

impl FirewallRulesetState {
    fn new(id: &RulesetId, order: DesiredOrder) -> Self {
        Self {
            id: id.to_string(),
            site: id.site.clone(),
            ruleset: id.ruleset,
            before_predefined: order.before_predefined,
            after_predefined: order.after_predefined,
        }
    }

    pub fn ruleset_id(&self) -> RulesetId {
        RulesetId::new(self.site.clone(), self.ruleset)
    }

    pub fn order(&self) -> DesiredOrder {
        DesiredOrder::new(self.before_predefined.clone(), self.after_predefined.clone())
    }
}

/// A planned change: where the rules are now and what would be sent.
#[derive(Debug, Clone, Serialize)]
pub struct RulesetPlan {
    pub id: String,
    pub current: DesiredOrder,
    pub desired: DesiredOrder,
    pub updates: Vec<FirewallRuleIndexUpdate>,
}

impl RulesetPlan {
    pub fn is_noop(&self) -> bool {
        self.updates.is_empty()
    }
}

/// Outcome of a successful create or update: the index updates that were
/// sent (empty when the order already matched) and the state read back
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedRuleset {
    pub updates: Vec<FirewallRuleIndexUpdate>,
    #[serde(flatten)]
    pub state: FirewallRulesetState,
}

/// A failed create or update, with the state read back afterwards when that
/// read succeeded.
///
/// Displays as the underlying error and forwards `source()` to it.
#[derive(Debug)]
pub struct ApplyError {
    pub error: CoreError,
    pub refreshed: Option<Box<FirewallRulesetState>>,
}

impl ApplyError {
    pub fn into_inner(self) -> CoreError {
        self.error
    }
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for ApplyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.error.source()
    }
}

// ── Operations ──────────────────────────────────────────────────────

/// Firewall ruleset operations against one backend.
#[derive(Debug)]
pub struct FirewallRulesetResource<'a, A> {
    api: &'a A,
    default_site: &'a str,
}

impl<'a, A: FirewallRuleApi> FirewallRulesetResource<'a, A> {
    pub fn new(api: &'a A, default_site: &'a str) -> Self {
        Self { api, default_site }
    }

    fn resolve(&self, config: &FirewallRulesetConfig) -> RulesetId {
        let site = config.site.as_deref().unwrap_or(self.default_site);
        RulesetId::new(site, config.ruleset)
    }

    /// Compute the updates `apply` would send, without writing anything.
    pub async fn plan(&self, config: &FirewallRulesetConfig) -> Result<RulesetPlan, CoreError> {
        let id = self.resolve(config);
        let snapshot = reconcile::load_snapshot(self.api, &id.site, id.ruleset).await?;
        let updates = reconcile::plan(&snapshot, &config.order, &id.site, id.ruleset)?;
        Ok(RulesetPlan {
            id: id.to_string(),
            current: DesiredOrder::from_snapshot(&snapshot),
            desired: config.order.clone(),
            updates,
        })
    }

    /// Reorder the controller's rules to match `config` and record the result.
    ///
    /// The returned updates are the ones sent with the reorder, computed from
    /// the same listing.
    pub async fn create(&self, config: &FirewallRulesetConfig) -> Result<AppliedRuleset, ApplyError> {
        let id = self.resolve(config);
        match reconcile::apply(self.api, &id.site, id.ruleset, &config.order).await {
            Ok(done) => Ok(AppliedRuleset {
                updates: done.updates,
                state: FirewallRulesetState::new(&id, DesiredOrder::from_snapshot(&done.snapshot)),
            }),
            Err(error) => Err(self.refreshed_failure(&id, error).await),
        }
    }

    /// Re-apply a changed order. The site and ruleset of an existing object
    /// cannot change.
    pub async fn update(
        &self,
        prior: &FirewallRulesetState,
        config: &FirewallRulesetConfig,
    ) -> Result<AppliedRuleset, ApplyError> {
        let id = self.resolve(config);
        if id != prior.ruleset_id() {
            return Err(ApplyError {
                error: CoreError::ValidationFailed {
                    message: format!(
                        "cannot move firewall ruleset {} to {id}; site and ruleset are fixed",
                        prior.id
                    ),
                },
                refreshed: None,
            });
        }
        self.create(config).await
    }

    /// Current order of the rules in the object's ruleset.
    pub async fn read(&self, state: &FirewallRulesetState) -> Result<FirewallRulesetState, CoreError> {
        self.read_id(&state.ruleset_id()).await
    }

    /// Forget the object. The rules themselves stay where they are.
    #[allow(clippy::unused_self)]
    pub fn delete(&self, state: &FirewallRulesetState) {
        debug!(id = %state.id, "dropping firewall ruleset from management, rules unchanged");
    }

    /// Adopt an existing ruleset from a `<site>:<ruleset>` identifier.
    pub async fn import(&self, raw_id: &str) -> Result<FirewallRulesetState, CoreError> {
        let id: RulesetId = raw_id.parse()?;
        self.read_id(&id).await
    }

    async fn read_id(&self, id: &RulesetId) -> Result<FirewallRulesetState, CoreError> {
        let snapshot = reconcile::load_snapshot(self.api, &id.site, id.ruleset).await?;
        Ok(FirewallRulesetState::new(
            id,
            DesiredOrder::from_snapshot(&snapshot),
        ))
    }

    async fn refreshed_failure(&self, id: &RulesetId, error: CoreError) -> ApplyError {
        let refreshed = match self.read_id(id).await {
            Ok(state) => Some(Box::new(state)),
            Err(e) => {
                warn!(%id, error = %e, "could not refresh state after failed apply");
                None
            }
        };
        ApplyError { error, refreshed }
    }
}
