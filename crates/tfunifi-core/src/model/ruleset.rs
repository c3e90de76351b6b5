// ── Ruleset identity ──
//
// The controller names its firewall processing stages with a fixed set of
// identifiers. Configuration and import IDs are accepted in any case and
// canonicalized to the controller's spelling (`WANv6_IN`, not `WANV6_IN`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};
use thiserror::Error;

use crate::error::CoreError;

/// A firewall rule-processing stage on the controller, scoped to one site.
#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr, EnumIter,
)]
pub enum Ruleset {
    WAN_IN,
    WAN_OUT,
    WAN_LOCAL,
    LAN_IN,
    LAN_OUT,
    LAN_LOCAL,
    GUEST_IN,
    GUEST_OUT,
    GUEST_LOCAL,
    WANv6_IN,
    WANv6_OUT,
    WANv6_LOCAL,
    LANv6_IN,
    LANv6_OUT,
    LANv6_LOCAL,
    GUESTv6_IN,
    GUESTv6_OUT,
    GUESTv6_LOCAL,
}

impl Ruleset {
    /// The controller's spelling, as sent on the wire.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Upper-case a user-supplied ruleset name and restore the lowercase `v`
/// of the IPv6 variants: `wanv6_in` becomes `WANv6_IN`.
pub fn canonical_ruleset_name(raw: &str) -> String {
    raw.trim().to_ascii_uppercase().replacen('V', "v", 1)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown ruleset '{0}'")]
pub struct ParseRulesetError(pub String);

impl FromStr for Ruleset {
    type Err = ParseRulesetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let canonical = canonical_ruleset_name(s);
        Self::iter()
            .find(|r| r.as_str() == canonical)
            .ok_or_else(|| ParseRulesetError(s.to_owned()))
    }
}

// ── Composite resource ID ───────────────────────────────────────────

/// Check that `site` is usable as a single URL path segment and as the
/// left half of a `<site>:<RULESET>` identifier.
pub fn check_site_name(site: &str) -> Result<(), String> {
    if site.trim().is_empty() {
        return Err("site is empty".into());
    }
    if matches!(site, "." | "..") {
        return Err(format!("'{site}' is not a site name"));
    }
    if let Some(c) = site.chars().find(|&c| {
        matches!(c, '/' | '\\' | ':' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
    }) {
        return Err(format!("site '{site}' contains {c:?}"));
    }
    Ok(())
}

/// The `<site>:<RULESET>` identifier of a firewall ruleset resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RulesetId {
    pub site: String,
    pub ruleset: Ruleset,
}

impl RulesetId {
    pub fn new(site: impl Into<String>, ruleset: Ruleset) -> Self {
        Self {
            site: site.into(),
            ruleset,
        }
    }
}

impl fmt::Display for RulesetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.site, self.ruleset)
    }
}

impl FromStr for RulesetId {
    type Err = CoreError;

    /// Parse an import identifier, splitting on the first colon.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| CoreError::InvalidImportId {
            id: s.to_owned(),
            reason,
        };

        let (site, ruleset) = s
            .split_once(':')
            .ok_or_else(|| invalid("missing ':' separator".into()))?;
        check_site_name(site).map_err(invalid)?;
        let ruleset = ruleset.parse().map_err(|e: ParseRulesetError| invalid(e.to_string()))?;

        Ok(Self::new(site, ruleset))
    }
}
