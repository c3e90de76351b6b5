// ── Ruleset snapshot ──
//
// A point-in-time view of one ruleset's user-orderable rules, built from a
// live listing and thrown away after the operation. Rules sit in two bands
// around the controller's predefined rules (index 3000-3999); anything
// outside the bands is not ours to reorder and is left out.

use std::collections::HashMap;
use std::ops::Range;

use serde::Serialize;

use tfunifi_api::FirewallRule;

/// Number of slots in each band.
pub const BAND_WIDTH: usize = 1000;

/// Which side of the predefined rules a user rule runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Band {
    /// Indices 2000-2999, evaluated before the predefined rules.
    BeforePredefined,
    /// Indices 4000-4999, evaluated after the predefined rules.
    AfterPredefined,
}

impl Band {
    /// First index of the band; the desired order is laid out from here.
    pub const fn base_index(self) -> i32 {
        match self {
            Self::BeforePredefined => 2000,
            Self::AfterPredefined => 4000,
        }
    }

    pub const fn range(self) -> Range<i32> {
        let base = self.base_index();
        base..base + 1000
    }

    /// The band an index falls in, if any.
    pub fn of(index: i32) -> Option<Self> {
        [Self::BeforePredefined, Self::AfterPredefined]
            .into_iter()
            .find(|band| band.range().contains(&index))
    }
}

/// A rule reduced to what ordering needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleAtIndex {
    pub id: String,
    pub rule_index: i32,
}

/// Both bands of one ruleset, each ascending by index, plus an ID lookup.
///
/// The lookup stores `(band, position)` into the owned vectors rather than
/// references, so it never dangles.
#[derive(Debug, Clone, Default)]
pub struct RulesetSnapshot {
    before: Vec<RuleAtIndex>,
    after: Vec<RuleAtIndex>,
    lookup: HashMap<String, (Band, usize)>,
}

impl RulesetSnapshot {
    /// Build a snapshot from the rules of a single ruleset.
    pub fn from_rules<'a>(rules: impl IntoIterator<Item = &'a FirewallRule>) -> Self {
        let mut before = Vec::new();
        let mut after = Vec::new();

        for rule in rules {
            let projected = RuleAtIndex {
                id: rule.id.clone(),
                rule_index: rule.rule_index,
            };
            match Band::of(rule.rule_index) {
                Some(Band::BeforePredefined) => before.push(projected),
                Some(Band::AfterPredefined) => after.push(projected),
                None => {}
            }
        }

        // Stable sorts: ties keep listing order.
        before.sort_by_key(|r| r.rule_index);
        after.sort_by_key(|r| r.rule_index);

        let lookup = before
            .iter()
            .enumerate()
            .map(|(pos, r)| (r.id.clone(), (Band::BeforePredefined, pos)))
            .chain(
                after
                    .iter()
                    .enumerate()
                    .map(|(pos, r)| (r.id.clone(), (Band::AfterPredefined, pos))),
            )
            .collect();

        Self {
            before,
            after,
            lookup,
        }
    }

    /// The rules of one band, ascending by index.
    pub fn band(&self, band: Band) -> &[RuleAtIndex] {
        match band {
            Band::BeforePredefined => &self.before,
            Band::AfterPredefined => &self.after,
        }
    }

    /// Rule IDs in evaluation order: the before band, then the after band.
    pub fn ids(&self, include_before: bool, include_after: bool) -> Vec<String> {
        let before = self.before.iter().filter(|_| include_before);
        let after = self.after.iter().filter(|_| include_after);
        before.chain(after).map(|r| r.id.clone()).collect()
    }

    /// Look up a managed rule by ID.
    pub fn get(&self, id: &str) -> Option<&RuleAtIndex> {
        let &(band, pos) = self.lookup.get(id)?;
        self.band(band).get(pos)
    }

    /// Current index of a managed rule.
    pub fn current_index(&self, id: &str) -> Option<i32> {
        self.get(id).map(|r| r.rule_index)
    }

    /// Number of managed rules across both bands.
    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    pub(crate) fn rule(id: &str, ruleset: &str, rule_index: i32) -> FirewallRule {
        FirewallRule {
            id: id.into(),
            site_id: None,
            name: None,
            ruleset: ruleset.into(),
            rule_index,
            action: None,
            enabled: true,
            protocol: None,
            logging: false,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(Band::of(1999), None);
        assert_eq!(Band::of(2000), Some(Band::BeforePredefined));
        assert_eq!(Band::of(2999), Some(Band::BeforePredefined));
        assert_eq!(Band::of(3000), None);
        assert_eq!(Band::of(3999), None);
        assert_eq!(Band::of(4000), Some(Band::AfterPredefined));
        assert_eq!(Band::of(4999), Some(Band::AfterPredefined));
        assert_eq!(Band::of(5000), None);
    }

    #[test]
    fn partitions_sorts_and_drops_out_of_band() {
        let rules = vec![
            rule("post-b", "LAN_IN", 4005),
            rule("pre-b", "LAN_IN", 2010),
            rule("predefined", "LAN_IN", 3001),
            rule("pre-a", "LAN_IN", 2000),
            rule("post-a", "LAN_IN", 4000),
            rule("stray", "LAN_IN", 0),
        ];

        let snap = RulesetSnapshot::from_rules(&rules);

        assert_eq!(snap.ids(true, false), vec!["pre-a", "pre-b"]);
        assert_eq!(snap.ids(false, true), vec!["post-a", "post-b"]);
        assert_eq!(snap.ids(true, true), vec!["pre-a", "pre-b", "post-a", "post-b"]);
        assert!(snap.ids(false, false).is_empty());
        assert_eq!(snap.len(), 4);
        assert_eq!(snap.current_index("predefined"), None);
        assert_eq!(snap.current_index("stray"), None);
    }

    #[test]
    fn lookup_resolves_into_both_bands() {
        let rules = vec![rule("a", "WAN_IN", 2003), rule("b", "WAN_IN", 4002)];
        let snap = RulesetSnapshot::from_rules(&rules);

        assert_eq!(snap.current_index("a"), Some(2003));
        assert_eq!(snap.current_index("b"), Some(4002));
        assert_eq!(snap.get("b").map(|r| r.id.as_str()), Some("b"));
        assert_eq!(snap.get("missing"), None);
    }

    #[test]
    fn empty_listing_gives_empty_snapshot() {
        let snap = RulesetSnapshot::from_rules(&[]);
        assert!(snap.is_empty());
        assert!(snap.band(Band::AfterPredefined).is_empty());
    }
}
