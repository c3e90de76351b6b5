// ── Minimal reindexing ──
//
// Lays each desired band list out from the band's base index and emits an
// update only for rules not already sitting in their target slot.

use tfunifi_api::FirewallRuleIndexUpdate;

use crate::error::CoreError;
use crate::model::Ruleset;

use super::snapshot::{BAND_WIDTH, Band, RulesetSnapshot};

/// Index updates placing `ids` at `band.base_index() + position`.
pub fn band_updates(
    snapshot: &RulesetSnapshot,
    ruleset: Ruleset,
    band: Band,
    ids: &[String],
) -> Result<Vec<FirewallRuleIndexUpdate>, CoreError> {
    if ids.len() > BAND_WIDTH {
        return Err(CoreError::ValidationFailed {
            message: format!(
                "{} rules configured {}, at most {BAND_WIDTH} fit",
                ids.len(),
                band_label(band)
            ),
        });
    }

    let mut updates = Vec::new();
    for (target, id) in (band.base_index()..).zip(ids) {
        let current =
            snapshot
                .current_index(id)
                .ok_or_else(|| CoreError::RuleNotInSnapshot {
                    rule_id: id.clone(),
                    ruleset,
                })?;
        if current != target {
            updates.push(FirewallRuleIndexUpdate::new(id.clone(), target));
        }
    }
    Ok(updates)
}

/// Updates for both bands, before-band first.
pub fn build_updates(
    snapshot: &RulesetSnapshot,
    ruleset: Ruleset,
    before_predefined: &[String],
    after_predefined: &[String],
) -> Result<Vec<FirewallRuleIndexUpdate>, CoreError> {
    let mut updates = band_updates(snapshot, ruleset, Band::BeforePredefined, before_predefined)?;
    updates.extend(band_updates(
        snapshot,
        ruleset,
        Band::AfterPredefined,
        after_predefined,
    )?);
    Ok(updates)
}

fn band_label(band: Band) -> &'static str {
    match band {
        Band::BeforePredefined => "before the predefined rules",
        Band::AfterPredefined => "after the predefined rules",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::reconcile::snapshot::tests::rule;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_owned()).collect()
    }

    fn six_rules() -> RulesetSnapshot {
        RulesetSnapshot::from_rules(&[
            rule("test1", "LAN_IN", 2000),
            rule("test2", "LAN_IN", 2001),
            rule("test3", "LAN_IN", 2002),
            rule("test4", "LAN_IN", 4000),
            rule("test5", "LAN_IN", 4001),
            rule("test6", "LAN_IN", 4002),
        ])
    }

    #[test]
    fn rotating_each_band_moves_every_rule() {
        let snap = six_rules();
        let updates = build_updates(
            &snap,
            Ruleset::LAN_IN,
            &ids(&["test3", "test1", "test2"]),
            &ids(&["test6", "test4", "test5"]),
        )
        .unwrap();

        assert_eq!(
            updates,
            vec![
                FirewallRuleIndexUpdate::new("test3", 2000),
                FirewallRuleIndexUpdate::new("test1", 2001),
                FirewallRuleIndexUpdate::new("test2", 2002),
                FirewallRuleIndexUpdate::new("test6", 4000),
                FirewallRuleIndexUpdate::new("test4", 4001),
                FirewallRuleIndexUpdate::new("test5", 4002),
            ]
        );
    }

    #[test]
    fn current_order_needs_no_updates() {
        let snap = six_rules();
        let updates = build_updates(
            &snap,
            Ruleset::LAN_IN,
            &snap.ids(true, false),
            &snap.ids(false, true),
        )
        .unwrap();
        assert!(updates.is_empty());
    }

    #[test]
    fn only_displaced_rules_are_updated() {
        let snap = six_rules();
        // Swap the last two of the before band; the after band is untouched.
        let updates = build_updates(
            &snap,
            Ruleset::LAN_IN,
            &ids(&["test1", "test3", "test2"]),
            &ids(&["test4", "test5", "test6"]),
        )
        .unwrap();

        assert_eq!(
            updates,
            vec![
                FirewallRuleIndexUpdate::new("test3", 2001),
                FirewallRuleIndexUpdate::new("test2", 2002),
            ]
        );
        assert!(updates.len() <= snap.len());
    }

    #[test]
    fn gaps_are_compacted() {
        let snap = RulesetSnapshot::from_rules(&[
            rule("a", "WAN_IN", 2000),
            rule("b", "WAN_IN", 2007),
        ]);
        let updates = band_updates(&snap, Ruleset::WAN_IN, Band::BeforePredefined, &ids(&["a", "b"]))
            .unwrap();
        assert_eq!(updates, vec![FirewallRuleIndexUpdate::new("b", 2001)]);
    }

    #[test]
    fn rule_can_move_between_bands() {
        let snap = six_rules();
        let updates = build_updates(
            &snap,
            Ruleset::LAN_IN,
            &ids(&["test1", "test2", "test3", "test4"]),
            &ids(&["test5", "test6"]),
        )
        .unwrap();

        assert_eq!(
            updates,
            vec![
                FirewallRuleIndexUpdate::new("test4", 2003),
                FirewallRuleIndexUpdate::new("test5", 4000),
                FirewallRuleIndexUpdate::new("test6", 4001),
            ]
        );
    }

    #[test]
    fn unknown_rule_is_a_lookup_error() {
        let snap = six_rules();
        let err = band_updates(&snap, Ruleset::LAN_IN, Band::AfterPredefined, &ids(&["nope"]))
            .unwrap_err();
        assert!(
            matches!(err, CoreError::RuleNotInSnapshot { ref rule_id, .. } if rule_id == "nope"),
            "got {err:?}"
        );
    }

    #[test]
    fn band_overflow_is_rejected() {
        let snap = RulesetSnapshot::default();
        let too_many: Vec<String> = (0..=BAND_WIDTH).map(|i| format!("r{i}")).collect();
        let err = band_updates(&snap, Ruleset::LAN_IN, Band::BeforePredefined, &too_many)
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed { .. }));
    }
}
