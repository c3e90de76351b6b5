// ── Drift detection ──
//
// The configured IDs must be exactly the managed rules on the controller,
// each listed once. Any difference stops the operation before a write.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// What differs between the live rule set and the configured one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriftReport {
    /// On the controller but absent from the configuration.
    pub unmanaged: Vec<String>,
    /// In the configuration but not on the controller (in either band).
    pub unknown: Vec<String>,
    /// Listed more than once, on either side.
    pub duplicated: Vec<String>,
}

impl DriftReport {
    /// Compare live and desired IDs as sets where every ID may appear once.
    ///
    /// Each list in the report is sorted and free of repeats.
    pub fn compare(current: &[String], desired: &[String]) -> Self {
        let current_counts = count(current);
        let desired_counts = count(desired);

        let unmanaged = current_counts
            .keys()
            .filter(|id| !desired_counts.contains_key(*id))
            .map(|id| (*id).to_owned())
            .collect::<BTreeSet<_>>();
        let unknown = desired_counts
            .keys()
            .filter(|id| !current_counts.contains_key(*id))
            .map(|id| (*id).to_owned())
            .collect::<BTreeSet<_>>();
        let duplicated = current_counts
            .iter()
            .chain(desired_counts.iter())
            .filter(|(_, n)| **n > 1)
            .map(|(id, _)| (*id).to_owned())
            .collect::<BTreeSet<_>>();

        Self {
            unmanaged: unmanaged.into_iter().collect(),
            unknown: unknown.into_iter().collect(),
            duplicated: duplicated.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.unmanaged.is_empty() && self.unknown.is_empty() && self.duplicated.is_empty()
    }
}

fn count(ids: &[String]) -> HashMap<&str, usize> {
    let mut counts = HashMap::with_capacity(ids.len());
    for id in ids {
        *counts.entry(id.as_str()).or_insert(0) += 1;
    }
    counts
}

impl fmt::Display for DriftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            ("not in configuration", &self.unmanaged),
            ("not on controller", &self.unknown),
            ("listed more than once", &self.duplicated),
        ];
        let mut first = true;
        for (label, ids) in parts {
            if ids.is_empty() {
                continue;
            }
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{label}: {}", ids.join(", "))?;
        }
        if first {
            f.write_str("no differences")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn same_set_in_any_order_is_clean() {
        let report = DriftReport::compare(&ids(&["a", "b", "c"]), &ids(&["c", "a", "b"]));
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "no differences");
    }

    #[test]
    fn missing_rule_is_unmanaged() {
        let report = DriftReport::compare(&ids(&["a", "b", "c"]), &ids(&["a", "b"]));
        assert_eq!(report.unmanaged, vec!["c"]);
        assert!(report.unknown.is_empty());
        assert!(!report.is_empty());
    }

    #[test]
    fn extra_rule_is_unknown() {
        let report = DriftReport::compare(&ids(&["a"]), &ids(&["a", "z"]));
        assert_eq!(report.unknown, vec!["z"]);
        assert!(report.unmanaged.is_empty());
    }

    #[test]
    fn duplicate_fails_even_when_sizes_match() {
        // Same length, but "a" twice and "b" never.
        let report = DriftReport::compare(&ids(&["a", "b"]), &ids(&["a", "a"]));
        assert_eq!(report.duplicated, vec!["a"]);
        assert_eq!(report.unmanaged, vec!["b"]);
    }

    #[test]
    fn duplicate_with_otherwise_equal_sets() {
        let report = DriftReport::compare(&ids(&["a", "b"]), &ids(&["a", "b", "b"]));
        assert_eq!(report.duplicated, vec!["b"]);
        assert!(report.unmanaged.is_empty());
        assert!(report.unknown.is_empty());
        assert!(!report.is_empty());
    }

    #[test]
    fn display_lists_each_category() {
        let report = DriftReport {
            unmanaged: ids(&["c"]),
            unknown: ids(&["x", "y"]),
            duplicated: Vec::new(),
        };
        assert_eq!(
            report.to_string(),
            "not in configuration: c; not on controller: x, y"
        );
    }
}
