// ── Domain model ──

pub mod ruleset;

pub use ruleset::{
    ParseRulesetError, Ruleset, RulesetId, canonical_ruleset_name, check_site_name,
};
