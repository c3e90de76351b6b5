// Declarative resources managed through the provider client.

mod firewall_ruleset;

pub use firewall_ruleset::{
    AppliedRuleset, ApplyError, FirewallRulesetConfig, FirewallRulesetResource,
    FirewallRulesetState, RulesetPlan,
};
