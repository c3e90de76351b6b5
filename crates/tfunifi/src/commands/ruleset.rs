//! Firewall ruleset command handlers (show/import, plan, apply).

use serde_json::json;
use tabled::Tabled;
use tracing::{info, warn};

use tfunifi_core::{
    AppliedRuleset, FirewallRuleIndexUpdate, FirewallRulesetConfig, FirewallRulesetState,
    ProviderClient, RulesetId, RulesetPlan,
};

use crate::cli::{DesiredArgs, GlobalOpts, RulesetArgs, RulesetCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Update table row ────────────────────────────────────────────────

#[derive(Tabled)]
struct UpdateRow {
    #[tabled(rename = "Rule ID")]
    id: String,
    #[tabled(rename = "New Index")]
    rule_index: i32,
}

impl From<&FirewallRuleIndexUpdate> for UpdateRow {
    fn from(u: &FirewallRuleIndexUpdate) -> Self {
        Self {
            id: u.id.clone(),
            rule_index: u.rule_index,
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

fn state_detail(s: &FirewallRulesetState) -> String {
    [
        format!("ID:      {}", s.id),
        format!("Site:    {}", s.site),
        format!("Ruleset: {}", s.ruleset),
        "Before predefined:".to_owned(),
        util::numbered(&s.before_predefined),
        "After predefined:".to_owned(),
        util::numbered(&s.after_predefined),
    ]
    .join("\n")
}

fn update_lines(updates: &[FirewallRuleIndexUpdate]) -> String {
    updates
        .iter()
        .map(|u| format!("{}={}", u.id, u.rule_index))
        .collect::<Vec<_>>()
        .join("\n")
}

fn plan_detail(p: &RulesetPlan) -> String {
    if p.is_noop() {
        return format!("{}: rules already in the configured order", p.id);
    }
    let rows: Vec<UpdateRow> = p.updates.iter().map(UpdateRow::from).collect();
    format!(
        "{}: {} rule(s) to move\n{}",
        p.id,
        p.updates.len(),
        output::render_table(&rows)
    )
}

fn applied_detail(a: &AppliedRuleset) -> String {
    let summary = if a.updates.is_empty() {
        "No changes: rules already in the configured order".to_owned()
    } else {
        format!("Applied {} index update(s)", a.updates.len())
    };
    format!("{summary}\n{}", state_detail(&a.state))
}

// ── Input ───────────────────────────────────────────────────────────

/// Decode the desired order from `--from-file` or the individual flags.
pub fn desired_config(args: &DesiredArgs) -> Result<FirewallRulesetConfig, CliError> {
    let raw = match args.from_file {
        Some(ref path) => util::read_json_file(path)?,
        None => json!({
            "ruleset": args.ruleset.clone().unwrap_or_default(),
            "before_predefined": args.before,
            "after_predefined": args.after,
        }),
    };
    Ok(FirewallRulesetConfig::decode(raw)?)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: RulesetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        RulesetCommand::Show { id } => {
            // Reject malformed identifiers before touching the network.
            let id: RulesetId = id.parse()?;
            let provider = util::provider(global)?;
            let result = provider.firewall_rulesets().import(&id.to_string()).await;
            provider.close().await;
            let state = result?;

            let out = output::render_single(global.output, &state, state_detail, |s| {
                s.before_predefined
                    .iter()
                    .chain(&s.after_predefined)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RulesetCommand::Plan(desired) => {
            let config = desired_config(&desired)?;
            let provider = util::provider(global)?;
            let result = provider.firewall_rulesets().plan(&config).await;
            provider.close().await;
            let plan = result?;

            let out = output::render_single(global.output, &plan, plan_detail, |p| {
                update_lines(&p.updates)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RulesetCommand::Apply(desired) => {
            let config = desired_config(&desired)?;
            let provider = util::provider(global)?;
            let result = apply(&provider, &config).await;
            provider.close().await;
            let applied = result?;

            let out = output::render_single(global.output, &applied, applied_detail, |a| {
                update_lines(&a.updates)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

async fn apply(
    provider: &ProviderClient,
    config: &FirewallRulesetConfig,
) -> Result<AppliedRuleset, CliError> {
    match provider.firewall_rulesets().create(config).await {
        Ok(applied) => {
            info!(id = %applied.state.id, updates = applied.updates.len(), "ruleset applied");
            Ok(applied)
        }
        Err(err) => {
            if let Some(ref refreshed) = err.refreshed {
                warn!(
                    id = %refreshed.id,
                    before = ?refreshed.before_predefined,
                    after = ?refreshed.after_predefined,
                    "order on the controller after the failed apply"
                );
            }
            Err(err.into_inner().into())
        }
    }
}
