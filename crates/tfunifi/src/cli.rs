//! Clap derive structures for the `tfunifi` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tfunifi -- declarative firewall rule ordering for UniFi controllers
#[derive(Debug, Parser)]
#[command(
    name = "tfunifi",
    version,
    about = "Keep UniFi firewall rules in a declared order",
    long_about = "Reads, plans and applies the order of firewall rules within one\n\
        ruleset of a UniFi controller site. Rules are placed either before or\n\
        after the controller's predefined rules.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Controller URL (overrides api_url / UNIFI_API_URL)
    #[arg(long, short = 'c', global = true, value_name = "URL")]
    pub controller: Option<String>,

    /// Default site for rulesets that do not name one
    #[arg(long, short = 's', global = true)]
    pub site: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect and reorder firewall rulesets
    #[command(alias = "rs")]
    Ruleset(RulesetArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct RulesetArgs {
    #[command(subcommand)]
    pub command: RulesetCommand,
}

#[derive(Debug, Subcommand)]
pub enum RulesetCommand {
    /// Show the current order of a ruleset
    #[command(alias = "import")]
    Show {
        /// Ruleset identifier, e.g. default:LAN_IN
        #[arg(value_name = "SITE:RULESET")]
        id: String,
    },

    /// Show the index updates needed to reach the desired order
    Plan(DesiredArgs),

    /// Reorder the controller's rules to the desired order
    Apply(DesiredArgs),
}

/// The desired order, from flags or a JSON file.
#[derive(Debug, Args)]
pub struct DesiredArgs {
    /// Ruleset name, any case (e.g. lan_in, WANv6_LOCAL)
    #[arg(long, short = 'r', required_unless_present = "from_file")]
    pub ruleset: Option<String>,

    /// Rule IDs to run before the predefined rules, in order
    #[arg(long, value_delimiter = ',', value_name = "ID,...")]
    pub before: Vec<String>,

    /// Rule IDs to run after the predefined rules, in order
    #[arg(long, value_delimiter = ',', value_name = "ID,...")]
    pub after: Vec<String>,

    /// JSON object with ruleset, before_predefined, after_predefined and
    /// optionally site
    #[arg(long, short = 'f', conflicts_with_all = ["ruleset", "before", "after"])]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn before_and_after_split_on_commas() {
        let cli = Cli::parse_from([
            "tfunifi", "ruleset", "plan", "--ruleset", "lan_in", "--before", "a,b", "--after", "c",
        ]);
        let Command::Ruleset(RulesetArgs {
            command: RulesetCommand::Plan(args),
        }) = cli.command
        else {
            panic!("expected ruleset plan");
        };
        assert_eq!(args.ruleset.as_deref(), Some("lan_in"));
        assert_eq!(args.before, ["a", "b"]);
        assert_eq!(args.after, ["c"]);
    }

    #[test]
    fn from_file_conflicts_with_flags() {
        let res = Cli::try_parse_from([
            "tfunifi", "ruleset", "apply", "--from-file", "x.json", "--ruleset", "LAN_IN",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn import_is_an_alias_for_show() {
        let cli = Cli::parse_from(["tfunifi", "-s", "branch", "ruleset", "import", "default:LAN_IN"]);
        assert_eq!(cli.global.site.as_deref(), Some("branch"));
        assert!(matches!(
            cli.command,
            Command::Ruleset(RulesetArgs {
                command: RulesetCommand::Show { .. }
            })
        ));
    }
}
