//! Command dispatch: bridges CLI args -> core resource operations -> output.

pub mod ruleset;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Ruleset(args) => ruleset::handle(args, global).await,
        // Completions are handled before dispatch
        Command::Completions(_) => unreachable!(),
    }
}
