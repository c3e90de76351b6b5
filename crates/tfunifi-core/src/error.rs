// ── Core error types ──
//
// Errors raised by the reconciler and the resource layer. Controller and
// transport failures are carried through untouched in `CoreError::Api` so
// the caller sees exactly what the controller reported.

use thiserror::Error;

use crate::model::Ruleset;
use crate::reconcile::DriftReport;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Reconciliation errors ────────────────────────────────────────
    /// The configured rule IDs are not exactly the rules on the controller.
    #[error(
        "firewall rules in ruleset {ruleset} for site {site} do not match the configured order ({report})"
    )]
    RulesetDrift {
        site: String,
        ruleset: Ruleset,
        report: DriftReport,
    },

    /// A configured rule ID vanished between validation and reindexing.
    #[error("firewall rule {rule_id} not found in ruleset {ruleset} (state out of date?)")]
    RuleNotInSnapshot { rule_id: String, ruleset: Ruleset },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("invalid import ID '{id}': {reason} (expected <site>:<ruleset>)")]
    InvalidImportId { id: String, reason: String },

    // ── API errors (passed through) ──────────────────────────────────
    #[error(transparent)]
    Api(#[from] tfunifi_api::Error),
}

impl CoreError {
    /// Returns `true` for errors that re-running the same configuration
    /// cannot fix: the configuration itself has to change.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::RulesetDrift { .. } | Self::ValidationFailed { .. } | Self::InvalidImportId { .. }
        )
    }
}
