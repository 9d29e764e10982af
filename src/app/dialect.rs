use crate::app::parser::StepNode;
use crate::app::status::ClassificationTable;
use crate::reporter::model::Outcome;
use serde_derive::Deserialize;

/// Which configuration (setup/teardown) steps make it into a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigStepPolicy {
    /// Failed ones, plus only the first skipped or not-applicable one per case.
    FirstNonPassing,
    /// Every configuration step that did not pass.
    AllNonPassing,
}

/// Variations between report flavours of the remote engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Dialect {
    pub classification: ClassificationTable,
    pub config_steps: ConfigStepPolicy,
    /// Name the exception class when an exception carries no message.
    pub message_fallback: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            classification: ClassificationTable::default(),
            config_steps: ConfigStepPolicy::FirstNonPassing,
            message_fallback: true,
        }
    }
}

impl Dialect {
    /// Decides whether `step` is reported, given whether a skipped or
    /// not-applicable configuration step was already reported in its case.
    pub fn reports(&self, step: &StepNode, skip_like_reported: bool) -> bool {
        if !step.config {
            return true;
        }
        match (self.config_steps, step.outcome) {
            (_, Outcome::Pass) => false,
            (_, Outcome::Fail) => true,
            (ConfigStepPolicy::FirstNonPassing, outcome) if outcome.is_skip_like() => {
                !skip_like_reported
            }
            (ConfigStepPolicy::FirstNonPassing, _) => false,
            (ConfigStepPolicy::AllNonPassing, _) => true,
        }
    }
}
