//! Replays a parsed result tree through the reporting protocol.

use crate::app::dialect::Dialect;
use crate::app::parser::{CaseNode, ResultTree, StepNode};
use crate::reporter::model::{Attachment, AttachmentKind, Outcome, Severity};
use crate::reporter::templates::TEAM_ENGINE_ERROR;
use crate::reporter::ResultCollector;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const RESULT_ATTACHMENT_LABEL: &str = "TEAM Engine result";

/// Reports `tree` as the outcome of task `task_id`.
///
/// `raw_report`, when given, is saved as an attachment of the task.
pub fn emit(
    tree: &ResultTree,
    task_id: &Uuid,
    raw_report: Option<&str>,
    dialect: &Dialect,
    collector: &mut dyn ResultCollector,
) {
    collector.start_task(task_id, tree.suite.started);
    if let Some(raw) = raw_report {
        collector.save_attachment(Attachment::text(
            raw.to_owned(),
            RESULT_ATTACHMENT_LABEL,
            Some(mime::TEXT_XML),
            AttachmentKind::JunitXml,
        ));
    }
    for module in &tree.suite.modules {
        collector.start_module(&module.id, module.started);
        for case in &module.cases {
            emit_case(case, dialect, collector);
        }
        collector.end(&module.id, None, Some(module.ended));
    }
    collector.end(task_id, None, Some(tree.suite.ended));
}

fn emit_case(case: &CaseNode, dialect: &Dialect, collector: &mut dyn ResultCollector) {
    collector.start_case(&case.id, case.started());

    let mut latest_reported: Option<DateTime<Utc>> = None;
    let mut skip_like_reported = false;
    for step in &case.steps {
        if !dialect.reports(step, skip_like_reported) {
            trace!("Suppressing configuration step {}", step.label);
            continue;
        }
        emit_step(step, dialect, collector);
        if step.config && step.outcome.is_skip_like() {
            skip_like_reported = true;
        }
        latest_reported = latest(latest_reported, step.ended);
    }

    match latest_reported {
        Some(ended) => collector.end(&case.id, None, Some(ended)),
        None => {
            // only passed configuration steps
            let ended = case.steps.iter().map(|step| step.ended).max();
            collector.end(&case.id, Some(Outcome::Pass), ended);
        }
    }
}

fn emit_step(step: &StepNode, dialect: &Dialect, collector: &mut dyn ResultCollector) {
    collector.start_step(&step.id, step.started);
    if let Some(message) = step.message(dialect.message_fallback) {
        collector.add_message(TEAM_ENGINE_ERROR, Severity::Error, &message);
    }
    for attachment in &step.attachments {
        collector.save_attachment(attachment.clone());
    }
    collector.end(&step.id, Some(step.outcome), Some(step.ended));
}

fn latest(current: Option<DateTime<Utc>>, candidate: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match current {
        Some(current) if current >= candidate => Some(current),
        _ => Some(candidate),
    }
}
