use crate::reporter::model::{Attachment, ItemResult, Outcome, Severity, TaskResult};
use crate::reporter::templates::{TemplateBundle, ENGLISH};
use crate::reporter::ResultCollector;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Assembles the reported calls into a [`TaskResult`] tree.
///
/// Nesting violations are programming errors and panic.
#[derive(Debug)]
pub struct TreeCollector {
    templates: TemplateBundle,
    language: String,
    task_id: Uuid,
    open: Vec<ItemResult>,
    finished: Option<TaskResult>,
    pending: Vec<Attachment>,
}

impl TreeCollector {
    pub fn new(task_id: Uuid, templates: TemplateBundle) -> Self {
        Self {
            templates,
            language: ENGLISH.to_owned(),
            task_id,
            open: Vec::new(),
            finished: None,
            pending: Vec::new(),
        }
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_owned();
        self
    }

    /// The finished task, or `None` when the task was never closed.
    pub fn into_result(self) -> Option<TaskResult> {
        self.finished
    }

    fn push(&mut self, id: &Uuid, started: Option<DateTime<Utc>>) {
        assert!(
            self.finished.is_none(),
            "item {} started after the task was closed",
            id
        );
        let mut item = ItemResult::new(*id, started);
        if self.open.is_empty() {
            item.attachments.append(&mut self.pending);
        }
        self.open.push(item);
    }

    fn innermost(&mut self) -> &mut ItemResult {
        match self.open.last_mut() {
            Some(item) => item,
            None => panic!("no open item to report into"),
        }
    }
}

impl ResultCollector for TreeCollector {
    fn start_task(&mut self, id: &Uuid, started: DateTime<Utc>) {
        assert!(self.open.is_empty(), "task {} started twice", id);
        self.push(id, Some(started));
    }

    fn start_module(&mut self, id: &Uuid, started: DateTime<Utc>) {
        assert_eq!(self.open.len(), 1, "module {} outside of a task", id);
        self.push(id, Some(started));
    }

    fn start_case(&mut self, id: &Uuid, started: Option<DateTime<Utc>>) {
        assert_eq!(self.open.len(), 2, "case {} outside of a module", id);
        self.push(id, started);
    }

    fn start_step(&mut self, id: &Uuid, started: DateTime<Utc>) {
        assert_eq!(self.open.len(), 3, "step {} outside of a case", id);
        self.push(id, Some(started));
    }

    fn add_message(&mut self, template: &str, severity: Severity, text: &str) {
        let rendered = self.templates.render(template, &self.language, text);
        trace!("{} message: {}", severity.as_str(), rendered);
        self.innermost().messages.push(rendered);
    }

    fn save_attachment(&mut self, attachment: Attachment) {
        debug!(
            "Saving attachment '{}' ({}, {} bytes)",
            attachment.label(),
            attachment.kind().tag(),
            attachment.content().len()
        );
        match self.open.last_mut() {
            Some(item) => item.attachments.push(attachment),
            None => self.pending.push(attachment),
        }
    }

    fn end(&mut self, id: &Uuid, outcome: Option<Outcome>, ended: Option<DateTime<Utc>>) {
        let mut item = match self.open.pop() {
            Some(item) => item,
            None => panic!("end of {} without an open item", id),
        };
        assert_eq!(&item.id, id, "end does not match the innermost open item");
        item.outcome = outcome;
        item.ended = ended;
        match self.open.last_mut() {
            Some(parent) => parent.children.push(item),
            None => {
                self.finished = Some(TaskResult {
                    item,
                    internal_error: None,
                })
            }
        }
    }

    fn internal_error(&mut self, message: &str, diagnostic: Attachment) {
        let started = self.open.first().and_then(|task| task.started);
        let mut item = ItemResult::new(self.task_id, started);
        item.attachments.append(&mut self.pending);
        item.attachments.push(diagnostic);
        item.ended = Some(Utc::now());
        item.outcome = Some(Outcome::Undefined);
        self.open.clear();
        self.finished = Some(TaskResult {
            item,
            internal_error: Some(message.to_owned()),
        });
    }
}
