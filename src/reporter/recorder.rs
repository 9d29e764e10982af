use crate::reporter::model::{Attachment, Outcome, Severity};
use crate::reporter::ResultCollector;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StartTask(Uuid, DateTime<Utc>),
    StartModule(Uuid, DateTime<Utc>),
    StartCase(Uuid, Option<DateTime<Utc>>),
    StartStep(Uuid, DateTime<Utc>),
    Message(String, Severity, String),
    Attachment(Attachment),
    End(Uuid, Option<Outcome>, Option<DateTime<Utc>>),
    InternalError(String, Attachment),
}

/// Keeps every protocol call in order.
#[derive(Debug, Default)]
pub struct EventRecorder {
    pub events: Vec<Event>,
}

impl EventRecorder {
    pub fn steps_started(&self) -> Vec<Uuid> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::StartStep(id, _) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn ends(&self) -> Vec<(Uuid, Option<Outcome>, Option<DateTime<Utc>>)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::End(id, outcome, ended) => Some((*id, *outcome, *ended)),
                _ => None,
            })
            .collect()
    }

    pub fn attachments(&self) -> Vec<&Attachment> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Attachment(attachment) => Some(attachment),
                Event::InternalError(_, attachment) => Some(attachment),
                _ => None,
            })
            .collect()
    }
}

impl ResultCollector for EventRecorder {
    fn start_task(&mut self, id: &Uuid, started: DateTime<Utc>) {
        self.events.push(Event::StartTask(*id, started));
    }

    fn start_module(&mut self, id: &Uuid, started: DateTime<Utc>) {
        self.events.push(Event::StartModule(*id, started));
    }

    fn start_case(&mut self, id: &Uuid, started: Option<DateTime<Utc>>) {
        self.events.push(Event::StartCase(*id, started));
    }

    fn start_step(&mut self, id: &Uuid, started: DateTime<Utc>) {
        self.events.push(Event::StartStep(*id, started));
    }

    fn add_message(&mut self, template: &str, severity: Severity, text: &str) {
        self.events
            .push(Event::Message(template.to_owned(), severity, text.to_owned()));
    }

    fn save_attachment(&mut self, attachment: Attachment) {
        self.events.push(Event::Attachment(attachment));
    }

    fn end(&mut self, id: &Uuid, outcome: Option<Outcome>, ended: Option<DateTime<Utc>>) {
        self.events.push(Event::End(*id, outcome, ended));
    }

    fn internal_error(&mut self, message: &str, diagnostic: Attachment) {
        self.events
            .push(Event::InternalError(message.to_owned(), diagnostic));
    }
}
