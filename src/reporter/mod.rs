//! The push interface through which a transformed result is reported.
//!
//! Calls must nest exactly like the result hierarchy: every `start_*` is
//! closed by an `end` for the same identity before its parent is closed.
//! Messages and attachments belong to the innermost open item.

pub mod collector;
pub mod model;
#[cfg(test)]
pub mod recorder;
pub mod serialize;
pub mod templates;

use self::model::{Attachment, Outcome, Severity};
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub trait ResultCollector {
    fn start_task(&mut self, id: &Uuid, started: DateTime<Utc>);
    fn start_module(&mut self, id: &Uuid, started: DateTime<Utc>);
    fn start_case(&mut self, id: &Uuid, started: Option<DateTime<Utc>>);
    fn start_step(&mut self, id: &Uuid, started: DateTime<Utc>);
    fn add_message(&mut self, template: &str, severity: Severity, text: &str);
    fn save_attachment(&mut self, attachment: Attachment);
    /// Closes the innermost open item. Containers are usually closed without
    /// an outcome, leaving aggregation to whoever consumes the result.
    fn end(&mut self, id: &Uuid, outcome: Option<Outcome>, ended: Option<DateTime<Utc>>);
    /// Replaces the whole hierarchy of a task that could not be transformed.
    fn internal_error(&mut self, message: &str, diagnostic: Attachment);
}
