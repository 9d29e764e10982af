use chrono::{DateTime, Utc};
use mime::Mime;
use serde_derive::Serialize;
use std::fmt;

/// Classified outcome of a reported item.
///
/// The discriminants are the outcome codes used by downstream reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Pass = 0,
    Fail = 1,
    Skipped = 2,
    NotApplicable = 3,
    Undefined = 6,
}

impl Outcome {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Skipped and not-applicable outcomes share the config-step dedup rule.
    pub fn is_skip_like(self) -> bool {
        matches!(self, Outcome::Skipped | Outcome::NotApplicable)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Outcome::Pass => "PASSED",
            Outcome::Fail => "FAILED",
            Outcome::Skipped => "SKIPPED",
            Outcome::NotApplicable => "NOT_APPLICABLE",
            Outcome::Undefined => "UNDEFINED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    Bytes(Vec<u8>),
}

impl Content {
    pub fn len(&self) -> usize {
        match self {
            Content::Text(text) => text.len(),
            Content::Bytes(bytes) => bytes.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentKind {
    ServiceResponse,
    PostData,
    GetParameter,
    JunitXml,
    InternalError,
    /// Unrecognised attribute names are passed through as the tag.
    Other(String),
}

impl AttachmentKind {
    pub fn tag(&self) -> &str {
        match self {
            AttachmentKind::ServiceResponse => "ServiceResponse",
            AttachmentKind::PostData => "PostData",
            AttachmentKind::GetParameter => "GetParameter",
            AttachmentKind::JunitXml => "JunitXml",
            AttachmentKind::InternalError => "InternalError",
            AttachmentKind::Other(tag) => tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    label: String,
    #[serde(with = "crate::reporter::serialize::kind")]
    kind: AttachmentKind,
    #[serde(with = "crate::reporter::serialize::mime_type")]
    mime_type: Option<Mime>,
    #[serde(with = "crate::reporter::serialize::content")]
    content: Content,
}

impl Attachment {
    pub fn new(content: Content, label: &str, mime_type: Option<Mime>, kind: AttachmentKind) -> Self {
        Self {
            label: label.to_owned(),
            kind,
            mime_type,
            content,
        }
    }

    pub fn text(text: String, label: &str, mime_type: Option<Mime>, kind: AttachmentKind) -> Self {
        Self::new(Content::Text(text), label, mime_type, kind)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &AttachmentKind {
        &self.kind
    }

    pub fn mime_type(&self) -> Option<&Mime> {
        self.mime_type.as_ref()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }
}

/// One reported item of the result hierarchy, as assembled by a collector.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResult {
    pub id: uuid::Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ItemResult>,
}

impl ItemResult {
    pub fn new(id: uuid::Uuid, started: Option<DateTime<Utc>>) -> Self {
        Self {
            id,
            started,
            ended: None,
            outcome: None,
            messages: Vec::new(),
            attachments: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// The complete outcome of one test task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    #[serde(flatten)]
    pub item: ItemResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_error: Option<String>,
}
