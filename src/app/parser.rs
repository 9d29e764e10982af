//! Reads a TestNG report into an immutable result tree.
//!
//! The report nests `suite` → `test` (module) → `class` (case) →
//! `test-method` (step). Sibling order is kept exactly as in the document.

use crate::app::error::{Fault, ParseError};
use crate::app::identity::IdentityScope;
use crate::app::status::{ClassificationTable, ExceptionInfo, RawStatus};
use crate::reporter::model::{Attachment, AttachmentKind, Outcome};
use crate::time::timestamp::parse_instant;
use chrono::{DateTime, Utc};
use sxd_document::dom::{ChildOfElement, ChildOfRoot, Element};
use sxd_document::Package;
use uuid::Uuid;

pub const REPORT_ROOT: &str = "testng-results";
const SUITE: &str = "suite";
const MODULE: &str = "test";
const CASE: &str = "class";
const STEP: &str = "test-method";
const EXCEPTION: &str = "exception";
const MESSAGE: &str = "message";
const ATTRIBUTES: &str = "attributes";
const ATTRIBUTE: &str = "attribute";

/// The received report, parsed once and read-only afterwards.
pub struct ResultDocument {
    package: Package,
    raw: String,
}

impl ResultDocument {
    pub fn parse(raw: String) -> Result<Self, Fault> {
        let package = sxd_document::parser::parse(&raw)
            .map_err(|e| Fault::MalformedResponse(format!("{:?}", e)))?;
        Ok(Self { package, raw })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    fn root_element(&self) -> Result<Element, ParseError> {
        self.package
            .as_document()
            .root()
            .children()
            .into_iter()
            .find_map(|child| match child {
                ChildOfRoot::Element(element) => Some(element),
                _ => None,
            })
            .ok_or(ParseError::MissingElement(REPORT_ROOT))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultTree {
    pub passed: u64,
    pub failed: u64,
    pub suite: SuiteNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuiteNode {
    pub label: String,
    pub started: DateTime<Utc>,
    pub ended: DateTime<Utc>,
    pub modules: Vec<ModuleNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleNode {
    pub id: Uuid,
    pub label: String,
    pub description: Option<String>,
    pub started: DateTime<Utc>,
    pub ended: DateTime<Utc>,
    pub cases: Vec<CaseNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseNode {
    pub id: Uuid,
    pub label: String,
    pub description: Option<String>,
    pub steps: Vec<StepNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepNode {
    pub id: Uuid,
    pub label: String,
    pub description: Option<String>,
    pub started: DateTime<Utc>,
    pub ended: DateTime<Utc>,
    pub config: bool,
    pub outcome: Outcome,
    pub exception: Option<ExceptionInfo>,
    pub attachments: Vec<Attachment>,
}

impl CaseNode {
    pub fn started(&self) -> Option<DateTime<Utc>> {
        self.steps.first().map(|step| step.started)
    }
}

impl StepNode {
    /// The exception message, or with `fallback` a note naming the
    /// exception class when the exception has no message element.
    /// An empty message element yields nothing.
    pub fn message(&self, fallback: bool) -> Option<String> {
        let exception = self.exception.as_ref()?;
        match (&exception.message, &exception.class) {
            (Some(message), _) if message.is_empty() => None,
            (Some(message), _) => Some(message.clone()),
            (None, Some(class)) if fallback => {
                Some(format!("No message provided. Exception class {}", class))
            }
            _ => None,
        }
    }
}

/// Builds the result tree of `document`, deriving identities in `scope`.
pub fn parse(
    document: &ResultDocument,
    scope: &IdentityScope,
    table: &ClassificationTable,
) -> Result<ResultTree, ParseError> {
    let root = document.root_element()?;
    let root_name = root.name().local_part();
    if root_name != REPORT_ROOT {
        return Err(ParseError::UnexpectedRoot(root_name.to_owned()));
    }
    let passed = count(root, "passed")?;
    let failed = count(root, "failed")?;
    let suite = first_child(root, SUITE).ok_or(ParseError::MissingElement(SUITE))?;
    let suite_name = required(suite, SUITE, "name")?;

    let mut modules = Vec::new();
    for module in children(suite, MODULE) {
        modules.push(parse_module(module, suite_name, scope, table)?);
    }
    Ok(ResultTree {
        passed,
        failed,
        suite: SuiteNode {
            label: suite_name.to_owned(),
            started: instant(suite, SUITE, "started-at")?,
            ended: instant(suite, SUITE, "finished-at")?,
            modules,
        },
    })
}

fn parse_module(
    module: Element,
    suite_name: &str,
    scope: &IdentityScope,
    table: &ClassificationTable,
) -> Result<ModuleNode, ParseError> {
    let name = required(module, MODULE, "name")?;
    let mut cases = Vec::new();
    for case in children(module, CASE) {
        let case_name = required(case, CASE, "name")?;
        let mut steps = Vec::new();
        for step in children(case, STEP) {
            steps.push(parse_step(step, case_name, scope, table)?);
        }
        cases.push(CaseNode {
            id: scope.identity_of(name, case_name),
            label: case_name.to_owned(),
            description: optional(case, "description"),
            steps,
        });
    }
    Ok(ModuleNode {
        id: scope.identity_of(suite_name, name),
        label: name.to_owned(),
        description: optional(module, "description"),
        started: instant(module, MODULE, "started-at")?,
        ended: instant(module, MODULE, "finished-at")?,
        cases,
    })
}

fn parse_step(
    step: Element,
    case_name: &str,
    scope: &IdentityScope,
    table: &ClassificationTable,
) -> Result<StepNode, ParseError> {
    let name = required(step, STEP, "name")?;
    let status = required(step, STEP, "status")?;
    let config = step.attribute_value("is-config") == Some("true");
    let exception = first_child(step, EXCEPTION).map(|exception| ExceptionInfo {
        class: optional(exception, "class"),
        message: first_child(exception, MESSAGE)
            .map(text_content)
            .map(|text| text.trim().to_owned()),
    });
    let outcome = table.classify(&RawStatus {
        status,
        config,
        exception: exception.as_ref(),
    });

    let mut attachments = Vec::new();
    for group in children(step, ATTRIBUTES) {
        for attribute in children(group, ATTRIBUTE) {
            let kind = required(attribute, ATTRIBUTE, "name")?;
            attachments.push(classify_attachment(kind, text_content(attribute)));
        }
    }

    Ok(StepNode {
        id: scope.identity_of(case_name, name),
        label: name.to_owned(),
        description: optional(step, "description"),
        started: instant(step, STEP, "started-at")?,
        ended: instant(step, STEP, "finished-at")?,
        config,
        outcome,
        exception,
        attachments,
    })
}

fn classify_attachment(name: &str, value: String) -> Attachment {
    match name {
        "response" => {
            let mime_type = if is_xml(&value) {
                Some(mime::TEXT_XML)
            } else {
                None
            };
            Attachment::text(value, "Service Response", mime_type, AttachmentKind::ServiceResponse)
        }
        "request" if is_xml(&value) => Attachment::text(
            value,
            "Request Parameter",
            Some(mime::TEXT_XML),
            AttachmentKind::PostData,
        ),
        "request" => Attachment::text(
            value,
            "Request Parameter",
            Some(mime::TEXT_PLAIN),
            AttachmentKind::GetParameter,
        ),
        other => Attachment::text(value, other, None, AttachmentKind::Other(other.to_owned())),
    }
}

pub fn is_xml(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.starts_with('<') && sxd_document::parser::parse(trimmed).is_ok()
}

fn children<'d>(parent: Element<'d>, name: &'static str) -> impl Iterator<Item = Element<'d>> {
    parent
        .children()
        .into_iter()
        .filter_map(|child| match child {
            ChildOfElement::Element(element) => Some(element),
            _ => None,
        })
        .filter(move |element| element.name().local_part() == name)
}

fn first_child<'d>(parent: Element<'d>, name: &'static str) -> Option<Element<'d>> {
    children(parent, name).next()
}

fn text_content(element: Element) -> String {
    let mut text = String::new();
    for child in element.children() {
        match child {
            ChildOfElement::Text(node) => text.push_str(node.text()),
            ChildOfElement::Element(nested) => text.push_str(&text_content(nested)),
            _ => {}
        }
    }
    text
}

fn required<'d>(
    element: Element<'d>,
    name: &'static str,
    attribute: &'static str,
) -> Result<&'d str, ParseError> {
    element
        .attribute_value(attribute)
        .ok_or(ParseError::MissingAttribute {
            element: name,
            attribute,
        })
}

fn optional(element: Element, attribute: &str) -> Option<String> {
    element.attribute_value(attribute).map(str::to_owned)
}

fn instant(
    element: Element,
    name: &'static str,
    attribute: &'static str,
) -> Result<DateTime<Utc>, ParseError> {
    Ok(parse_instant(required(element, name, attribute)?)?)
}

fn count(root: Element, attribute: &'static str) -> Result<u64, ParseError> {
    match root.attribute_value(attribute) {
        None => Ok(0),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidAttribute {
                element: REPORT_ROOT,
                attribute,
                value: value.to_owned(),
            }),
    }
}
