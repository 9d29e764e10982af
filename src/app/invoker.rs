//! One blocking call to the remote engine, classified into a document or a fault.

use crate::app::error::Fault;
use crate::app::parser::ResultDocument;
use crate::connection::{Credentials, RequestTimeout, SendError, SendMessage};
use crate::time::minutes_and_seconds;
use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::Request as HttpRequest;
use http::Response as HttpResponse;
use regex::Regex;
use std::time::Duration;
use sxd_xpath::Value;

pub const RUN_PATH: &str = "run";
pub const ENDPOINT_PARAMETER: &str = "wfs";
const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

lazy_static! {
    static ref BODY_REGEX: Regex = Regex::new(r"(?is)<body\b[^>]*>(.*)</body>").expect("Regex compilation error");
    static ref PARAGRAPH_START_REGEX: Regex = Regex::new(r"(?i)<p\b[^>]*>").expect("Regex compilation error");
    static ref PARAGRAPH_END_REGEX: Regex = Regex::new(r"(?i)</p\s*>|<p\b|</body\b").expect("Regex compilation error");
    static ref TAG_REGEX: Regex = Regex::new(r"(?s)<[^>]*>").expect("Regex compilation error");
    static ref SPACE_REGEX: Regex = Regex::new(r"\s+").expect("Regex compilation error");
}

pub struct Invoker<'a, T> {
    sender: &'a T,
    credentials: Option<Credentials>,
    timeout: Duration,
}

impl<'a, T> Invoker<'a, T>
where
    T: SendMessage<HttpRequest<Vec<u8>>, Result<HttpResponse<Bytes>, SendError>>,
{
    pub fn new(sender: &'a T, credentials: Option<Credentials>, timeout: Duration) -> Self {
        Self {
            sender,
            credentials,
            timeout,
        }
    }

    /// Runs the suite at `suite_resource` against `endpoint` and parses the report.
    pub fn invoke(&self, suite_resource: &str, endpoint: &str) -> Result<ResultDocument, Fault> {
        let uri = run_uri(suite_resource, endpoint);
        info!("Invoking TEAM Engine remotely. This may take a while. Progress messages are not supported.");
        info!("Timeout is set to: {}", minutes_and_seconds(self.timeout));
        debug!("Calling {}", uri);

        let request = self.request("GET", &uri, self.timeout, "application/xml")?;
        match self.sender.send(request) {
            Ok(response) if response.status().is_success() => {
                info!("Results received.");
                let body = String::from_utf8(response.into_body().to_vec())
                    .map_err(|e| Fault::MalformedResponse(e.to_string()))?;
                ResultDocument::parse(body)
            }
            Ok(response) => {
                info!("OGC TEAM Engine returned an error.");
                Err(server_error(response))
            }
            Err(SendError::Timeout) => Err(self.timed_out(suite_resource)),
            Err(SendError::Connection(reason)) => {
                error!("Failed to send request {}", reason);
                Err(Fault::ServerError {
                    code: None,
                    message: reason,
                    body: None,
                })
            }
        }
    }

    /// Tells apart an unreachable engine from a slow one, without running anything.
    pub fn probe(&self, suite_resource: &str) -> bool {
        let request = match self.request("HEAD", suite_resource, PROBE_TIMEOUT, "*/*") {
            Ok(request) => request,
            Err(_) => return false,
        };
        match self.sender.send(request) {
            Ok(response) => response.status().is_success() || response.status().is_redirection(),
            Err(e) => {
                debug!("Availability probe failed: {}", e);
                false
            }
        }
    }

    fn timed_out(&self, suite_resource: &str) -> Fault {
        let timeout = minutes_and_seconds(self.timeout);
        info!("The OGC TEAM Engine is taking too long to respond.");
        info!("Checking availability...");
        let availability = if self.probe(suite_resource) {
            info!("...[OK]. The OGC TEAM Engine is available. You may need to ask the system administrator to increase the OGC TEAM Engine test driver timeout.");
            "The OGC TEAM Engine is available, the timeout may need to be increased."
        } else {
            info!("...[FAILED]. The OGC TEAM Engine is not available. Try re-running the test after a few minutes.");
            "The OGC TEAM Engine is not available, try re-running the test after a few minutes."
        };
        Fault::Timeout {
            timeout: self.timeout,
            message: format!(
                "OGC TEAM Engine is taking too long to respond. Timeout after {}. {}",
                timeout, availability
            ),
        }
    }

    fn request(
        &self,
        method: &str,
        uri: &str,
        timeout: Duration,
        accept: &str,
    ) -> Result<HttpRequest<Vec<u8>>, Fault> {
        let mut builder = HttpRequest::builder()
            .method(method)
            .uri(uri)
            .header(ACCEPT, accept);
        if let Some(credentials) = &self.credentials {
            builder = builder.header(AUTHORIZATION, credentials.authorization());
        }
        let mut request = builder.body(Vec::new()).map_err(|e| Fault::ServerError {
            code: None,
            message: format!("Cannot create request for '{}': {}", uri, e),
            body: None,
        })?;
        request.extensions_mut().insert(RequestTimeout(timeout));
        Ok(request)
    }
}

/// `{suite_resource}run?wfs={endpoint}`.
///
/// The endpoint's own `&` separators are escaped so the remote side does
/// not split its query string.
pub fn run_uri(suite_resource: &str, endpoint: &str) -> String {
    let separator = if suite_resource.ends_with('/') { "" } else { "/" };
    format!(
        "{}{}{}?{}={}",
        suite_resource,
        separator,
        RUN_PATH,
        ENDPOINT_PARAMETER,
        escape_query_value(endpoint)
    )
}

fn escape_query_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.trim().chars() {
        match c {
            '&' => escaped.push_str("%26"),
            ' ' => escaped.push_str("%20"),
            '#' => escaped.push_str("%23"),
            '+' => escaped.push_str("%2B"),
            '"' => escaped.push_str("%22"),
            '<' => escaped.push_str("%3C"),
            '>' => escaped.push_str("%3E"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn server_error(response: HttpResponse<Bytes>) -> Fault {
    let code = response.status().as_u16();
    let html = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |value| value.contains("html"));
    let body = String::from_utf8_lossy(response.body()).into_owned();
    let looks_like_html = html || body.to_ascii_lowercase().contains("<html");
    if body.trim().is_empty() || !looks_like_html {
        error!("Response message: {}", code);
        return Fault::ServerError {
            code: Some(code),
            message: String::new(),
            body: None,
        };
    }
    let message = paragraphs(&body).join("\n");
    if !message.is_empty() {
        error!("Error message: {}", message);
    }
    Fault::ServerError {
        code: Some(code),
        message,
        body: Some(body),
    }
}

/// Human readable text of the paragraphs in an HTML error page.
pub fn paragraphs(html: &str) -> Vec<String> {
    match xhtml_paragraphs(html) {
        Some(found) if !found.is_empty() => found,
        _ => tag_soup_paragraphs(html),
    }
}

fn xhtml_paragraphs(html: &str) -> Option<Vec<String>> {
    let package = sxd_document::parser::parse(html).ok()?;
    let document = package.as_document();
    let selected = sxd_xpath::evaluate_xpath(
        &document,
        "//*[translate(local-name(), 'BODY', 'body')='body']//*[translate(local-name(), 'P', 'p')='p']",
    )
    .ok()?;
    match selected {
        Value::Nodeset(nodes) => Some(
            nodes
                .document_order()
                .iter()
                .map(|node| normalize(&node.string_value()))
                .filter(|text| !text.is_empty())
                .collect(),
        ),
        _ => None,
    }
}

/// Paragraphs of markup that is not well-formed. An unclosed paragraph ends
/// at the next paragraph, the end of the body or the end of the input.
fn tag_soup_paragraphs(html: &str) -> Vec<String> {
    let body = BODY_REGEX
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map_or(html, |body| body.as_str());
    PARAGRAPH_START_REGEX
        .find_iter(body)
        .map(|start| {
            let rest = &body[start.end()..];
            let end = PARAGRAPH_END_REGEX
                .find(rest)
                .map_or(rest.len(), |end| end.start());
            &rest[..end]
        })
        .map(|inner| normalize(&decode_entities(&TAG_REGEX.replace_all(inner, ""))))
        .filter(|text| !text.is_empty())
        .collect()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn normalize(text: &str) -> String {
    SPACE_REGEX.replace_all(text.trim(), " ").into_owned()
}
