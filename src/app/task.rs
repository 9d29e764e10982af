use crate::app::dialect::Dialect;
use crate::app::error::{Error, Fault};
use crate::app::identity::IdentityScope;
use crate::app::invoker::Invoker;
use crate::app::parser::{parse, ResultTree};
use crate::app::report::emit;
use crate::app::sync::synchronize;
use crate::connection::SendMessage;
use crate::reporter::model::{Attachment, AttachmentKind, Content};
use crate::reporter::ResultCollector;
use crate::store::model::SuiteDefinition;
use crate::store::SuiteStore;
use bytes::Bytes;
use http::Request as HttpRequest;
use http::Response as HttpResponse;
use uuid::Uuid;

use crate::connection::SendError;

const DIAGNOSTIC_LABEL: &str = "Error";

/// One execution of a suite against one test object.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct TestTask {
    pub id: Uuid,
    pub suite: SuiteDefinition,
    /// Service endpoint of the test object.
    pub endpoint: String,
}

impl TestTask {
    pub fn builder() -> TestTaskBuilder {
        TestTaskBuilder::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskProgress {
    completed: u8,
}

impl TaskProgress {
    pub const STEPS: u8 = 3;

    fn step_completed(&mut self) {
        self.completed = (self.completed + 1).min(Self::STEPS);
        debug!("Progress {}/{}", self.completed, Self::STEPS);
    }

    pub fn completed(&self) -> u8 {
        self.completed
    }

    pub fn is_done(&self) -> bool {
        self.completed == Self::STEPS
    }
}

pub struct TaskRunner<'a, T> {
    invoker: Invoker<'a, T>,
    dialect: Dialect,
    progress: TaskProgress,
}

impl<'a, T> TaskRunner<'a, T>
where
    T: SendMessage<HttpRequest<Vec<u8>>, Result<HttpResponse<Bytes>, SendError>>,
{
    pub fn new(invoker: Invoker<'a, T>, dialect: Dialect) -> Self {
        Self {
            invoker,
            dialect,
            progress: TaskProgress::default(),
        }
    }

    pub fn progress(&self) -> TaskProgress {
        self.progress
    }

    /// Invokes the remote suite, learns its structure and reports the result.
    ///
    /// Any failure is reported once as an internal error of the task and
    /// returned; nothing of the hierarchy is reported in that case.
    pub fn run(
        &mut self,
        task: &TestTask,
        store: &mut dyn SuiteStore,
        collector: &mut dyn ResultCollector,
    ) -> Result<ResultTree, Error> {
        self.progress.step_completed();
        let document = match self.invoker.invoke(&task.suite.remote_resource, &task.endpoint) {
            Ok(document) => document,
            Err(fault) => {
                let (message, diagnostic) = fault_report(&fault);
                collector.internal_error(&message, diagnostic);
                return Err(fault.into());
            }
        };
        self.progress.step_completed();

        info!("Transforming results.");
        let scope = IdentityScope::new(task.suite.scope_prefix());
        let tree = match parse(&document, &scope, &self.dialect.classification) {
            Ok(tree) => tree,
            Err(err) => {
                let message = format!("Cannot transform OGC TEAM Engine result: {}", err);
                error!("{}", message);
                collector.internal_error(&message, diagnostic_text(&message));
                return Err(err.into());
            }
        };
        info!(
            "{} of {} assertions passed",
            tree.passed,
            tree.passed + tree.failed
        );

        if let Err(err) = synchronize(store, task.suite.clone(), &tree) {
            let message = format!("Cannot update the suite model: {}", err);
            error!("{}", message);
            collector.internal_error(&message, diagnostic_text(&message));
            return Err(err.into());
        }

        emit(&tree, &task.id, Some(document.raw()), &self.dialect, collector);
        self.progress.step_completed();
        Ok(tree)
    }
}

/// Text and diagnostic attachment reported for a fault.
pub fn fault_report(fault: &Fault) -> (String, Attachment) {
    match fault {
        Fault::ServerError {
            code,
            message,
            body: Some(body),
        } if !message.is_empty() => {
            let code = code.map_or_else(|| "none".to_owned(), |code| code.to_string());
            (
                format!(
                    "OGC TEAM Engine returned HTTP status code: {}. Message: {}",
                    code, message
                ),
                Attachment::new(
                    Content::Bytes(body.as_bytes().to_vec()),
                    DIAGNOSTIC_LABEL,
                    Some(mime::TEXT_HTML),
                    AttachmentKind::InternalError,
                ),
            )
        }
        Fault::ServerError {
            code: Some(code), ..
        } => {
            let message = format!("OGC TEAM Engine returned an error: {}", code);
            let diagnostic = diagnostic_text(&message);
            (message, diagnostic)
        }
        Fault::ServerError { message, .. } => {
            let message = format!("OGC TEAM Engine returned an error: {}", message);
            let diagnostic = diagnostic_text(&message);
            (message, diagnostic)
        }
        Fault::Timeout { message, .. } => (message.clone(), diagnostic_text(message)),
        Fault::MalformedResponse(reason) => {
            let message = format!("OGC TEAM Engine returned an unreadable result: {}", reason);
            let diagnostic = diagnostic_text(&message);
            (message, diagnostic)
        }
    }
}

fn diagnostic_text(message: &str) -> Attachment {
    Attachment::text(
        message.to_owned(),
        DIAGNOSTIC_LABEL,
        Some(mime::TEXT_PLAIN),
        AttachmentKind::InternalError,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::parser::tests::REPORT;
    use crate::reporter::collector::TreeCollector;
    use crate::reporter::model::Outcome;
    use crate::reporter::recorder::{Event, EventRecorder};
    use crate::reporter::templates::TemplateBundle;
    use crate::store::memory::MemorySuiteStore;
    use http::header::CONTENT_TYPE;
    use std::cell::RefCell;
    use std::time::Duration;

    struct Replies(RefCell<Vec<Result<HttpResponse<Bytes>, SendError>>>);

    impl SendMessage<HttpRequest<Vec<u8>>, Result<HttpResponse<Bytes>, SendError>> for Replies {
        fn send(&self, _data: HttpRequest<Vec<u8>>) -> Result<HttpResponse<Bytes>, SendError> {
            self.0.borrow_mut().remove(0)
        }
    }

    fn replies(replies: Vec<Result<HttpResponse<Bytes>, SendError>>) -> Replies {
        Replies(RefCell::new(replies))
    }

    fn ok(status: u16, content_type: &str, body: &str) -> Result<HttpResponse<Bytes>, SendError> {
        Ok(HttpResponse::builder()
            .status(status)
            .header(CONTENT_TYPE, content_type)
            .body(Bytes::from(body.to_owned()))
            .unwrap())
    }

    fn task() -> TestTask {
        TestTask::builder()
            .id(Uuid::from_u128(7))
            .suite(
                SuiteDefinition::from_remote_resource(
                    "http://localhost/teamengine/rest/suites/wfs20/1.26/",
                    "WFS 2.0",
                )
                .unwrap(),
            )
            .endpoint("http://example.org/wfs?service=WFS&request=GetCapabilities")
            .build()
            .unwrap()
    }

    fn run_with(
        sender: &Replies,
        timeout: Duration,
        store: &mut MemorySuiteStore,
        collector: &mut dyn ResultCollector,
    ) -> (Result<ResultTree, Error>, TaskProgress) {
        let mut runner = TaskRunner::new(Invoker::new(sender, None, timeout), Dialect::default());
        let result = runner.run(&task(), store, collector);
        (result, runner.progress())
    }

    #[test]
    fn test_successful_task_reports_and_learns_structure() {
        let sender = replies(vec![ok(200, "application/xml", REPORT)]);
        let mut store = MemorySuiteStore::new();
        let mut recorder = EventRecorder::default();

        let (result, progress) = run_with(&sender, Duration::from_secs(1200), &mut store, &mut recorder);

        let tree = result.unwrap();
        assert!(progress.is_done());
        assert_eq!(recorder.events[0], Event::StartTask(task().id, tree.suite.started));
        assert_eq!(recorder.steps_started().len(), 2);
        let stored = store.get_by_id(&task().suite.id).unwrap();
        assert_eq!(stored.step_count(), 3);
        assert_eq!(stored.modules[0].id, tree.suite.modules[0].id);
    }

    #[test]
    fn test_repeated_runs_reconcile_identities() {
        let sender = replies(vec![
            ok(200, "application/xml", REPORT),
            ok(200, "application/xml", REPORT),
        ]);
        let mut store = MemorySuiteStore::new();
        let mut first = EventRecorder::default();
        let mut second = EventRecorder::default();

        run_with(&sender, Duration::from_secs(60), &mut store, &mut first).0.unwrap();
        run_with(&sender, Duration::from_secs(60), &mut store, &mut second).0.unwrap();

        assert_eq!(first.steps_started(), second.steps_started());
        assert_eq!(store.get_by_id(&task().suite.id).unwrap().step_count(), 3);
    }

    #[test]
    fn test_server_error_reports_single_internal_error() {
        let html = "<html><body><p>Error A</p><p>Error B</p></body></html>";
        let sender = replies(vec![ok(500, "text/html", html)]);
        let mut store = MemorySuiteStore::new();
        let mut recorder = EventRecorder::default();

        let (result, progress) = run_with(&sender, Duration::from_secs(10), &mut store, &mut recorder);

        match result {
            Err(Error::Fault(fault)) => assert_eq!(fault.message(), "Error A\nError B"),
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
        assert_eq!(progress.completed(), 1);
        assert_eq!(recorder.events.len(), 1);
        match &recorder.events[0] {
            Event::InternalError(message, diagnostic) => {
                assert_eq!(
                    message,
                    "OGC TEAM Engine returned HTTP status code: 500. Message: Error A\nError B"
                );
                assert_eq!(diagnostic.mime_type(), Some(&mime::TEXT_HTML));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_timeout_reports_single_diagnostic() {
        let sender = replies(vec![Err(SendError::Timeout), ok(200, "text/html", "")]);
        let mut store = MemorySuiteStore::new();
        let mut recorder = EventRecorder::default();

        let (result, _) = run_with(&sender, Duration::from_secs(10), &mut store, &mut recorder);

        match result {
            Err(Error::Fault(Fault::Timeout { message, .. })) => {
                assert!(message.contains("taking too long to respond"));
                assert!(message.contains("10"));
            }
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
        assert_eq!(recorder.attachments().len(), 1);
        assert!(recorder.steps_started().is_empty());
    }

    #[test]
    fn test_structural_error_reports_no_hierarchy() {
        let sender = replies(vec![ok(200, "application/xml", "<testsuite name=\"junit\"/>")]);
        let mut store = MemorySuiteStore::new();
        let mut recorder = EventRecorder::default();

        let (result, _) = run_with(&sender, Duration::from_secs(10), &mut store, &mut recorder);

        assert!(matches!(result, Err(Error::Parse(_))));
        assert_eq!(recorder.events.len(), 1);
        assert!(matches!(recorder.events[0], Event::InternalError(..)));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_tree_collector_receives_full_result() {
        let sender = replies(vec![ok(200, "application/xml", REPORT)]);
        let mut store = MemorySuiteStore::new();
        let mut collector = TreeCollector::new(task().id, TemplateBundle::team_engine().unwrap());

        run_with(&sender, Duration::from_secs(10), &mut store, &mut collector).0.unwrap();

        let result = collector.into_result().unwrap();
        let case = &result.item.children[0].children[0];
        assert_eq!(case.children.len(), 2);
        assert_eq!(case.children[1].outcome, Some(Outcome::Fail));
        assert_eq!(
            case.children[1].messages,
            vec!["OGC TEAM Engine reported a failed test: Expected 3 features".to_owned()]
        );
        assert_eq!(result.item.attachments.len(), 1);
    }

    #[test]
    fn test_fault_report_texts() {
        let (message, diagnostic) = fault_report(&Fault::ServerError {
            code: Some(404),
            message: String::new(),
            body: None,
        });
        assert_eq!(message, "OGC TEAM Engine returned an error: 404");
        assert_eq!(diagnostic.mime_type(), Some(&mime::TEXT_PLAIN));

        let (message, _) = fault_report(&Fault::MalformedResponse("eof".to_owned()));
        assert!(message.ends_with("eof"));
    }
}
