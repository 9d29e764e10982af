pub(crate) mod dialect;
pub(crate) mod error;
pub(crate) mod identity;
pub(crate) mod invoker;
pub(crate) mod parser;
pub(crate) mod report;
pub(crate) mod status;
pub(crate) mod sync;
pub(crate) mod task;

use crate::app::error::Error;
use crate::app::invoker::Invoker;
use crate::app::task::{TaskRunner, TestTask};
use crate::configuration::manifest::Manifest;
use crate::reporter::collector::TreeCollector;
use crate::reporter::model::TaskResult;
use crate::reporter::templates::TemplateBundle;
use crate::store::file::FileSuiteStore;
use crate::store::model::SuiteDefinition;
use crate::store::SuiteStore;
use reqwest::blocking::Client;
use std::fs::File;
use std::io::Write;
use std::time::{Duration, Instant};
use uuid::Uuid;

pub struct App {
    manifest: Manifest,
    client: Client,
}

impl App {
    pub fn new(manifest: Manifest) -> Result<Self, Error> {
        // Timeouts are set per request.
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| Error::Setup(format!("Cannot create HTTP client: {}", e)))?;
        Ok(App { manifest, client })
    }

    pub fn run(&self) -> Result<(), Error> {
        let mut store = FileSuiteStore::new(self.manifest.store.clone());
        let suite = self.load_suite(&store)?;
        info!(
            "Executing '{}' ({}) against {}",
            suite.label,
            suite.version.as_deref().unwrap_or("unversioned"),
            self.manifest.test_object.endpoint
        );

        let task = TestTask::builder()
            .id(Uuid::new_v4())
            .suite(suite)
            .endpoint(self.manifest.test_object.endpoint.as_str())
            .build()
            .map_err(Error::Setup)?;

        let templates = TemplateBundle::team_engine().map_err(Error::Setup)?;
        let mut collector =
            TreeCollector::new(task.id, templates).with_language(&self.manifest.language);
        let invoker = Invoker::new(
            &self.client,
            self.manifest.credentials(),
            self.manifest.remote.timeout,
        );
        let mut runner = TaskRunner::new(invoker, self.manifest.dialect());

        let now = Instant::now();
        let outcome = runner.run(&task, &mut store, &mut collector);
        info!(
            "Task {} finished after {} ms",
            task.id,
            now.elapsed().as_millis()
        );

        // The result is written even when the task failed, it carries the internal error.
        if let Some(result) = collector.into_result() {
            self.write_result(&result)?;
        }
        outcome.map(|_| ())
    }

    /// The stored definition when it belongs to the configured release,
    /// otherwise a fresh one that is learned again from the next report.
    fn load_suite(&self, store: &dyn SuiteStore) -> Result<SuiteDefinition, Error> {
        let configured = self.manifest.suite_definition().map_err(Error::Setup)?;
        if !store.exists(&configured.id) {
            return Ok(configured);
        }
        let stored = store.get_by_id(&configured.id)?;
        if stored.version == configured.version {
            debug!("Using stored suite with {} steps", stored.step_count());
            Ok(stored)
        } else {
            info!(
                "Suite version changed from {:?} to {:?}",
                stored.version, configured.version
            );
            Ok(configured)
        }
    }

    fn write_result(&self, result: &TaskResult) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(result)
            .map_err(|e| Error::Setup(format!("Cannot serialize result: {}", e)))?;
        match &self.manifest.output {
            Some(path) => {
                let mut file = File::create(path).map_err(|e| {
                    Error::Setup(format!("Cannot create {}: {}", path.display(), e))
                })?;
                file.write_all(json.as_bytes()).map_err(|e| {
                    Error::Setup(format!("Cannot write {}: {}", path.display(), e))
                })?;
                info!("Result written to {}", path.display());
            }
            None => println!("{}", json),
        }
        Ok(())
    }
}
