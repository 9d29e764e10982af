use crate::app::dialect::{ConfigStepPolicy, Dialect};
use crate::configuration::constants::common::{
    DEFAULT_REMOTE_URL, DEFAULT_STORE_DIRECTORY, DEFAULT_TIMEOUT_SECONDS, ENV_PREFIX,
    ENV_SEPARATOR,
};
use crate::configuration::deserialize::base_url;
use crate::connection::Credentials;
use crate::store::model::SuiteDefinition;
use config::{Config, ConfigError, Environment, File};
use derivative::*;
use reqwest::Url;
use serde_derive::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub remote: RemoteEntry,
    pub suite: SuiteEntry,
    pub test_object: TestObjectEntry,
    #[serde(default = "default_store")]
    pub store: PathBuf,
    pub output: Option<PathBuf>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub dialect: DialectEntry,
}

#[derive(Deserialize, Derivative)]
#[derivative(Debug)]
pub struct RemoteEntry {
    #[serde(default = "default_url", deserialize_with = "base_url::deserialize")]
    pub url: String,
    pub username: Option<String>,
    #[derivative(Debug = "ignore")]
    pub password: Option<String>,
    #[serde(
        default = "default_timeout",
        with = "crate::configuration::deserialize::duration"
    )]
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
pub struct SuiteEntry {
    /// Remote resource of the suite, ending with its version segment.
    pub resource: String,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct TestObjectEntry {
    pub endpoint: String,
}

/// How the report flavour of the remote engine is read.
#[derive(Debug, Deserialize)]
pub struct DialectEntry {
    #[serde(default = "default_config_steps")]
    pub config_steps: ConfigStepPolicy,
    #[serde(default = "default_message_fallback")]
    pub message_fallback: bool,
}

fn default_url() -> String {
    base_url::normalize(DEFAULT_REMOTE_URL).unwrap_or_else(|_| DEFAULT_REMOTE_URL.to_owned())
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)
}

fn default_store() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_DIRECTORY)
}

fn default_config_steps() -> ConfigStepPolicy {
    ConfigStepPolicy::FirstNonPassing
}

fn default_message_fallback() -> bool {
    true
}

fn default_language() -> String {
    crate::reporter::templates::ENGLISH.to_owned()
}

impl Default for RemoteEntry {
    fn default() -> Self {
        Self {
            url: default_url(),
            username: None,
            password: None,
            timeout: default_timeout(),
        }
    }
}

impl Default for DialectEntry {
    fn default() -> Self {
        Self {
            config_steps: default_config_steps(),
            message_fallback: default_message_fallback(),
        }
    }
}

impl Manifest {
    pub fn from(file: PathBuf) -> Result<Self, ConfigError> {
        let mut config = Config::new();
        config.merge(File::from(file))?;
        config.merge(Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR))?;

        config.try_into()
    }

    /// Credentials are used only when both name and password are configured.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.remote.username, &self.remote.password) {
            (Some(username), Some(password)) => {
                Some(Credentials::new(username.clone(), password.clone()))
            }
            _ => None,
        }
    }

    /// The suite resource, resolved against the remote base URL when relative.
    pub fn suite_resource(&self) -> Result<String, String> {
        let resource = self.suite.resource.trim();
        Url::parse(&self.remote.url)
            .and_then(|base| base.join(resource))
            .map(String::from)
            .map_err(|e| format!("'{}' is not a suite resource: {}", resource, e))
    }

    pub fn suite_definition(&self) -> Result<SuiteDefinition, String> {
        SuiteDefinition::from_remote_resource(&self.suite_resource()?, &self.suite.label)
    }

    pub fn dialect(&self) -> Dialect {
        Dialect {
            config_steps: self.dialect.config_steps,
            message_fallback: self.dialect.message_fallback,
            ..Dialect::default()
        }
    }
}
