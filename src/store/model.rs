use crate::app::identity::name_uuid;
use serde_derive::{Deserialize, Serialize};
use uuid::Uuid;

pub const TEAM_ENGINE_TAG: &str = "OGC Test Suites (remote execution)";
pub const REMOTE_EDITOR: &str = "Open Geospatial Consortium";
/// Statement recorded for steps whose logic only exists on the remote side.
pub const REMOTE_STATEMENT: &str = "NOT_APPLICABLE";

lazy_static! {
    /// Item type of every step discovered from a TestNG report.
    pub static ref TESTNG_STEP_TYPE: Uuid =
        Uuid::parse_str("b0469ab7-9d69-49ff-98a1-4c7960829b82").unwrap_or_else(|_| Uuid::nil());
}

/// A suite executed remotely, with the hierarchy learned from its reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct SuiteDefinition {
    pub id: Uuid,
    pub label: String,
    #[builder(default)]
    #[serde(default)]
    pub description: Option<String>,
    #[builder(default)]
    #[serde(default)]
    pub version: Option<String>,
    pub remote_resource: String,
    #[builder(default = "vec![TEAM_ENGINE_TAG.to_owned()]")]
    #[serde(default)]
    pub tags: Vec<String>,
    #[builder(default = "REMOTE_EDITOR.to_owned()")]
    pub last_editor: String,
    #[builder(default)]
    #[serde(default)]
    pub modules: Vec<ModuleDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDefinition {
    pub id: Uuid,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cases: Vec<CaseDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDefinition {
    pub id: Uuid,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
    pub id: Uuid,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    pub item_type: Uuid,
    pub statement: String,
}

impl SuiteDefinition {
    pub fn builder() -> SuiteDefinitionBuilder {
        SuiteDefinitionBuilder::default()
    }

    /// Derives a suite from its remote resource, e.g.
    /// `.../rest/suites/wfs20/1.26/`.
    ///
    /// The last path segment is the version. The identity is derived from
    /// the resource without it, so a new release keeps the same suite.
    pub fn from_remote_resource(resource: &str, label: &str) -> Result<Self, String> {
        let trimmed = resource.trim_end_matches('/');
        let split = match trimmed.rfind('/') {
            Some(split) if split + 1 < trimmed.len() => split,
            _ => return Err(format!("'{}' has no version segment", resource)),
        };
        let (parent, version) = (&trimmed[..=split], &trimmed[split + 1..]);
        Self::builder()
            .id(name_uuid(parent))
            .label(label)
            .version(Some(version.to_owned()))
            .remote_resource(resource)
            .build()
    }

    /// Prefix scoping every identity derived below this suite.
    pub fn scope_prefix(&self) -> String {
        format!("{}{}", self.id.to_hyphenated(), self.label)
    }

    pub fn step_count(&self) -> usize {
        self.modules
            .iter()
            .flat_map(|module| module.cases.iter())
            .map(|case| case.steps.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_ignores_version() {
        let old = SuiteDefinition::from_remote_resource(
            "http://localhost/teamengine/rest/suites/wfs20/1.25/",
            "WFS 2.0",
        )
        .unwrap();
        let new = SuiteDefinition::from_remote_resource(
            "http://localhost/teamengine/rest/suites/wfs20/1.26",
            "WFS 2.0",
        )
        .unwrap();

        assert_eq!(old.id, new.id);
        assert_eq!(old.version.as_deref(), Some("1.25"));
        assert_eq!(new.version.as_deref(), Some("1.26"));
        assert_eq!(new.tags, vec![TEAM_ENGINE_TAG.to_owned()]);
        assert!(new.modules.is_empty());
    }

    #[test]
    fn test_resource_without_version_is_rejected() {
        assert!(SuiteDefinition::from_remote_resource("wfs20", "WFS 2.0").is_err());
        assert!(SuiteDefinition::from_remote_resource("/", "WFS 2.0").is_err());
    }

    #[test]
    fn test_scope_prefix_joins_identity_and_label() {
        let suite = SuiteDefinition::builder()
            .id(Uuid::nil())
            .label("WFS")
            .remote_resource("http://localhost/wfs/1/")
            .build()
            .unwrap();

        assert_eq!(
            suite.scope_prefix(),
            "00000000-0000-0000-0000-000000000000WFS"
        );
    }
}
