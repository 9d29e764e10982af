use uuid::Uuid;

lazy_static! {
    static ref NAMESPACE: Uuid = Uuid::new_v5(&Uuid::NAMESPACE_URL, b"urn:teamengine-driver:item");
}

/// Name-based UUID, identical for identical names.
pub fn name_uuid(name: &str) -> Uuid {
    Uuid::new_v5(&NAMESPACE, name.as_bytes())
}

/// Derives item identities within one suite.
///
/// The scope is the suite's identity followed by its label, so equally named
/// modules of different suites never collide, while re-running a suite
/// reproduces the identities of its earlier runs.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityScope {
    prefix: String,
}

impl IdentityScope {
    pub fn new(prefix: String) -> Self {
        Self { prefix }
    }

    pub fn identity_of(&self, parent_name: &str, node_name: &str) -> Uuid {
        name_uuid(&format!("{}{}{}", self.prefix, parent_name, node_name))
    }

    pub fn identity_with_suffix(&self, parent_name: &str, node_name: &str, suffix: &str) -> Uuid {
        name_uuid(&format!(
            "{}{}{}{}",
            self.prefix, parent_name, node_name, suffix
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_deterministic() {
        let scope = IdentityScope::new("suiteWFS 2.0".to_owned());

        assert_eq!(
            scope.identity_of("GetFeature", "getFeatureByType"),
            scope.identity_of("GetFeature", "getFeatureByType")
        );
        assert_eq!(
            IdentityScope::new("suiteWFS 2.0".to_owned()).identity_of("a", "b"),
            scope.identity_of("a", "b")
        );
    }

    #[test]
    fn test_scope_separates_suites() {
        let first = IdentityScope::new("first".to_owned());
        let second = IdentityScope::new("second".to_owned());

        assert_ne!(
            first.identity_of("GetFeature", "getFeatureByType"),
            second.identity_of("GetFeature", "getFeatureByType")
        );
    }

    #[test]
    fn test_suffix_changes_identity() {
        let scope = IdentityScope::new("suite".to_owned());

        assert_ne!(
            scope.identity_of("case", "step"),
            scope.identity_with_suffix("case", "step", "Assertion")
        );
    }

    #[test]
    fn test_name_uuid_is_version_five() {
        assert_eq!(name_uuid("x").get_version_num(), 5);
    }
}
