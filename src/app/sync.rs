//! Learns a suite's module/case/step hierarchy from an executed result.
//!
//! The remote service does not publish the structure of its suites, so the
//! first report of a suite defines it. Identities are name derived, which
//! makes merging the same report again a no-op.

use crate::app::parser::{CaseNode, ModuleNode, ResultTree, StepNode};
use crate::store::model::{
    CaseDefinition, ModuleDefinition, StepDefinition, SuiteDefinition, REMOTE_STATEMENT,
    TESTNG_STEP_TYPE,
};
use crate::store::{StoreError, SuiteStore};

/// Merges the hierarchy of `tree` into `definition`.
///
/// Returns whether the definition changed.
pub fn materialize(definition: &mut SuiteDefinition, tree: &ResultTree) -> bool {
    let mut changed = false;
    for module in &tree.suite.modules {
        let index = match definition.modules.iter().position(|m| m.id == module.id) {
            Some(index) => index,
            None => {
                definition.modules.push(module_definition(module));
                changed = true;
                definition.modules.len() - 1
            }
        };
        let target = &mut definition.modules[index];
        changed |= relabel(&mut target.label, &mut target.description, &module.label, &module.description);
        for case in &module.cases {
            changed |= merge_case(&mut target.cases, case);
        }
    }
    changed
}

/// Merges `tree` into `definition` and persists the result when it differs
/// from what the store holds.
pub fn synchronize(
    store: &mut dyn SuiteStore,
    mut definition: SuiteDefinition,
    tree: &ResultTree,
) -> Result<SuiteDefinition, StoreError> {
    let changed = materialize(&mut definition, tree);
    if !store.exists(&definition.id) {
        store.add(definition.clone())?;
        info!("Suite model '{}' created", definition.label);
    } else if changed {
        store.replace(definition.clone())?;
        info!(
            "Suite model '{}' updated, {} steps known",
            definition.label,
            definition.step_count()
        );
    } else {
        debug!("Suite model '{}' is up to date", definition.label);
    }
    Ok(definition)
}

fn merge_case(cases: &mut Vec<CaseDefinition>, case: &CaseNode) -> bool {
    let mut changed = false;
    let index = match cases.iter().position(|c| c.id == case.id) {
        Some(index) => index,
        None => {
            cases.push(CaseDefinition {
                id: case.id,
                label: case.label.clone(),
                description: case.description.clone(),
                steps: Vec::new(),
            });
            changed = true;
            cases.len() - 1
        }
    };
    let target = &mut cases[index];
    changed |= relabel(&mut target.label, &mut target.description, &case.label, &case.description);
    for step in &case.steps {
        match target.steps.iter_mut().find(|s| s.id == step.id) {
            Some(existing) => {
                changed |= relabel(
                    &mut existing.label,
                    &mut existing.description,
                    &step.label,
                    &step.description,
                )
            }
            None => {
                target.steps.push(step_definition(step));
                changed = true;
            }
        }
    }
    changed
}

fn module_definition(module: &ModuleNode) -> ModuleDefinition {
    ModuleDefinition {
        id: module.id,
        label: module.label.clone(),
        description: module.description.clone(),
        cases: Vec::new(),
    }
}

fn step_definition(step: &StepNode) -> StepDefinition {
    StepDefinition {
        id: step.id,
        label: step.label.clone(),
        description: step.description.clone(),
        item_type: *TESTNG_STEP_TYPE,
        statement: REMOTE_STATEMENT.to_owned(),
    }
}

fn relabel(
    label: &mut String,
    description: &mut Option<String>,
    new_label: &str,
    new_description: &Option<String>,
) -> bool {
    let changed = *label != *new_label || *description != *new_description;
    if changed {
        *label = new_label.to_owned();
        *description = new_description.clone();
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::identity::IdentityScope;
    use crate::app::parser::{parse, tests::REPORT, ResultDocument};
    use crate::app::status::ClassificationTable;
    use crate::store::memory::MemorySuiteStore;
    use std::collections::BTreeSet;
    use uuid::Uuid;

    fn suite() -> SuiteDefinition {
        SuiteDefinition::from_remote_resource(
            "http://localhost/teamengine/rest/suites/wfs20/1.26/",
            "WFS 2.0",
        )
        .unwrap()
    }

    fn tree_for(definition: &SuiteDefinition, report: &str) -> ResultTree {
        let document = ResultDocument::parse(report.to_owned()).unwrap();
        let scope = IdentityScope::new(definition.scope_prefix());
        parse(&document, &scope, &ClassificationTable::default()).unwrap()
    }

    fn identities(definition: &SuiteDefinition) -> BTreeSet<Uuid> {
        let mut ids = BTreeSet::new();
        for module in &definition.modules {
            ids.insert(module.id);
            for case in &module.cases {
                ids.insert(case.id);
                ids.extend(case.steps.iter().map(|step| step.id));
            }
        }
        ids
    }

    #[test]
    fn test_first_materialization_builds_hierarchy() {
        let mut definition = suite();
        let tree = tree_for(&definition, REPORT);

        assert!(materialize(&mut definition, &tree));
        assert_eq!(definition.modules.len(), 1);
        assert_eq!(definition.modules[0].label, "Basic");
        assert_eq!(definition.modules[0].cases.len(), 1);
        assert_eq!(definition.step_count(), 3);
        let step = &definition.modules[0].cases[0].steps[1];
        assert_eq!(step.label, "getFeatureByType");
        assert_eq!(step.description.as_deref(), Some("Query by type"));
        assert_eq!(step.item_type, *TESTNG_STEP_TYPE);
        assert_eq!(step.statement, REMOTE_STATEMENT);
    }

    #[test]
    fn test_materialization_is_idempotent() {
        let mut definition = suite();
        let tree = tree_for(&definition, REPORT);
        materialize(&mut definition, &tree);
        let first = definition.clone();

        assert!(!materialize(&mut definition, &tree));
        assert_eq!(definition, first);
        assert_eq!(identities(&definition), identities(&first));
    }

    #[test]
    fn test_new_steps_are_appended() {
        let mut definition = suite();
        let tree = tree_for(&definition, REPORT);
        materialize(&mut definition, &tree);
        let extended = REPORT.replace(
            "</class>",
            r#"<test-method status="PASS" name="getFeatureById" started-at="2017-06-12T10:00:07Z" finished-at="2017-06-12T10:00:08Z"/></class>"#,
        );

        let tree = tree_for(&definition, &extended);
        assert!(materialize(&mut definition, &tree));
        assert_eq!(definition.step_count(), 4);
        assert_eq!(definition.modules.len(), 1);
    }

    #[test]
    fn test_synchronize_persists_only_changes() {
        let mut store = MemorySuiteStore::new();
        let definition = suite();
        let tree = tree_for(&definition, REPORT);

        let stored = synchronize(&mut store, definition, &tree).unwrap();
        assert_eq!(store.get_by_id(&stored.id).unwrap(), stored);

        let again = synchronize(&mut store, stored.clone(), &tree).unwrap();
        assert_eq!(again, stored);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_synchronize_replaces_existing_definition() {
        let mut store = MemorySuiteStore::new();
        let definition = suite();
        store.add(definition.clone()).unwrap();
        let tree = tree_for(&definition, REPORT);

        synchronize(&mut store, definition.clone(), &tree).unwrap();

        assert_eq!(store.get_by_id(&definition.id).unwrap().step_count(), 3);
    }
}
