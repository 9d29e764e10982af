use crate::store::model::SuiteDefinition;
use crate::store::{StoreError, SuiteStore};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemorySuiteStore {
    suites: HashMap<Uuid, SuiteDefinition>,
}

impl MemorySuiteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }
}

impl SuiteStore for MemorySuiteStore {
    fn exists(&self, id: &Uuid) -> bool {
        self.suites.contains_key(id)
    }

    fn get_by_id(&self, id: &Uuid) -> Result<SuiteDefinition, StoreError> {
        self.suites
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound(*id))
    }

    fn add(&mut self, definition: SuiteDefinition) -> Result<(), StoreError> {
        if self.exists(&definition.id) {
            return Err(StoreError::AlreadyExists(definition.id));
        }
        self.suites.insert(definition.id, definition);
        Ok(())
    }

    fn replace(&mut self, definition: SuiteDefinition) -> Result<(), StoreError> {
        if !self.exists(&definition.id) {
            return Err(StoreError::NotFound(definition.id));
        }
        self.suites.insert(definition.id, definition);
        Ok(())
    }

    fn delete_all_existing(&mut self, ids: &[Uuid]) -> Result<(), StoreError> {
        for id in ids {
            self.suites.remove(id);
        }
        Ok(())
    }
}
