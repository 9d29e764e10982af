pub mod file;
pub mod memory;
pub mod model;

use self::model::SuiteDefinition;
use std::fmt;
use uuid::Uuid;

/// Persistence of suite definitions. Serialising concurrent writers is the
/// implementation's concern.
pub trait SuiteStore {
    fn exists(&self, id: &Uuid) -> bool;
    fn get_by_id(&self, id: &Uuid) -> Result<SuiteDefinition, StoreError>;
    fn add(&mut self, definition: SuiteDefinition) -> Result<(), StoreError>;
    fn replace(&mut self, definition: SuiteDefinition) -> Result<(), StoreError>;
    fn delete_all_existing(&mut self, ids: &[Uuid]) -> Result<(), StoreError>;
}

#[derive(Debug)]
pub enum StoreError {
    NotFound(Uuid),
    AlreadyExists(Uuid),
    Io(std::io::Error),
    Serialization(serde_json::Error),
}

impl std::error::Error for StoreError {}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "suite {} not found", id),
            StoreError::AlreadyExists(id) => write!(f, "suite {} already exists", id),
            StoreError::Io(err) => write!(f, "I/O error: {}", err),
            StoreError::Serialization(err) => write!(f, "serialization error: {}", err),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err)
    }
}
