use crate::store::model::SuiteDefinition;
use crate::store::{StoreError, SuiteStore};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use uuid::Uuid;

/// Keeps one pretty-printed JSON document per suite under a directory.
#[derive(Debug)]
pub struct FileSuiteStore {
    directory: PathBuf,
}

impl FileSuiteStore {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path(&self, id: &Uuid) -> PathBuf {
        self.directory
            .join(format!("{}.json", id.to_hyphenated()))
    }

    fn write(&self, definition: &SuiteDefinition) -> Result<(), StoreError> {
        fs::create_dir_all(&self.directory)?;
        let writer = BufWriter::new(File::create(self.path(&definition.id))?);
        serde_json::to_writer_pretty(writer, definition)?;
        Ok(())
    }
}

impl SuiteStore for FileSuiteStore {
    fn exists(&self, id: &Uuid) -> bool {
        self.path(id).is_file()
    }

    fn get_by_id(&self, id: &Uuid) -> Result<SuiteDefinition, StoreError> {
        if !self.exists(id) {
            return Err(StoreError::NotFound(*id));
        }
        let reader = BufReader::new(File::open(self.path(id))?);
        Ok(serde_json::from_reader(reader)?)
    }

    fn add(&mut self, definition: SuiteDefinition) -> Result<(), StoreError> {
        if self.exists(&definition.id) {
            return Err(StoreError::AlreadyExists(definition.id));
        }
        self.write(&definition)
    }

    fn replace(&mut self, definition: SuiteDefinition) -> Result<(), StoreError> {
        if !self.exists(&definition.id) {
            return Err(StoreError::NotFound(definition.id));
        }
        self.write(&definition)
    }

    fn delete_all_existing(&mut self, ids: &[Uuid]) -> Result<(), StoreError> {
        for id in ids {
            if self.exists(id) {
                fs::remove_file(self.path(id))?;
            }
        }
        Ok(())
    }
}
