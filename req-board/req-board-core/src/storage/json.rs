//! Flat-file record store. The whole document lives in memory and every
//! mutation rewrites the file.

use crate::record::{CollectionName, Fields, Record};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use uuid::Uuid;

/// On-disk shape of the store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    actors: Vec<Record>,
    #[serde(default)]
    requirements: Vec<Record>,
    #[serde(default, rename = "acceptanceCriteria")]
    acceptance_criteria: Vec<Record>,
}

impl StoreDocument {
    fn collection(&self, name: CollectionName) -> &Vec<Record> {
        match name {
            CollectionName::Actors => &self.actors,
            CollectionName::Requirements => &self.requirements,
            CollectionName::AcceptanceCriteria => &self.acceptance_criteria,
        }
    }

    fn collection_mut(&mut self, name: CollectionName) -> &mut Vec<Record> {
        match name {
            CollectionName::Actors => &mut self.actors,
            CollectionName::Requirements => &mut self.requirements,
            CollectionName::AcceptanceCriteria => &mut self.acceptance_criteria,
        }
    }
}

/// Store backed by a single JSON file.
pub struct JsonStore {
    path: PathBuf,
    doc: StoreDocument,
}

impl JsonStore {
    /// Load the store from `path`. A missing or unreadable file yields an
    /// empty store; the file is only created by the first mutation.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let doc = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<StoreDocument>(&bytes) {
                Ok(doc) => doc,
                Err(err) => {
                    warn!("Store file {} is not valid JSON, starting empty: {}", path.display(), err);
                    StoreDocument::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("No store file at {}, starting empty", path.display());
                StoreDocument::default()
            }
            Err(err) => {
                warn!("Could not read store file {}, starting empty: {}", path.display(), err);
                StoreDocument::default()
            }
        };
        Self { path, doc }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records of `collection` in insertion order.
    pub fn list(&self, collection: CollectionName) -> &[Record] {
        self.doc.collection(collection)
    }

    /// First record of `collection` whose id is `id`.
    pub fn get(&self, collection: CollectionName, id: &str) -> Option<&Record> {
        self.doc
            .collection(collection)
            .iter()
            .find(|r| r.id() == Some(id))
    }

    /// Rewrite the whole document to disk.
    pub fn save(&self) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.doc)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&self.path, bytes)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }

    /// Append a record with a freshly generated id and persist.
    pub fn insert(&mut self, collection: CollectionName, fields: Fields) -> Result<Record> {
        let record = Record::with_id(Uuid::new_v4().to_string(), fields);
        let stored = record.clone();
        self.mutate(collection, move |records| {
            records.push(record);
            Some(())
        })?;
        Ok(stored)
    }

    /// Replace every field of the record with `id`, keeping the id. Returns
    /// `None` without touching the file when no record matches.
    pub fn replace(
        &mut self,
        collection: CollectionName,
        id: &str,
        fields: Fields,
    ) -> Result<Option<Record>> {
        self.mutate(collection, |records| {
            let slot = records.iter_mut().find(|r| r.id() == Some(id))?;
            *slot = Record::with_id(id, fields);
            Some(slot.clone())
        })
    }

    /// Remove the first record with `id`. Returns `None` without touching
    /// the file when no record matches.
    pub fn remove(&mut self, collection: CollectionName, id: &str) -> Result<Option<Record>> {
        self.mutate(collection, |records| {
            let index = records.iter().position(|r| r.id() == Some(id))?;
            Some(records.remove(index))
        })
    }

    /// Apply `change` to one collection and persist. A failed write restores
    /// the collection so memory does not run ahead of disk.
    fn mutate<T>(
        &mut self,
        collection: CollectionName,
        change: impl FnOnce(&mut Vec<Record>) -> Option<T>,
    ) -> Result<Option<T>> {
        let before = self.doc.collection(collection).clone();
        let Some(out) = change(self.doc.collection_mut(collection)) else {
            return Ok(None);
        };
        if let Err(err) = self.save() {
            error!("Failed to persist {} after change: {:#}", collection, err);
            *self.doc.collection_mut(collection) = before;
            return Err(err);
        }
        Ok(Some(out))
    }
}
