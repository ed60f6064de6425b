use atomic_write_file::AtomicWriteFile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use super::types::{CompetitorName, RecordKey, ResultRecord};
use crate::error::EngineError;

const STORE_VERSION: u32 = 1;

/// Backing store for per-competitor result records.
///
/// `list_results` returns records in no guaranteed order. Every operation
/// other than `create_competitor` fails with `CompetitorNotFound` when the
/// competitor has no record set, so callers can tell "empty" from "absent".
pub trait ResultStore {
    fn list_results(&self, competitor: &CompetitorName) -> Result<Vec<ResultRecord>, EngineError>;

    /// Open an empty record set. No-op if one already exists.
    fn create_competitor(&mut self, competitor: &CompetitorName) -> Result<(), EngineError>;

    fn append_result(
        &mut self,
        competitor: &CompetitorName,
        record: ResultRecord,
    ) -> Result<(), EngineError>;

    fn replace_result(
        &mut self,
        competitor: &CompetitorName,
        old_key: &RecordKey,
        new_record: ResultRecord,
    ) -> Result<(), EngineError>;

    fn delete_result(
        &mut self,
        competitor: &CompetitorName,
        key: &RecordKey,
    ) -> Result<(), EngineError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    #[serde(default)]
    competitors: BTreeMap<String, Vec<ResultRecord>>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            competitors: BTreeMap::new(),
        }
    }
}

/// Get the default result store path (~/.config/ata-points/results.json)
pub fn get_results_path() -> PathBuf {
    crate::config::get_config_dir().join("results.json")
}

/// Result store kept in a single JSON document.
///
/// Every mutation rewrites the document atomically, so an interrupted write
/// never leaves a truncated store behind.
#[derive(Debug, Clone)]
pub struct JsonResultStore {
    path: PathBuf,
}

impl JsonResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoreDocument, EngineError> {
        if !self.path.exists() {
            return Ok(StoreDocument::default());
        }

        let file = File::open(&self.path).map_err(|e| {
            EngineError::store_unavailable(format!("cannot open {}: {}", self.path.display(), e))
        })?;

        let document: StoreDocument = serde_json::from_reader(file).map_err(|e| {
            EngineError::store_unavailable(format!("cannot parse {}: {}", self.path.display(), e))
        })?;

        if document.version != STORE_VERSION {
            return Err(EngineError::store_unavailable(format!(
                "unsupported store version {}",
                document.version
            )));
        }

        Ok(document)
    }

    fn save(&self, document: &StoreDocument) -> Result<(), EngineError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    EngineError::store_unavailable(format!(
                        "cannot create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let mut file = AtomicWriteFile::open(&self.path)
            .map_err(|e| EngineError::store_unavailable(format!("cannot open for write: {}", e)))?;

        serde_json::to_writer_pretty(&mut file, document)
            .map_err(|e| EngineError::store_unavailable(format!("cannot serialize store: {}", e)))?;

        file.commit()
            .map_err(|e| EngineError::store_unavailable(format!("cannot commit store: {}", e)))?;

        Ok(())
    }

    /// Load, apply `f` to the competitor's records, and save.
    fn modify<F>(&mut self, competitor: &CompetitorName, f: F) -> Result<(), EngineError>
    where
        F: FnOnce(&mut Vec<ResultRecord>) -> Result<(), EngineError>,
    {
        let mut document = self.load()?;
        let records = document
            .competitors
            .get_mut(competitor.as_str())
            .ok_or_else(|| EngineError::CompetitorNotFound(competitor.to_string()))?;
        f(records)?;
        self.save(&document)
    }
}

impl ResultStore for JsonResultStore {
    fn list_results(&self, competitor: &CompetitorName) -> Result<Vec<ResultRecord>, EngineError> {
        self.load()?
            .competitors
            .remove(competitor.as_str())
            .ok_or_else(|| EngineError::CompetitorNotFound(competitor.to_string()))
    }

    fn create_competitor(&mut self, competitor: &CompetitorName) -> Result<(), EngineError> {
        let mut document = self.load()?;
        if document.competitors.contains_key(competitor.as_str()) {
            return Ok(());
        }
        tracing::info!(competitor = %competitor, "opening new record set");
        document
            .competitors
            .insert(competitor.to_string(), Vec::new());
        self.save(&document)
    }

    fn append_result(
        &mut self,
        competitor: &CompetitorName,
        record: ResultRecord,
    ) -> Result<(), EngineError> {
        self.modify(competitor, |records| {
            let key = record.key();
            if records.iter().any(|r| r.matches(&key)) {
                return Err(EngineError::Duplicate(key));
            }
            records.push(record);
            Ok(())
        })
    }

    fn replace_result(
        &mut self,
        competitor: &CompetitorName,
        old_key: &RecordKey,
        new_record: ResultRecord,
    ) -> Result<(), EngineError> {
        self.modify(competitor, |records| {
            let position = records
                .iter()
                .position(|r| r.matches(old_key))
                .ok_or_else(|| EngineError::RecordNotFound(old_key.clone()))?;

            let new_key = new_record.key();
            if &new_key != old_key && records.iter().any(|r| r.matches(&new_key)) {
                return Err(EngineError::Duplicate(new_key));
            }

            records[position] = new_record;
            Ok(())
        })
    }

    fn delete_result(
        &mut self,
        competitor: &CompetitorName,
        key: &RecordKey,
    ) -> Result<(), EngineError> {
        self.modify(competitor, |records| {
            let position = records
                .iter()
                .position(|r| r.matches(key))
                .ok_or_else(|| EngineError::RecordNotFound(key.clone()))?;
            records.remove(position);
            Ok(())
        })
    }
}
