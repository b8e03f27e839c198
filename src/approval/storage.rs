use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

use super::store::{set_status, DeterminationStore, StoreError};
use super::types::{ApprovalStatus, DeterminationRecord};

const RECORD_FILE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordFile {
    pub version: u32,
    #[serde(default)]
    pub records: Vec<DeterminationRecord>,
}

impl Default for RecordFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordFile {
    pub fn new() -> Self {
        Self {
            version: RECORD_FILE_VERSION,
            records: Vec::new(),
        }
    }
}

/// Get the default record file path (~/.config/refund-engine/determinations.json)
pub fn get_store_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("determinations.json"))
}

/// Load determination records from a JSON file
///
/// If the file doesn't exist, returns an empty record file.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_records(path: &Path) -> Result<RecordFile> {
    if !path.exists() {
        return Ok(RecordFile::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open record file at {}", path.display()))?;

    let state: RecordFile =
        serde_json::from_reader(file).context("Failed to load determination records")?;

    if state.version != RECORD_FILE_VERSION {
        anyhow::bail!("Unsupported record file version: {}", state.version);
    }

    Ok(state)
}

/// Save determination records to a JSON file atomically
///
/// The file is never left half-written. Parent directories are created as
/// needed.
pub fn save_records(path: &Path, state: &RecordFile) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory at {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state)
        .context("Failed to serialize determination records")?;

    file.commit().context("Failed to save determination records")?;

    Ok(())
}

/// Record store backed by a single JSON document.
///
/// Every operation is a load-modify-save under an in-process lock, so
/// compare-and-set holds for callers sharing one `JsonFileStore`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DeterminationStore for JsonFileStore {
    fn insert(&self, record: DeterminationRecord) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut state = load_records(&self.path)?;
        if state.records.iter().any(|r| r.id == record.id) {
            return Err(StoreError::Duplicate(record.id));
        }
        state.records.push(record);
        save_records(&self.path, &state)?;
        Ok(())
    }

    fn get(&self, id: Uuid) -> Result<DeterminationRecord, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        load_records(&self.path)?
            .records
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn list(&self) -> Result<Vec<DeterminationRecord>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = load_records(&self.path)?.records;
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }

    fn compare_and_set(
        &self,
        id: Uuid,
        expected: ApprovalStatus,
        next: ApprovalStatus,
        decided_by: &str,
    ) -> Result<DeterminationRecord, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut state = load_records(&self.path)?;
        let record = state
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        set_status(record, expected, next, decided_by)?;
        let updated = record.clone();
        save_records(&self.path, &state)?;
        Ok(updated)
    }
}
