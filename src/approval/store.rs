use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

use super::types::{transition, Actor, ApprovalStatus, Decision, DeterminationRecord};
use crate::error::ApprovalError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("determination {0} not found")]
    NotFound(Uuid),

    #[error("determination {0} already exists")]
    Duplicate(Uuid),

    #[error("determination {id} is already {actual}")]
    Conflict { id: Uuid, actual: ApprovalStatus },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    #[error(transparent)]
    Approval(#[from] ApprovalError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Persistence for determination records.
///
/// `compare_and_set` is the only way a status changes. It must apply the
/// change atomically and only when the stored status still equals
/// `expected`, reporting the status it found otherwise.
pub trait DeterminationStore {
    fn insert(&self, record: DeterminationRecord) -> Result<(), StoreError>;

    fn get(&self, id: Uuid) -> Result<DeterminationRecord, StoreError>;

    fn list(&self) -> Result<Vec<DeterminationRecord>, StoreError>;

    fn compare_and_set(
        &self,
        id: Uuid,
        expected: ApprovalStatus,
        next: ApprovalStatus,
        decided_by: &str,
    ) -> Result<DeterminationRecord, StoreError>;
}

/// Apply a reviewer's decision to a stored determination.
///
/// When another decision lands between the read and the write, the
/// decision is evaluated again against the status that won. Since only
/// pending records can change, this settles after at most one retry.
pub fn apply_decision<S>(
    store: &S,
    id: Uuid,
    decision: Decision,
    actor: &Actor,
) -> Result<DeterminationRecord, DecisionError>
where
    S: DeterminationStore + ?Sized,
{
    let mut record = store.get(id)?;

    loop {
        let current = record.status;
        let next = transition(current, decision, actor)?;

        if next == current {
            tracing::debug!(%id, status = %current, "decision already applied");
            return Ok(record);
        }

        match store.compare_and_set(id, current, next, &actor.id) {
            Ok(updated) => {
                tracing::info!(%id, from = %current, to = %next, actor = %actor.id, "determination decided");
                return Ok(updated);
            }
            Err(StoreError::Conflict { actual, .. }) => {
                tracing::warn!(%id, expected = %current, %actual, "concurrent decision, re-evaluating");
                record = store.get(id)?;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Apply a compare-and-set to a record in place.
pub(crate) fn set_status(
    record: &mut DeterminationRecord,
    expected: ApprovalStatus,
    next: ApprovalStatus,
    decided_by: &str,
) -> Result<(), StoreError> {
    if record.status != expected {
        return Err(StoreError::Conflict {
            id: record.id,
            actual: record.status,
        });
    }
    record.status = next;
    record.decided_at = Some(Utc::now());
    record.decided_by = Some(decided_by.to_string());
    Ok(())
}

/// In-process store. The mutex is held across the compare and the write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<Uuid, DeterminationRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeterminationStore for MemoryStore {
    fn insert(&self, record: DeterminationRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        if records.contains_key(&record.id) {
            return Err(StoreError::Duplicate(record.id));
        }
        records.insert(record.id, record);
        Ok(())
    }

    fn get(&self, id: Uuid) -> Result<DeterminationRecord, StoreError> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn list(&self) -> Result<Vec<DeterminationRecord>, StoreError> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let mut all: Vec<_> = records.values().cloned().collect();
        all.sort_by_key(|r| r.created_at);
        Ok(all)
    }

    fn compare_and_set(
        &self,
        id: Uuid,
        expected: ApprovalStatus,
        next: ApprovalStatus,
        decided_by: &str,
    ) -> Result<DeterminationRecord, StoreError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let record = records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        set_status(record, expected, next, decided_by)?;
        Ok(record.clone())
    }
}
