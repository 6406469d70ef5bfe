//! In-memory history store

use std::sync::Mutex;

use chrono::Utc;

use super::{CalculationRecord, CalculationStore, HistoryFilter, NewCalculation, RecordId, StoreError};

/// Process-local store, ids start at 1
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<CalculationRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CalculationStore for InMemoryStore {
    fn save(&self, calculation: NewCalculation) -> Result<RecordId, StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let id = records.len() as RecordId + 1;
        records.push(calculation.into_record(id, Utc::now()));
        log::debug!("saved calculation {} in memory", id);
        Ok(id)
    }

    fn list(&self, filter: &HistoryFilter) -> Result<Vec<CalculationRecord>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(filter.apply(records.iter().cloned()))
    }
}
