//! CSV-file history store

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;

use super::{CalculationRecord, CalculationStore, HistoryFilter, NewCalculation, RecordId, StoreError};

/// Append-only CSV file of calculation records
///
/// The header is written only when the file is created or empty. Saves
/// within one process are serialized; the next id is one past the largest
/// id in the file.
#[derive(Debug)]
pub struct CsvHistoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<CalculationRecord>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::Reader::from_reader(file);
        let mut records = Vec::new();
        for result in reader.deserialize() {
            let record: CalculationRecord = result?;
            records.push(record);
        }
        Ok(records)
    }
}

impl CalculationStore for CsvHistoryStore {
    fn save(&self, calculation: NewCalculation) -> Result<RecordId, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;

        let existing = self.read_all()?;
        let id = existing.iter().map(|r| r.id).max().unwrap_or(0) + 1;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(calculation.into_record(id, Utc::now()))?;
        writer.flush()?;

        log::debug!("saved calculation {} to {}", id, self.path.display());
        Ok(id)
    }

    fn list(&self, filter: &HistoryFilter) -> Result<Vec<CalculationRecord>, StoreError> {
        let records = self.read_all()?;
        log::debug!("read {} calculations from {}", records.len(), self.path.display());
        Ok(filter.apply(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::test_support::calculation;

    fn temp_store(name: &str) -> CsvHistoryStore {
        let path = std::env::temp_dir().join(format!(
            "pension_history_{}_{}.csv",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        CsvHistoryStore::new(path)
    }

    #[test]
    fn test_missing_file_lists_nothing() {
        let store = temp_store("missing");
        assert!(store.list(&HistoryFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn test_save_appends_with_single_header() {
        let store = temp_store("append");
        assert_eq!(store.save(calculation("alice", 2_381.0)).unwrap(), 1);
        assert_eq!(store.save(calculation("bob", 1_781.0)).unwrap(), 2);

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("id,created_at,user_id,current_age"));
        assert!(text.lines().next().unwrap().contains("salary_input,salary_type,salary_period"));

        let bob = store.list(&HistoryFilter::for_user("bob")).unwrap();
        assert_eq!(bob.len(), 1);
        assert_eq!(bob[0].id, 2);
        assert_eq!(bob[0].calculated_monthly_pension, 1_781.0);
        assert_eq!(bob[0].salary_input, 10_000.0);
        assert_eq!(bob[0].salary_type, crate::assumptions::SalaryType::Gross);
        assert_eq!(bob[0].salary_period, crate::assumptions::SalaryPeriod::Month);

        std::fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn test_reopened_store_continues_ids() {
        let store = temp_store("reopen");
        store.save(calculation("alice", 1.0)).unwrap();
        store.save(calculation("alice", 2.0)).unwrap();

        let reopened = CsvHistoryStore::new(store.path().to_path_buf());
        assert_eq!(reopened.save(calculation("alice", 3.0)).unwrap(), 3);

        let latest = reopened.list(&HistoryFilter::for_user("alice")).unwrap();
        assert_eq!(latest.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 2, 1]);

        std::fs::remove_file(store.path()).unwrap();
    }
}
