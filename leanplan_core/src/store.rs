//! Persistence for the user profile, daily records and active plan.
//!
//! The `Store` trait is the only way the tracker reaches stored data.
//! `JsonFileStore` keeps everything in one JSON file with file locking
//! and atomic replacement; `MemoryStore` keeps it in memory.

use crate::{DailyRecord, Error, Result, User, WeightLossPlan};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name of the ledger inside the data directory
pub const LEDGER_FILE_NAME: &str = "leanplan.json";

/// CRUD access to the tracked data
pub trait Store {
    fn load_user(&self) -> Result<Option<User>>;
    fn save_user(&mut self, user: &User) -> Result<()>;
    /// All daily records, ordered by date ascending
    fn load_daily_records(&self) -> Result<Vec<DailyRecord>>;
    /// Insert a record, replacing any existing record with the same date
    fn upsert_daily_record(&mut self, record: DailyRecord) -> Result<()>;
    fn load_plan(&self) -> Result<Option<WeightLossPlan>>;
    fn save_plan(&mut self, plan: &WeightLossPlan) -> Result<()>;
}

/// Everything persisted for one user
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Ledger {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub daily_records: Vec<DailyRecord>,
    #[serde(default)]
    pub plan: Option<WeightLossPlan>,
}

impl Ledger {
    /// Replace the record for `record.date` or insert it in date order
    pub fn upsert(&mut self, record: DailyRecord) {
        match self
            .daily_records
            .binary_search_by_key(&record.date, |r| r.date)
        {
            Ok(idx) => self.daily_records[idx] = record,
            Err(idx) => self.daily_records.insert(idx, record),
        }
    }

    /// Restore date order and the one-record-per-date invariant
    ///
    /// When a hand-edited file repeats a date, the last record wins.
    fn normalize(&mut self) {
        let records = std::mem::take(&mut self.daily_records);
        for record in records {
            self.upsert(record);
        }
    }
}

/// JSON file store with file locking
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store using the standard file name inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(LEDGER_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger with shared locking
    ///
    /// Returns an empty ledger if the file doesn't exist. A file that
    /// cannot be parsed is moved aside to `<name>.corrupt` so the next
    /// save cannot overwrite it, and an empty ledger is returned.
    pub fn load(&self) -> Result<Ledger> {
        if !self.path.exists() {
            tracing::debug!("No ledger found at {:?}, starting empty", self.path);
            return Ok(Ledger::default());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read_result = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read_result?;

        match serde_json::from_str::<Ledger>(&contents) {
            Ok(mut ledger) => {
                ledger.normalize();
                tracing::debug!(
                    "Loaded ledger from {:?} ({} daily records)",
                    self.path,
                    ledger.daily_records.len()
                );
                Ok(ledger)
            }
            Err(e) => {
                let aside = self.corrupt_path();
                tracing::warn!(
                    "Failed to parse ledger {:?}: {}. Moving it to {:?} and starting empty.",
                    self.path,
                    e,
                    aside
                );
                std::fs::rename(&self.path, &aside)?;
                Ok(Ledger::default())
            }
        }
    }

    /// Save the ledger atomically
    ///
    /// Writes to a locked temp file in the same directory, syncs it, then
    /// renames it over the ledger.
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, ledger)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved ledger to {:?}", self.path);
        Ok(())
    }

    /// Load the ledger, modify it, and save it back
    pub fn update<F>(&self, f: F) -> Result<Ledger>
    where
        F: FnOnce(&mut Ledger),
    {
        let mut ledger = self.load()?;
        f(&mut ledger);
        self.save(&ledger)?;
        Ok(ledger)
    }

    fn corrupt_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| LEDGER_FILE_NAME.into());
        name.push(".corrupt");
        self.path.with_file_name(name)
    }
}

impl Store for JsonFileStore {
    fn load_user(&self) -> Result<Option<User>> {
        Ok(self.load()?.user)
    }

    fn save_user(&mut self, user: &User) -> Result<()> {
        self.update(|ledger| ledger.user = Some(user.clone()))?;
        tracing::info!("Saved profile for {}", user.name);
        Ok(())
    }

    fn load_daily_records(&self) -> Result<Vec<DailyRecord>> {
        Ok(self.load()?.daily_records)
    }

    fn upsert_daily_record(&mut self, record: DailyRecord) -> Result<()> {
        let date = record.date;
        self.update(|ledger| ledger.upsert(record))?;
        tracing::info!("Saved daily record for {}", date);
        Ok(())
    }

    fn load_plan(&self) -> Result<Option<WeightLossPlan>> {
        Ok(self.load()?.plan)
    }

    fn save_plan(&mut self, plan: &WeightLossPlan) -> Result<()> {
        self.update(|ledger| ledger.plan = Some(plan.clone()))?;
        tracing::info!("Saved plan generated on {}", plan.generated_date);
        Ok(())
    }
}

/// In-memory store, used by tests and by callers that persist elsewhere
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    ledger: Ledger,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

impl Store for MemoryStore {
    fn load_user(&self) -> Result<Option<User>> {
        Ok(self.ledger.user.clone())
    }

    fn save_user(&mut self, user: &User) -> Result<()> {
        self.ledger.user = Some(user.clone());
        Ok(())
    }

    fn load_daily_records(&self) -> Result<Vec<DailyRecord>> {
        Ok(self.ledger.daily_records.clone())
    }

    fn upsert_daily_record(&mut self, record: DailyRecord) -> Result<()> {
        self.ledger.upsert(record);
        Ok(())
    }

    fn load_plan(&self) -> Result<Option<WeightLossPlan>> {
        Ok(self.ledger.plan.clone())
    }

    fn save_plan(&mut self, plan: &WeightLossPlan) -> Result<()> {
        self.ledger.plan = Some(plan.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActivityLevel, Gender};
    use chrono::NaiveDate;

    fn sample_user() -> User {
        User::new(
            "Sam",
            30,
            Gender::Male,
            175.0,
            85.0,
            75.0,
            ActivityLevel::ModeratelyActive,
        )
        .unwrap()
    }

    fn weighed(day: u32, weight_kg: f64) -> DailyRecord {
        let mut record = DailyRecord::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap());
        record.weight_kg = Some(weight_kg);
        record
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::in_dir(temp_dir.path());

        let user = sample_user();
        store.save_user(&user).unwrap();
        store.upsert_daily_record(weighed(2, 84.0)).unwrap();

        let loaded = store.load_user().unwrap();
        assert_eq!(loaded, Some(user));
        assert_eq!(store.load_daily_records().unwrap().len(), 1);
        assert_eq!(store.load_plan().unwrap(), None);
    }

    #[test]
    fn test_load_nonexistent_returns_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("missing.json"));

        assert_eq!(store.load().unwrap(), Ledger::default());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_upsert_replaces_same_date_and_keeps_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::in_dir(temp_dir.path());

        store.upsert_daily_record(weighed(10, 84.0)).unwrap();
        store.upsert_daily_record(weighed(3, 85.0)).unwrap();
        store.upsert_daily_record(weighed(10, 83.5)).unwrap();

        let records = store.load_daily_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].weight_kg, Some(85.0));
        assert_eq!(records[1].weight_kg, Some(83.5));
    }

    #[test]
    fn test_corrupted_ledger_is_moved_aside() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(temp_dir.path());
        std::fs::write(store.path(), "{ invalid json }").unwrap();

        let ledger = store.load().unwrap();
        assert_eq!(ledger, Ledger::default());

        assert!(!store.path().exists());
        let aside = temp_dir.path().join("leanplan.json.corrupt");
        assert_eq!(
            std::fs::read_to_string(aside).unwrap(),
            "{ invalid json }"
        );
    }

    #[test]
    fn test_duplicate_dates_in_file_are_merged() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(temp_dir.path());

        let ledger = Ledger {
            user: None,
            daily_records: vec![weighed(5, 84.0), weighed(1, 86.0), weighed(5, 83.0)],
            plan: None,
        };
        std::fs::write(store.path(), serde_json::to_string(&ledger).unwrap()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.daily_records.len(), 2);
        assert_eq!(loaded.daily_records[0].weight_kg, Some(86.0));
        assert_eq!(loaded.daily_records[1].weight_kg, Some(83.0));
    }

    #[test]
    fn test_atomic_save() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(temp_dir.path());

        store.save(&Ledger::default()).unwrap();

        // Verify ledger exists and no stray temp files remain
        assert!(store.path().exists());
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != LEDGER_FILE_NAME)
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only {}, found extras: {:?}",
            LEDGER_FILE_NAME,
            extras
        );
    }

    #[test]
    fn test_memory_store_upsert() {
        let mut store = MemoryStore::new();
        store.upsert_daily_record(weighed(2, 84.0)).unwrap();
        store.upsert_daily_record(weighed(2, 83.0)).unwrap();

        assert_eq!(store.ledger().daily_records.len(), 1);
        assert_eq!(store.load_daily_records().unwrap()[0].weight_kg, Some(83.0));
    }
}
