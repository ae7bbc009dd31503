use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::HistoryError;
use crate::history::HistoryRecord;
use crate::model::entity::Year;

/// A directory of `<year>.json` history records.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    /// Opens the store, creating the directory if it does not exist yet.
    pub fn open(dir: impl Into<PathBuf>) -> Result<HistoryStore, HistoryError> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|source| HistoryError::Io { path: dir.clone(), source })?;
            info!(dir = %dir.display(), "created history directory");
        }
        Ok(HistoryStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, year: Year) -> PathBuf {
        self.dir.join(format!("{year}.json"))
    }

    pub fn compromises_path(&self, year: Year) -> PathBuf {
        self.dir.join(format!("{year}_compromises.txt"))
    }

    /// File already holding `year`, whatever its name.
    pub fn find(&self, year: Year) -> Result<Option<PathBuf>, HistoryError> {
        let named = self.path_for(year);
        if named.exists() {
            return Ok(Some(named));
        }
        for path in self.record_paths()? {
            if read_record(&path)?.year == year {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    fn record_paths(&self) -> Result<Vec<PathBuf>, HistoryError> {
        let io_err = |source| HistoryError::Io { path: self.dir.clone(), source };
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Loads every `.json` record, sorted by year. Any unreadable or
    /// malformed file fails the whole load.
    pub fn load(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        let paths = self.record_paths()?;
        let mut years = BTreeSet::new();
        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            let record = read_record(&path)?;
            if !years.insert(record.year) {
                return Err(HistoryError::DuplicateYear(record.year));
            }
            records.push(record);
        }
        records.sort_by_key(|record| record.year);
        info!(dir = %self.dir.display(), records = records.len(), "loaded history");
        Ok(records)
    }

    pub fn save(&self, record: &HistoryRecord) -> Result<PathBuf, HistoryError> {
        let path = self.path_for(record.year);
        let text = serde_json::to_string_pretty(record)
            .map_err(|source| HistoryError::Parse { path: path.clone(), source })?;
        fs::write(&path, text + "\n").map_err(|source| HistoryError::Io { path: path.clone(), source })?;
        info!(path = %path.display(), pairs = record.pairs.len(), "saved history");
        Ok(path)
    }

    pub fn write_compromises(&self, year: Year, lines: &[String]) -> Result<PathBuf, HistoryError> {
        let path = self.compromises_path(year);
        let mut text = lines.join("\n");
        text.push('\n');
        fs::write(&path, text).map_err(|source| HistoryError::Io { path: path.clone(), source })?;
        debug!(path = %path.display(), lines = lines.len(), "wrote compromise report");
        Ok(path)
    }
}

fn read_record(path: &Path) -> Result<HistoryRecord, HistoryError> {
    let text = fs::read_to_string(path)
        .map_err(|source| HistoryError::Io { path: path.to_path_buf(), source })?;
    let record: HistoryRecord = serde_json::from_str(&text)
        .map_err(|source| HistoryError::Parse { path: path.to_path_buf(), source })?;
    let named_year = path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.parse::<Year>().ok());
    match named_year {
        Some(expected) if expected != record.year => Err(HistoryError::YearMismatch {
            path: path.to_path_buf(),
            expected,
            found: record.year,
        }),
        _ => Ok(record),
    }
}
