use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use serde_json::error::Category;
use serde_json::Value;
use tracing::{debug, warn};

use crate::model::planner::PlannerSettings;
use crate::repository::traits::PlannerRepository;

pub const DATA_DIR_NAME: &str = ".shiftplan";
const PLANNER_FILE_NAME: &str = "planner.json";

/// Uses `base_dir` when given, otherwise `~/.shiftplan`. The directory is
/// created if missing.
pub fn resolve_data_dir(base_dir: Option<PathBuf>) -> Result<PathBuf> {
    let path = match base_dir {
        Some(dir) => dir,
        None => {
            let home_dir = dirs::home_dir()
                .ok_or_else(|| anyhow!("Could not determine home directory"))?;
            home_dir.join(DATA_DIR_NAME)
        }
    };
    fs::create_dir_all(&path)
        .with_context(|| format!("Could not create data directory {}", path.display()))?;
    Ok(path)
}

/// Reads a JSON file. `Ok(None)` when the file does not exist.
pub(crate) fn read_json(path: &Path) -> Result<Option<Value>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => {
            return Err(error).with_context(|| format!("Could not open {}", path.display()))
        }
    };
    let reader = BufReader::new(file);
    let value = serde_json::from_reader(reader)
        .with_context(|| format!("Could not parse {}", path.display()))?;
    Ok(Some(value))
}

/// True when `error` came from malformed JSON rather than from reading the file.
pub(crate) fn is_parse_error(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<serde_json::Error>()
        .is_some_and(|e| e.classify() != Category::Io)
}

pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path).with_context(|| format!("Could not write {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    debug!(path = %path.display(), "saved");
    Ok(())
}

pub(crate) fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
        Err(error) => Err(error).with_context(|| format!("Could not remove {}", path.display())),
    }
}

#[derive(Clone)]
pub struct FilePlannerRepository {
    file_path: PathBuf,
}

impl FilePlannerRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let path = resolve_data_dir(base_dir)?.join(PLANNER_FILE_NAME);
        Ok(FilePlannerRepository { file_path: path })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl PlannerRepository for FilePlannerRepository {
    fn load(&self) -> Result<Option<PlannerSettings>> {
        match read_json(&self.file_path) {
            Ok(Some(raw)) => Ok(Some(PlannerSettings::restore(&raw, PlannerSettings::default()))),
            Ok(None) => Ok(None),
            Err(error) if is_parse_error(&error) => {
                warn!(path = %self.file_path.display(), error = %error, "discarding malformed planner settings");
                remove_file(&self.file_path)?;
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    fn save(&self, settings: &PlannerSettings) -> Result<()> {
        write_json(&self.file_path, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::calendar::MonthRef;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_nothing() {
        let dir = tempdir().unwrap();
        let repo = FilePlannerRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let repo = FilePlannerRepository::new(Some(dir.path().to_path_buf())).unwrap();

        let mut settings = PlannerSettings::with_time_zone("Europe/Moscow".to_string());
        settings.start_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        settings.hour_rate = 200.0;
        settings.target_month = Some(MonthRef::new(2024, 0).unwrap());
        settings
            .extra_shifts
            .add(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), 3.0)
            .unwrap();
        repo.save(&settings).unwrap();

        let raw = fs::read_to_string(repo.file_path()).unwrap();
        assert!(raw.contains("\"hourRate\": 200.0"));
        assert!(raw.contains("\"2024-01-05\": 3.0"));

        assert_eq!(repo.load().unwrap(), Some(settings));
    }

    #[test]
    fn test_unparseable_file_is_removed() {
        let dir = tempdir().unwrap();
        let repo = FilePlannerRepository::new(Some(dir.path().to_path_buf())).unwrap();
        fs::write(repo.file_path(), "{ not json").unwrap();

        assert!(repo.load().unwrap().is_none());
        assert!(!repo.file_path().exists());
    }

    #[test]
    fn test_read_failure_keeps_path() {
        let dir = tempdir().unwrap();
        let repo = FilePlannerRepository::new(Some(dir.path().to_path_buf())).unwrap();
        // Opening succeeds but every read fails with an I/O error.
        fs::create_dir(repo.file_path()).unwrap();

        let error = repo.load().unwrap_err();
        assert!(!is_parse_error(&error));
        assert!(repo.file_path().is_dir());
    }

    #[test]
    fn test_valid_file_survives_repeated_loads() {
        let dir = tempdir().unwrap();
        let repo = FilePlannerRepository::new(Some(dir.path().to_path_buf())).unwrap();
        fs::write(repo.file_path(), r#"{"hourRate": 300}"#).unwrap();

        assert_eq!(repo.load().unwrap().unwrap().hour_rate, 300.0);
        assert_eq!(repo.load().unwrap().unwrap().hour_rate, 300.0);
        assert!(repo.file_path().is_file());
    }

    #[test]
    fn test_parse_errors_are_classified() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(is_parse_error(&read_json(&path).unwrap_err()));
    }

    #[test]
    fn test_resolve_data_dir_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let resolved = resolve_data_dir(Some(nested.clone())).unwrap();
        assert_eq!(resolved, nested);
        assert!(nested.is_dir());
    }
}
