use std::path::PathBuf;

use anyhow::Result;
use tracing::warn;

use crate::model::journal::JournalData;
use crate::repository::file::{is_parse_error, read_json, remove_file, resolve_data_dir, write_json};
use crate::repository::traits::JournalRepository;

const JOURNAL_DIR_NAME: &str = "journal";

/// One `journal/<username>.json` file per profile.
#[derive(Clone)]
pub struct FileJournalRepository {
    dir: PathBuf,
}

impl FileJournalRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let dir = resolve_data_dir(base_dir)?.join(JOURNAL_DIR_NAME);
        Ok(FileJournalRepository { dir })
    }

    fn file_path(&self, username: &str) -> PathBuf {
        self.dir.join(format!("{}.json", username))
    }
}

impl JournalRepository for FileJournalRepository {
    fn load(&self, username: &str) -> Result<JournalData> {
        let path = self.file_path(username);
        match read_json(&path) {
            Ok(Some(raw)) => Ok(JournalData::normalize(&raw)),
            Ok(None) => Ok(JournalData::default()),
            Err(error) if is_parse_error(&error) => {
                warn!(username, error = %error, "journal file is malformed, starting empty");
                Ok(JournalData::default())
            }
            Err(error) => Err(error),
        }
    }

    fn save(&self, username: &str, data: &JournalData) -> Result<()> {
        write_json(&self.file_path(username), data)
    }

    fn remove(&self, username: &str) -> Result<()> {
        remove_file(&self.file_path(username))
    }
}
