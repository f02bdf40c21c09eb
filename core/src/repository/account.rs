use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::account::Account;
use crate::repository::file::{read_json, remove_file, resolve_data_dir, write_json};
use crate::repository::traits::CredentialStore;

const ACCOUNT_FILE_NAME: &str = "account.json";
const SESSION_FILE_NAME: &str = "session.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Session {
    username: String,
}

#[derive(Clone)]
pub struct FileCredentialStore {
    account_path: PathBuf,
    session_path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let dir = resolve_data_dir(base_dir)?;
        Ok(FileCredentialStore {
            account_path: dir.join(ACCOUNT_FILE_NAME),
            session_path: dir.join(SESSION_FILE_NAME),
        })
    }
}

impl CredentialStore for FileCredentialStore {
    fn load_account(&self) -> Result<Option<Account>> {
        read_json(&self.account_path)?
            .map(serde_json::from_value)
            .transpose()
            .context("Stored account is malformed")
    }

    fn save_account(&self, account: &Account) -> Result<()> {
        write_json(&self.account_path, account)
    }

    fn remove_account(&self) -> Result<()> {
        remove_file(&self.account_path)
    }

    fn active_session(&self) -> Result<Option<String>> {
        let session: Option<Session> = read_json(&self.session_path)?
            .map(serde_json::from_value)
            .transpose()
            .context("Stored session is malformed")?;
        Ok(session.map(|s| s.username))
    }

    fn activate_session(&self, username: &str) -> Result<()> {
        write_json(
            &self.session_path,
            &Session {
                username: username.to_string(),
            },
        )
    }

    fn clear_session(&self) -> Result<()> {
        remove_file(&self.session_path)
    }
}
