use anyhow::Result;

use crate::model::account::Account;
use crate::model::journal::JournalData;
use crate::model::planner::PlannerSettings;

pub trait PlannerRepository {
    /// Stored settings, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<PlannerSettings>>;
    fn save(&self, settings: &PlannerSettings) -> Result<()>;
}

pub trait JournalRepository {
    /// Normalized journal of `username`; empty when none is stored.
    fn load(&self, username: &str) -> Result<JournalData>;
    fn save(&self, username: &str, data: &JournalData) -> Result<()>;
    fn remove(&self, username: &str) -> Result<()>;
}

/// Local profile and login session of this data directory.
pub trait CredentialStore {
    fn load_account(&self) -> Result<Option<Account>>;
    fn save_account(&self, account: &Account) -> Result<()>;
    fn remove_account(&self) -> Result<()>;
    /// Username of the logged-in profile, if any.
    fn active_session(&self) -> Result<Option<String>>;
    fn activate_session(&self, username: &str) -> Result<()>;
    fn clear_session(&self) -> Result<()>;
}
