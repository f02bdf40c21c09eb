use anyhow::Result;
use tracing::info;

use crate::error::AuthError;
use crate::model::account::{validate_pin, validate_username, Account};
use crate::model::journal::JournalData;
use crate::repository::{CredentialStore, JournalRepository};
use crate::time::Clock;

/// Registration and login for the single local profile of a data directory.
pub struct AccountService<S: CredentialStore, J: JournalRepository, C: Clock> {
    store: S,
    journals: J,
    clock: C,
}

impl<S: CredentialStore, J: JournalRepository, C: Clock> AccountService<S, J, C> {
    pub fn new(store: S, journals: J, clock: C) -> Self {
        Self {
            store,
            journals,
            clock,
        }
    }

    pub fn register(&self, username: &str, pin: &str, repeat: &str) -> Result<Account> {
        let username = username.trim();
        validate_username(username)?;
        validate_pin(pin)?;
        if pin != repeat {
            return Err(AuthError::PinMismatch.into());
        }
        if self.store.load_account()?.is_some() {
            return Err(AuthError::AlreadyRegistered.into());
        }

        let account = Account::new(username.to_string(), pin, self.clock.now());
        self.store.save_account(&account)?;
        self.journals.save(username, &JournalData::default())?;
        self.store.activate_session(username)?;
        info!(username, "profile registered");
        Ok(account)
    }

    pub fn login(&self, username: &str, pin: &str) -> Result<Account> {
        let account = self.store.load_account()?.ok_or(AuthError::NotRegistered)?;
        if account.username != username.trim() {
            return Err(AuthError::UnknownUser.into());
        }
        if !account.verify_pin(pin) {
            return Err(AuthError::WrongPin.into());
        }
        self.store.activate_session(&account.username)?;
        Ok(account)
    }

    pub fn logout(&self) -> Result<()> {
        self.store.clear_session()
    }

    /// The logged-in account. A session naming a profile that no longer
    /// exists counts as logged out.
    pub fn current(&self) -> Result<Option<Account>> {
        let Some(username) = self.store.active_session()? else {
            return Ok(None);
        };
        Ok(self
            .store
            .load_account()?
            .filter(|account| account.username == username))
    }

    /// Like [`current`](Self::current) but fails when nobody is logged in.
    pub fn require_current(&self) -> Result<Account> {
        Ok(self.current()?.ok_or(AuthError::NoSession)?)
    }

    /// Removes the logged-in profile together with its journal.
    pub fn delete_account(&self) -> Result<Account> {
        let account = self.require_current()?;
        self.journals.remove(&account.username)?;
        self.store.remove_account()?;
        self.store.clear_session()?;
        info!(username = %account.username, "profile deleted");
        Ok(account)
    }
}
