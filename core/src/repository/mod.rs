pub mod account;
pub mod file;
pub mod journal;
pub mod traits;

// Re-export
pub use account::FileCredentialStore;
pub use file::{resolve_data_dir, FilePlannerRepository};
pub use journal::FileJournalRepository;
pub use traits::{CredentialStore, JournalRepository, PlannerRepository};
