pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;
pub mod validate;

pub use error::{AuthError, ValidationError};
pub use input::{expand_key, parse_assignments};
pub use model::calendar::MonthRef;
pub use model::pattern::{CyclePattern, SchedulePreset};
pub use model::planner::{PlannerSettings, SettingsUpdate, SETTING_KEYS};
pub use repository::{
    resolve_data_dir, CredentialStore, FileCredentialStore, FileJournalRepository,
    FilePlannerRepository, JournalRepository, PlannerRepository,
};
pub use service::account_service::AccountService;
pub use service::dto::{DayKind, DayResult, MonthAggregate, MonthPlan, PlannerReport};
pub use service::evaluator::{evaluate, ScheduleConfig};
pub use service::journal_service::JournalService;
pub use service::planner_service::PlannerService;
pub use time::{Clock, SystemClock};
