use thiserror::Error;

/// Rejected user input. The message is shown to the user as is.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid number of work days '{0}': expected a whole number of at least 1")]
    WorkDays(String),

    #[error("invalid number of rest days '{0}': expected a whole number of at least 1")]
    RestDays(String),

    #[error("invalid {field} '{value}': expected hours greater than 0 and at most 24")]
    Hours { field: &'static str, value: String },

    #[error("invalid hourly rate '{0}': expected a number of 0 or more")]
    HourRate(String),

    #[error("invalid shift count '{0}': expected a whole number of 0 or more")]
    ShiftCount(String),

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    Date(String),

    #[error("invalid month '{0}': expected YYYY-MM")]
    Month(String),

    #[error("month index {0} is out of range 0..=11")]
    MonthIndex(u32),

    #[error("unknown time zone '{0}'")]
    TimeZone(String),

    #[error("invalid schedule '{0}': expected W/R (for example 2/2) or 'custom'")]
    Schedule(String),

    #[error("unknown setting '{0}'")]
    UnknownSetting(String),
}

/// Failures of the local profile flow.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthError {
    #[error("a profile already exists on this device, log in instead")]
    AlreadyRegistered,

    #[error("no profile found, register first")]
    NotRegistered,

    #[error("username must be 3-32 characters of latin letters, digits, '.', '_' or '-'")]
    InvalidUsername,

    #[error("PIN must be 4 to 64 characters long")]
    InvalidPin,

    #[error("PIN confirmation does not match")]
    PinMismatch,

    #[error("username not found on this device")]
    UnknownUser,

    #[error("wrong PIN")]
    WrongPin,

    #[error("not logged in")]
    NoSession,
}
