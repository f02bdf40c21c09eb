mod calendar;
mod format;
mod prompt;
mod tui;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use shiftplan_core::model::calendar::format_date_key;
use shiftplan_core::time::{parse_date_input, parse_month_input};
use shiftplan_core::usecase::journal_month::JournalMonthUseCase;
use shiftplan_core::validate::{parse_shift_count, parse_shift_hours};
use shiftplan_core::{
    parse_assignments, resolve_data_dir, AccountService, FileCredentialStore, FileJournalRepository,
    FilePlannerRepository, JournalService, PlannerService, SettingsUpdate, SystemClock, SETTING_KEYS,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::format::format_number;

#[derive(Parser)]
#[command(name = "shiftplan")]
#[command(about = "Shift schedule and earnings planner", long_about = None)]
struct Cli {
    /// Directory holding planner.json, the profile and journals
    #[arg(long, global = true, env = "SHIFTPLAN_HOME")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show the month calendar with shifts and earnings
    Plan {
        /// Month to show (YYYY-MM); becomes the default for later runs
        #[arg(long)]
        month: Option<String>,
    },
    /// Change planner settings (usage: set sch:5/2 rate:250 start:2024-01-01)
    Set {
        /// Settings as key:value; keys may be shortened (schedule, work, rest, start, hours, rate, month, tz)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// Manage extra hours on top of the schedule
    Extra {
        #[command(subcommand)]
        action: ExtraAction,
    },
    /// Show or change the time zone used to determine "today"
    Tz {
        /// Use this machine's time zone
        #[arg(long, conflicts_with = "zone")]
        auto: bool,
        /// IANA zone id, for example Europe/Moscow
        zone: Option<String>,
    },
    /// Shift journal for the local profile
    Journal {
        #[command(subcommand)]
        action: JournalAction,
    },
    /// Open the Terminal User Interface
    Tui,
}

#[derive(clap::Subcommand)]
enum ExtraAction {
    /// Add extra hours to a date (accumulates)
    Add { date: String, hours: String },
    /// Remove all extra hours of a date
    Rm { date: String },
    /// List recorded extra hours
    List,
}

#[derive(clap::Subcommand)]
enum JournalAction {
    /// Create the local profile and log in (PIN is prompted, or read from SHIFTPLAN_PIN)
    Register { username: String },
    /// Log in (PIN is prompted, or read from SHIFTPLAN_PIN)
    Login { username: String },
    Logout,
    /// Delete the profile and its journal
    Delete {
        #[arg(long)]
        yes: bool,
    },
    /// Show a month of the journal
    Show {
        #[arg(long)]
        month: Option<String>,
    },
    /// Set the shift counts of a day (0 0 clears it)
    Day {
        date: String,
        regular: String,
        #[arg(default_value = "0")]
        extra: String,
    },
    /// Clear a day
    Clear { date: String },
    /// Show or change shift lengths
    Settings {
        #[arg(long)]
        base: Option<String>,
        #[arg(long)]
        extra: Option<String>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shiftplan=warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn command_name(command: &Option<Commands>) -> &'static str {
    match command {
        Some(Commands::Plan { .. }) => "plan",
        Some(Commands::Set { .. }) => "set",
        Some(Commands::Extra { .. }) => "extra",
        Some(Commands::Tz { .. }) => "tz",
        Some(Commands::Journal { .. }) => "journal",
        Some(Commands::Tui) | None => "tui",
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir)?;
    debug!(command = command_name(&cli.command), data_dir = %data_dir.display(), "dispatching");

    let planner = PlannerService::new(FilePlannerRepository::new(Some(data_dir.clone()))?, SystemClock);

    match cli.command {
        Some(Commands::Plan { month }) => {
            let month = month.as_deref().map(parse_month_input).transpose()?;
            let report = planner.compute(month)?;
            calendar::print_plan(&report);
        }
        Some(Commands::Set { args }) => {
            let assignments = parse_assignments(&args, SETTING_KEYS)?;
            let update = SettingsUpdate::parse(&assignments)?;
            let settings = planner.update(&update)?;
            println!(
                "Settings saved: schedule {}, {} h/shift, rate {}, time zone {}",
                settings.pattern()?.label(),
                format_number(settings.hours_per_shift),
                format_number(settings.hour_rate),
                settings.time_zone
            );
        }
        Some(Commands::Extra { action }) => match action {
            ExtraAction::Add { date, hours } => {
                let date = parse_date_input(&date)?;
                let hours = parse_shift_hours("extra shift hours", &hours)?;
                let total = planner.add_extra_shift(date, hours)?;
                println!("{}: {} extra hours", format_date_key(date), format_number(total));
            }
            ExtraAction::Rm { date } => {
                let date = parse_date_input(&date)?;
                if planner.remove_extra_shift(date)? {
                    println!("Removed extra hours on {}", format_date_key(date));
                } else {
                    println!("No extra hours on {}", format_date_key(date));
                }
            }
            ExtraAction::List => {
                calendar::print_extra_shifts(&planner.settings()?.extra_shifts);
            }
        },
        Some(Commands::Tz { auto, zone }) => {
            if auto {
                println!("Time zone set to {}", planner.use_system_time_zone()?);
            } else if let Some(zone) = zone {
                let update = SettingsUpdate::parse(&[("tz".to_string(), zone)])?;
                let settings = planner.update(&update)?;
                println!("Time zone set to {}", settings.time_zone);
            } else {
                println!("{}", planner.settings()?.time_zone);
            }
        }
        Some(Commands::Journal { action }) => run_journal(action, data_dir)?,
        Some(Commands::Tui) | None => {
            tui::run(planner)?;
        }
    }

    Ok(())
}

fn run_journal(action: JournalAction, data_dir: PathBuf) -> Result<()> {
    let accounts = AccountService::new(
        FileCredentialStore::new(Some(data_dir.clone()))?,
        FileJournalRepository::new(Some(data_dir.clone()))?,
        SystemClock,
    );

    match action {
        JournalAction::Register { username } => {
            let (pin, repeat) = match std::env::var(prompt::PIN_ENV) {
                Ok(pin) => (pin.clone(), pin),
                Err(_) => (prompt::read_secret("PIN")?, prompt::read_secret("Repeat PIN")?),
            };
            let account = accounts.register(&username, &pin, &repeat)?;
            println!("Profile {} created, you are logged in.", account.username);
        }
        JournalAction::Login { username } => {
            let pin = prompt::read_pin("PIN")?;
            let account = accounts.login(&username, &pin)?;
            println!("Logged in as {}.", account.username);
        }
        JournalAction::Logout => {
            accounts.logout()?;
            println!("Logged out.");
        }
        JournalAction::Delete { yes } => {
            if !yes {
                bail!("This deletes the profile and all journal entries; re-run with --yes to confirm");
            }
            let account = accounts.delete_account()?;
            println!("Profile {} deleted.", account.username);
        }
        entry_action => {
            let account = accounts.require_current()?;
            let journal = JournalService::new(FileJournalRepository::new(Some(data_dir))?, SystemClock, account.username);
            run_journal_entries(entry_action, &journal)?;
        }
    }

    Ok(())
}

fn run_journal_entries(
    action: JournalAction,
    journal: &JournalService<FileJournalRepository, SystemClock>,
) -> Result<()> {
    match action {
        JournalAction::Show { month } => {
            let month = month.as_deref().map(parse_month_input).transpose()?;
            let view = JournalMonthUseCase::new(journal).view(month)?;
            calendar::print_journal(journal.username(), &view);
        }
        JournalAction::Day { date, regular, extra } => {
            let date = parse_date_input(&date)?;
            let entry = journal.set_day(date, parse_shift_count(&regular)?, parse_shift_count(&extra)?)?;
            if entry.is_empty() {
                println!("{} cleared", format_date_key(date));
            } else {
                println!(
                    "{}: {} regular, {} extra",
                    format_date_key(date),
                    entry.regular,
                    entry.extra
                );
            }
        }
        JournalAction::Clear { date } => {
            let date = parse_date_input(&date)?;
            journal.clear_day(date)?;
            println!("{} cleared", format_date_key(date));
        }
        JournalAction::Settings { base, extra } => {
            let base = base.as_deref().map(|h| parse_shift_hours("base shift hours", h)).transpose()?;
            let extra = extra.as_deref().map(|h| parse_shift_hours("extra shift hours", h)).transpose()?;
            let settings = if base.is_none() && extra.is_none() {
                journal.data()?.settings
            } else {
                journal.update_settings(base, extra)?
            };
            println!(
                "Regular shift: {} h, extra shift: {} h",
                format_number(settings.base_shift_hours),
                format_number(settings.extra_shift_hours)
            );
        }
        JournalAction::Register { .. }
        | JournalAction::Login { .. }
        | JournalAction::Logout
        | JournalAction::Delete { .. } => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names() {
        let parse = |args: &[&str]| Cli::try_parse_from(args).unwrap().command;
        assert_eq!(command_name(&parse(&["shiftplan"])), "tui");
        assert_eq!(command_name(&parse(&["shiftplan", "plan", "--month", "2024-01"])), "plan");
        assert_eq!(command_name(&parse(&["shiftplan", "extra", "list"])), "extra");
    }

    #[test]
    fn test_pin_is_not_positional() {
        assert!(Cli::try_parse_from(["shiftplan", "journal", "login", "alice", "1234"]).is_err());
        let cli = Cli::try_parse_from(["shiftplan", "journal", "register", "alice"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Journal { action: JournalAction::Register { username } }) if username == "alice"
        ));
    }
}
