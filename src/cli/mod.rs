//! Reporting commands behind the `ewa_core_cli` binary.

pub mod output;
mod render;

use chrono::Utc;
use ewa_config::{default_data_dir, ConfigManager};
use ewa_ledger::Period;

use crate::errors::{AppError, Result};
use crate::reports::{member_roster, DashboardStats, PaymentFilter, YearlyReport};
use crate::state::AppState;
use crate::utils::build_info;

pub const USAGE: &str = "Usage: ewa_core_cli <command>\n\
Commands:\n  \
summary [year]                          Fund totals and the yearly report\n  \
ledger <year> <month>                   Monthly statement (month 1-12)\n  \
members [--paid|--due] [--month YYYY-MM] [search]\n                                          \
Roster with subscription status\n  \
version                                 Build information";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Summary { year: Option<i32> },
    Ledger { period: Period },
    Members {
        search: String,
        filter: PaymentFilter,
        period: Option<Period>,
    },
    Version,
    Help,
}

impl Command {
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let Some(command) = args.next() else {
            return Ok(Command::Help);
        };
        match command.as_str() {
            "summary" => {
                let year = args.next().map(|raw| parse_year(&raw)).transpose()?;
                Ok(Command::Summary { year })
            }
            "ledger" => {
                let (Some(year), Some(month)) = (args.next(), args.next()) else {
                    return Err(AppError::Invalid("ledger needs <year> <month>".into()));
                };
                let period = parse_period(parse_year(&year)?, &month)?;
                Ok(Command::Ledger { period })
            }
            "members" => parse_members(args),
            "version" | "--version" | "-V" => Ok(Command::Version),
            "help" | "--help" | "-h" => Ok(Command::Help),
            other => Err(AppError::Invalid(format!("unknown command `{other}`"))),
        }
    }
}

fn parse_members(mut args: impl Iterator<Item = String>) -> Result<Command> {
    let mut filter = PaymentFilter::All;
    let mut period = None;
    let mut terms = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--paid" => filter = PaymentFilter::Paid,
            "--due" => filter = PaymentFilter::Due,
            "--month" => {
                let raw = args
                    .next()
                    .ok_or_else(|| AppError::Invalid("--month needs YYYY-MM".into()))?;
                let (year, month) = raw
                    .split_once('-')
                    .ok_or_else(|| AppError::Invalid(format!("`{raw}` is not YYYY-MM")))?;
                period = Some(parse_period(parse_year(year)?, month)?);
            }
            _ => terms.push(arg),
        }
    }
    Ok(Command::Members {
        search: terms.join(" "),
        filter,
        period,
    })
}

fn parse_year(raw: &str) -> Result<i32> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Invalid(format!("`{raw}` is not a year")))
}

fn parse_period(year: i32, month: &str) -> Result<Period> {
    let month: u32 = month
        .trim()
        .parse()
        .map_err(|_| AppError::Invalid(format!("`{month}` is not a month")))?;
    if !(1..=12).contains(&month) {
        return Err(AppError::Invalid(format!("month {month} is outside 1-12")));
    }
    Ok(Period::new(year, month - 1)?)
}

/// Parses the process arguments and runs the command.
pub fn run_cli() -> Result<()> {
    let command = Command::parse(std::env::args().skip(1))?;
    execute(command)
}

pub fn execute(command: Command) -> Result<()> {
    match command {
        Command::Help => {
            output::info(USAGE);
            Ok(())
        }
        Command::Version => {
            let meta = build_info::current();
            output::info(meta.summary_line());
            output::info(format!("rustc: {}", meta.rustc));
            Ok(())
        }
        Command::Summary { year } => {
            let state = open_state()?;
            let year = year.unwrap_or_else(|| Period::of(Utc::now()).year());
            show_summary(&state, year);
            Ok(())
        }
        Command::Ledger { period } => {
            let state = open_state()?;
            show_ledger(&state, period);
            Ok(())
        }
        Command::Members {
            search,
            filter,
            period,
        } => {
            let state = open_state()?;
            let period = period.unwrap_or_else(|| Period::of(Utc::now()));
            show_members(&state, &search, filter, period);
            Ok(())
        }
    }
}

fn open_state() -> Result<AppState> {
    let manager = ConfigManager::with_base_dir(default_data_dir())?;
    let config = manager.load()?;
    tracing::debug!(config = %manager.config_path().display(), "loaded configuration");
    AppState::open(&config)
}

fn show_summary(state: &AppState, year: i32) {
    let stats = DashboardStats::compute(state.members(), state.transactions());
    let report = YearlyReport::compute(state.transactions(), state.grievances(), year);
    output::section("Association summary");
    for line in render::summary_lines(&stats, &report) {
        output::info(line);
    }
}

fn show_ledger(state: &AppState, period: Period) {
    let statement = state.statement(period);
    output::section(format!("Ledger: {period}"));
    output::info(format!(
        "Opening balance: {}",
        output::amount(statement.opening_balance)
    ));
    if statement.is_empty() {
        output::warning(format!("No transactions in {period}."));
    } else {
        for line in render::statement_table(&statement) {
            output::info(line);
        }
        output::info(format!(
            "Total income: {}  Total expense: {}",
            statement.total_income, statement.total_expense
        ));
    }
    output::info(format!(
        "Closing balance: {}",
        output::amount(statement.closing_balance)
    ));
}

fn show_members(state: &AppState, search: &str, filter: PaymentFilter, period: Period) {
    let roster = member_roster(state.members(), state.transactions(), period, search, filter);
    output::section(format!("Members: subscriptions for {period}"));
    if roster.is_empty() {
        output::warning("No members match.");
        return;
    }
    for line in render::roster_table(&roster) {
        output::info(line);
    }
    let paid = roster.iter().filter(|entry| entry.paid).count();
    output::success(format!("{paid} of {} paid", roster.len()));
}
