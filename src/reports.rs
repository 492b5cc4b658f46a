//! Read-only views over the state: dashboard figures, the yearly report and
//! the orderings the boards and roster are shown in.

use chrono::Datelike;
use ewa_domain::{Grievance, GrievanceStatus, Holiday, HolidayKind, Member, Money, Notice, Transaction};
use ewa_ledger::{subscription_paid, Period, Summary};
use serde::Serialize;

/// Headline numbers: member count and fund totals over all time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_members: usize,
    #[serde(flatten)]
    pub summary: Summary,
}

impl DashboardStats {
    pub fn compute(members: &[Member], transactions: &[Transaction]) -> Self {
        Self {
            total_members: members.len(),
            summary: Summary::of(transactions),
        }
    }
}

/// Fund totals and grievance counts for one calendar year. Grievances are
/// counted by the year they were reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyReport {
    pub year: i32,
    #[serde(flatten)]
    pub summary: Summary,
    pub solved: usize,
    pub pending: usize,
    pub total_issues: usize,
}

impl YearlyReport {
    pub fn compute(transactions: &[Transaction], grievances: &[Grievance], year: i32) -> Self {
        let reported: Vec<&Grievance> = grievances
            .iter()
            .filter(|grievance| grievance.date_reported.year() == year)
            .collect();
        let solved = reported
            .iter()
            .filter(|grievance| grievance.status == GrievanceStatus::Resolved)
            .count();
        Self {
            year,
            summary: Summary::for_year(transactions, year),
            solved,
            pending: reported.len() - solved,
            total_issues: reported.len(),
        }
    }
}

/// Income and expense booked in one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    pub period: Period,
    pub income: Money,
    pub expense: Money,
}

/// Twelve entries, January first, for the chart on the dashboard.
pub fn monthly_totals(transactions: &[Transaction], year: i32) -> Vec<MonthlyTotals> {
    let mut months: Vec<MonthlyTotals> = (0..12)
        .filter_map(|month0| Period::new(year, month0).ok())
        .map(|period| MonthlyTotals {
            period,
            income: Money::ZERO,
            expense: Money::ZERO,
        })
        .collect();
    for txn in transactions.iter().filter(|txn| txn.date.year() == year) {
        if let Some(entry) = months.get_mut(Period::of(txn.date).month0() as usize) {
            entry.income += txn.income();
            entry.expense += txn.expense();
        }
    }
    months
}

/// Pending grievances first, newest report first within each group.
pub fn grievance_board(grievances: &[Grievance]) -> Vec<&Grievance> {
    let mut board: Vec<&Grievance> = grievances.iter().collect();
    board.sort_by(|a, b| {
        b.is_pending()
            .cmp(&a.is_pending())
            .then_with(|| b.date_reported.cmp(&a.date_reported))
    });
    board
}

/// Important notices first, newest first within each group.
pub fn notice_board(notices: &[Notice]) -> Vec<&Notice> {
    let mut board: Vec<&Notice> = notices.iter().collect();
    board.sort_by(|a, b| {
        b.is_important
            .cmp(&a.is_important)
            .then_with(|| b.date.cmp(&a.date))
    });
    board
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HolidayCalendar<'a> {
    pub restricted: Vec<&'a Holiday>,
    pub closed: Vec<&'a Holiday>,
}

/// Holidays in date order, split by kind.
pub fn holiday_calendar(holidays: &[Holiday]) -> HolidayCalendar<'_> {
    let mut sorted: Vec<&Holiday> = holidays.iter().collect();
    sorted.sort_by_key(|holiday| holiday.date);
    let (restricted, closed) = sorted
        .into_iter()
        .partition(|holiday| holiday.kind == HolidayKind::Restricted);
    HolidayCalendar { restricted, closed }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaymentFilter {
    #[default]
    All,
    Paid,
    Due,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosterEntry<'a> {
    pub member: &'a Member,
    pub paid: bool,
}

/// Members matching `search` (name or place of posting, case-insensitive)
/// with their subscription status for `period`.
pub fn member_roster<'a>(
    members: &'a [Member],
    transactions: &[Transaction],
    period: Period,
    search: &str,
    filter: PaymentFilter,
) -> Vec<RosterEntry<'a>> {
    let needle = search.trim().to_lowercase();
    members
        .iter()
        .filter(|member| {
            needle.is_empty()
                || member.name.to_lowercase().contains(&needle)
                || member.place_of_posting.to_lowercase().contains(&needle)
        })
        .map(|member| RosterEntry {
            member,
            paid: subscription_paid(transactions, &member.id, period),
        })
        .filter(|entry| match filter {
            PaymentFilter::All => true,
            PaymentFilter::Paid => entry.paid,
            PaymentFilter::Due => !entry.paid,
        })
        .collect()
}
