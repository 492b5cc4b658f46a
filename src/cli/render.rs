//! Plain-text tables for the reporting commands.

use ewa_ledger::PeriodStatement;

use crate::reports::{DashboardStats, RosterEntry, YearlyReport};

const DESCRIPTION_WIDTH: usize = 24;

pub fn statement_table(statement: &PeriodStatement) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<10}  {:<12}  {:<width$}  {:>10}  {:>10}  {:>10}",
        "DATE",
        "TYPE",
        "DESCRIPTION",
        "INCOME",
        "EXPENSE",
        "BALANCE",
        width = DESCRIPTION_WIDTH
    )];
    for row in &statement.rows {
        let txn = &row.transaction;
        lines.push(format!(
            "{:<10}  {:<12}  {:<width$}  {:>10}  {:>10}  {:>10}",
            txn.date.format("%Y-%m-%d"),
            txn.kind.to_string(),
            truncate(&txn.description, DESCRIPTION_WIDTH),
            row.income.to_string(),
            row.expense.to_string(),
            row.balance.to_string(),
            width = DESCRIPTION_WIDTH
        ));
    }
    lines
}

pub fn roster_table(entries: &[RosterEntry<'_>]) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<24}  {:<20}  {:<16}  {:<6}",
        "NAME", "POSTING", "MOBILE", "STATUS"
    )];
    for entry in entries {
        lines.push(format!(
            "{:<24}  {:<20}  {:<16}  {:<6}",
            truncate(&entry.member.name, 24),
            truncate(&entry.member.place_of_posting, 20),
            entry.member.mobile,
            if entry.paid { "Paid" } else { "Due" }
        ));
    }
    lines
}

pub fn summary_lines(stats: &DashboardStats, report: &YearlyReport) -> Vec<String> {
    vec![
        format!("Members:        {}", stats.total_members),
        format!("Total income:   {}", stats.summary.income),
        format!("Total expense:  {}", stats.summary.expense),
        format!("Fund balance:   {}", stats.summary.balance),
        String::new(),
        format!("Year {}", report.year),
        format!("  Income:       {}", report.summary.income),
        format!("  Expense:      {}", report.summary.expense),
        format!("  Balance:      {}", report.summary.balance),
        format!(
            "  Grievances:   {} total, {} solved, {} pending",
            report.total_issues, report.solved, report.pending
        ),
    ]
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}
