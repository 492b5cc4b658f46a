//! Headline fund figures.

use chrono::Datelike;
use ewa_domain::{Money, Transaction, TransactionKind};
use serde::Serialize;

/// Income, expense and net balance over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub income: Money,
    pub expense: Money,
    pub balance: Money,
}

impl Summary {
    /// Totals over every transaction regardless of date.
    pub fn of(transactions: &[Transaction]) -> Self {
        Self::from_iter(transactions.iter())
    }

    /// Totals over transactions dated within calendar `year` (UTC).
    pub fn for_year(transactions: &[Transaction], year: i32) -> Self {
        Self::from_iter(transactions.iter().filter(|txn| txn.date.year() == year))
    }

    fn from_iter<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> Self {
        let mut summary = Summary::default();
        for txn in transactions {
            match txn.kind {
                TransactionKind::Subscription | TransactionKind::Donation => {
                    summary.income += txn.amount
                }
                TransactionKind::Expense => summary.expense += txn.amount,
            }
        }
        summary.balance = summary.income - summary.expense;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn year_filter_ignores_other_years() {
        let inside = Transaction::new(
            TransactionKind::Donation,
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            Money::from_major(25),
            "Gift",
        );
        let outside = Transaction::new(
            TransactionKind::Expense,
            Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap(),
            Money::from_major(10),
            "Tea",
        );
        let summary = Summary::for_year(&[inside, outside], 2024);
        assert_eq!(summary.income, Money::from_major(25));
        assert_eq!(summary.expense, Money::ZERO);
        assert_eq!(summary.balance, Money::from_major(25));
    }
}
