//! Running-balance ledger views.

use ewa_domain::{Money, Transaction};
use serde::Serialize;

use crate::Period;

/// A transaction annotated with the fund balance before and after it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRow {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub prev_balance: Money,
    pub income: Money,
    pub expense: Money,
    pub balance: Money,
}

/// Builds the full ledger in ascending date order.
///
/// Transactions sharing a timestamp keep their input order. Row `i` opens at
/// the balance row `i - 1` closed with; the first row opens at zero.
pub fn compute_full_ledger(transactions: &[Transaction]) -> Vec<LedgerRow> {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by_key(|txn| txn.date);

    let mut running = Money::ZERO;
    ordered
        .into_iter()
        .map(|txn| {
            let prev_balance = running;
            let income = txn.income();
            let expense = txn.expense();
            running = prev_balance + income - expense;
            LedgerRow {
                transaction: txn.clone(),
                prev_balance,
                income,
                expense,
                balance: running,
            }
        })
        .collect()
}

/// Rows of an ascending ledger that fall inside `period`.
pub fn filter_period(full_ledger: &[LedgerRow], period: Period) -> &[LedgerRow] {
    let start = period.start();
    let from = full_ledger.partition_point(|row| row.transaction.date < start);
    let len = full_ledger[from..].partition_point(|row| period.contains(row.transaction.date));
    &full_ledger[from..from + len]
}

/// Balance at the first instant of `period`.
///
/// Correct for empty periods too: it then equals the net of everything dated
/// strictly before the period starts, i.e. the previous closing balance.
pub fn opening_balance(transactions: &[Transaction], period: Period) -> Money {
    let full = compute_full_ledger(transactions);
    match filter_period(&full, period).first() {
        Some(row) => row.prev_balance,
        None => balance_before(transactions, period),
    }
}

/// Balance after the last transaction of `period`; the opening balance when
/// the period has no transactions.
pub fn closing_balance(transactions: &[Transaction], period: Period) -> Money {
    let full = compute_full_ledger(transactions);
    match filter_period(&full, period).last() {
        Some(row) => row.balance,
        None => balance_before(transactions, period),
    }
}

fn balance_before(transactions: &[Transaction], period: Period) -> Money {
    let start = period.start();
    let (income, expense) = transactions
        .iter()
        .filter(|txn| txn.date < start)
        .fold((Money::ZERO, Money::ZERO), |(income, expense), txn| {
            (income + txn.income(), expense + txn.expense())
        });
    income - expense
}

/// Monthly statement: the rows of one period with its opening and closing
/// balances and in-period totals. This is what ledger reports render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStatement {
    pub period: Period,
    pub opening_balance: Money,
    pub closing_balance: Money,
    pub total_income: Money,
    pub total_expense: Money,
    pub rows: Vec<LedgerRow>,
}

impl PeriodStatement {
    pub fn build(transactions: &[Transaction], period: Period) -> Self {
        let full = compute_full_ledger(transactions);
        let rows = filter_period(&full, period).to_vec();
        let opening_balance = match rows.first() {
            Some(row) => row.prev_balance,
            None => balance_before(transactions, period),
        };
        let closing_balance = rows.last().map(|row| row.balance).unwrap_or(opening_balance);
        let total_income = rows.iter().map(|row| row.income).sum();
        let total_expense = rows.iter().map(|row| row.expense).sum();
        tracing::debug!(
            period = %period,
            rows = rows.len(),
            opening = %opening_balance,
            closing = %closing_balance,
            "built period statement"
        );
        Self {
            period,
            opening_balance,
            closing_balance,
            total_income,
            total_expense,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ewa_domain::{RecordId, TransactionKind};

    fn txn(id: &str, day: u32, amount: i64, kind: TransactionKind) -> Transaction {
        let mut txn = Transaction::new(
            kind,
            Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            Money::from_major(amount),
            id,
        );
        txn.id = RecordId::from(id);
        txn
    }

    #[test]
    fn filter_period_returns_contiguous_slice() {
        let mut entries = vec![
            txn("a", 3, 10, TransactionKind::Donation),
            txn("b", 20, 5, TransactionKind::Expense),
        ];
        let mut feb = txn("c", 1, 7, TransactionKind::Donation);
        feb.date = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        entries.push(feb);

        let full = compute_full_ledger(&entries);
        let january = filter_period(&full, Period::new(2024, 0).unwrap());
        let ids: Vec<_> = january.iter().map(|row| row.transaction.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(filter_period(&full, Period::new(2023, 11).unwrap()).is_empty());
    }

    #[test]
    fn statement_totals_cover_only_the_period() {
        let entries = vec![
            txn("a", 1, 100, TransactionKind::Donation),
            txn("b", 5, 40, TransactionKind::Expense),
            txn("c", 10, 50, TransactionKind::Subscription),
        ];
        let statement = PeriodStatement::build(&entries, Period::new(2024, 0).unwrap());
        assert_eq!(statement.opening_balance, Money::ZERO);
        assert_eq!(statement.closing_balance, Money::from_major(110));
        assert_eq!(statement.total_income, Money::from_major(150));
        assert_eq!(statement.total_expense, Money::from_major(40));
    }

    #[test]
    fn rows_serialize_flat() {
        let entries = vec![txn("a", 1, 100, TransactionKind::Donation)];
        let row = serde_json::to_value(&compute_full_ledger(&entries)[0]).unwrap();
        assert_eq!(row["id"], "a");
        assert_eq!(row["type"], "DONATION");
        assert_eq!(row["prevBalance"], 0);
        assert_eq!(row["balance"], 100);
    }
}
