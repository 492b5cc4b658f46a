//! Transaction list views.

use std::cmp::Reverse;

use ewa_domain::{Transaction, TransactionKind};

/// Income/expense filter offered on the transaction list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionFilter {
    #[default]
    All,
    /// Subscriptions and donations.
    Income,
    Expense,
}

impl TransactionFilter {
    pub fn matches(self, txn: &Transaction) -> bool {
        match self {
            TransactionFilter::All => true,
            TransactionFilter::Income => txn.kind != TransactionKind::Expense,
            TransactionFilter::Expense => txn.kind == TransactionKind::Expense,
        }
    }
}

/// Transactions passing `filter`, newest first.
pub fn list_newest_first(transactions: &[Transaction], filter: TransactionFilter) -> Vec<&Transaction> {
    let mut listed: Vec<&Transaction> = transactions
        .iter()
        .filter(|txn| filter.matches(txn))
        .collect();
    listed.sort_by_key(|txn| Reverse(txn.date));
    listed
}
