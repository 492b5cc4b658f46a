//! Ledger entries recorded by the treasurer.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::common::*;
use crate::money::Money;

/// A single ledger entry. Entries are append-only once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: RecordId,
    pub date: DateTime<Utc>,
    pub amount: Money,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub description: String,
    /// Paying member; present only for subscriptions.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub member_id: Option<RecordId>,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        date: DateTime<Utc>,
        amount: Money,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            date,
            amount,
            kind,
            description: non_blank_description(description.into(), kind),
            member_id: None,
        }
    }

    /// Subscription paid by `member_id`.
    pub fn subscription(
        member_id: RecordId,
        date: DateTime<Utc>,
        amount: Money,
        description: impl Into<String>,
    ) -> Self {
        let mut txn = Self::new(TransactionKind::Subscription, date, amount, description);
        txn.member_id = Some(member_id);
        txn
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Amount credited to the fund (zero for expenses).
    pub fn income(&self) -> Money {
        if self.is_expense() {
            Money::ZERO
        } else {
            self.amount
        }
    }

    /// Amount debited from the fund (zero for subscriptions and donations).
    pub fn expense(&self) -> Money {
        if self.is_expense() {
            self.amount
        } else {
            Money::ZERO
        }
    }

    /// Net effect on the running balance.
    pub fn net(&self) -> Money {
        self.income() - self.expense()
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("txn:{} [{} {}]", self.id, self.kind, self.amount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Subscription,
    Expense,
    Donation,
}

impl TransactionKind {
    /// Description used when the entry form leaves it blank.
    pub fn default_description(self) -> &'static str {
        match self {
            TransactionKind::Subscription => "Monthly Subscription",
            TransactionKind::Expense => "Expense",
            TransactionKind::Donation => "Donation",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Subscription => "SUBSCRIPTION",
            TransactionKind::Expense => "EXPENSE",
            TransactionKind::Donation => "DONATION",
        };
        f.write_str(label)
    }
}

fn non_blank_description(description: String, kind: TransactionKind) -> String {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        kind.default_description().to_string()
    } else {
        trimmed.to_string()
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|value| !value.trim().is_empty())
        .map(RecordId::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_blank_member_id_reads_as_absent() {
        let json = r#"{
            "id": "1704067200000",
            "date": "2024-01-05T00:00:00.000Z",
            "amount": 40,
            "type": "EXPENSE",
            "description": "Stationery",
            "memberId": ""
        }"#;
        let txn: Transaction = serde_json::from_str(json).expect("legacy transaction");
        assert_eq!(txn.member_id, None);
        assert_eq!(txn.kind, TransactionKind::Expense);
        assert_eq!(txn.amount, Money::from_major(40));

        let written = serde_json::to_value(&txn).unwrap();
        assert!(written.get("memberId").is_none());
        assert_eq!(written["type"], "EXPENSE");
    }

    #[test]
    fn income_and_expense_split_by_kind() {
        let date = "2024-01-01T00:00:00Z".parse().unwrap();
        let donation = Transaction::new(TransactionKind::Donation, date, Money::from_major(100), "Gift");
        let expense = Transaction::new(TransactionKind::Expense, date, Money::from_major(40), "Hall");
        assert_eq!(donation.income(), Money::from_major(100));
        assert_eq!(donation.expense(), Money::ZERO);
        assert_eq!(expense.net(), Money::from_major(-40));
    }

    #[test]
    fn blank_description_falls_back_to_kind_default() {
        let date = "2024-01-01T00:00:00Z".parse().unwrap();
        let sub = Transaction::subscription(RecordId::from("m1"), date, Money::from_major(50), "  ");
        assert_eq!(sub.description, "Monthly Subscription");
        let expense = Transaction::new(TransactionKind::Expense, date, Money::from_major(5), "");
        assert_eq!(expense.description, "Expense");
    }
}
