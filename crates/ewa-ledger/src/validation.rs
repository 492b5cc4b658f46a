//! Admission rules for new ledger entries.

use ewa_domain::{RecordId, Transaction, TransactionKind};

use crate::{LedgerError, Period};

/// Checks `candidate` against the existing ledger before it is recorded.
///
/// Amounts must be positive and descriptions non-blank. A subscription names
/// the paying member, other entries name none, and a member pays at most one
/// subscription per calendar month.
pub fn validate_transaction(
    existing: &[Transaction],
    candidate: &Transaction,
) -> Result<(), LedgerError> {
    if !candidate.amount.is_positive() {
        return Err(LedgerError::Validation(format!(
            "amount must be positive, got {}",
            candidate.amount
        )));
    }
    if candidate.description.trim().is_empty() {
        return Err(LedgerError::Validation("description is required".into()));
    }
    if existing.iter().any(|txn| txn.id == candidate.id) {
        return Err(LedgerError::Validation(format!(
            "transaction id {} already recorded",
            candidate.id
        )));
    }

    match (candidate.kind, candidate.member_id.as_ref()) {
        (TransactionKind::Subscription, None) => Err(LedgerError::Validation(
            "a subscription must name the paying member".into(),
        )),
        (TransactionKind::Subscription, Some(member)) => {
            let period = Period::of(candidate.date);
            if subscription_paid(existing, member, period) {
                tracing::warn!(member = %member, period = %period, "rejecting second subscription");
                return Err(LedgerError::DuplicateSubscription(format!(
                    "member {member} already paid for {period}"
                )));
            }
            Ok(())
        }
        (kind, Some(_)) => Err(LedgerError::Validation(format!(
            "{kind} entries cannot reference a member"
        ))),
        (_, None) => Ok(()),
    }
}

/// Whether `member_id` has a subscription dated inside `period`.
pub fn subscription_paid(transactions: &[Transaction], member_id: &RecordId, period: Period) -> bool {
    transactions.iter().any(|txn| {
        txn.kind == TransactionKind::Subscription
            && txn.member_id.as_ref() == Some(member_id)
            && period.contains(txn.date)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ewa_domain::Money;

    fn subscription(member: &str, month: u32) -> Transaction {
        Transaction::subscription(
            RecordId::from(member),
            Utc.with_ymd_and_hms(2024, month, 10, 0, 0, 0).unwrap(),
            Money::from_major(50),
            "Monthly Subscription",
        )
    }

    #[test]
    fn rejects_non_positive_amount() {
        let mut txn = subscription("m1", 1);
        txn.amount = Money::ZERO;
        assert!(matches!(
            validate_transaction(&[], &txn),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn expense_cannot_carry_member() {
        let mut txn = subscription("m1", 1);
        txn.kind = TransactionKind::Expense;
        assert!(validate_transaction(&[], &txn).is_err());
        txn.member_id = None;
        assert!(validate_transaction(&[], &txn).is_ok());
    }

    #[test]
    fn subscription_requires_member() {
        let mut txn = subscription("m1", 1);
        txn.member_id = None;
        let err = validate_transaction(&[], &txn).unwrap_err();
        assert!(err.to_string().contains("paying member"), "{err}");
    }

    #[test]
    fn second_subscription_in_same_month_is_rejected() {
        let existing = vec![subscription("m1", 1)];
        let again = subscription("m1", 1);
        assert!(matches!(
            validate_transaction(&existing, &again),
            Err(LedgerError::DuplicateSubscription(_))
        ));
        assert!(validate_transaction(&existing, &subscription("m1", 2)).is_ok());
        assert!(validate_transaction(&existing, &subscription("m2", 1)).is_ok());
    }
}
