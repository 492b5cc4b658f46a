use chrono::{TimeZone, Utc};
use ewa_core::{
    config::{Config, StorageConfig},
    domain::{
        BotMessage, BotSender, ChatMessage, Grievance, GrievanceStatus, Holiday, HolidayKind,
        ManagerCreds, MediaType, Member, Money, Notice, RecordId, Transaction, TransactionKind,
    },
    ledger::{LedgerError, Period},
    store::{KeyValueMedium, MemoryMedium, Repositories, StoreError},
    AppError, AppState,
};
use tempfile::tempdir;

fn storage() -> StorageConfig {
    StorageConfig {
        kdf_iterations: 4,
        quota_bytes: None,
        ..StorageConfig::default()
    }
}

fn state_over(medium: &MemoryMedium) -> AppState {
    let repos = Repositories::new(Box::new(medium.clone()), &storage()).expect("repos");
    AppState::initialize(repos)
}

fn at(y: i32, m: u32, d: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
}

#[test]
fn mutations_survive_reinitialization() {
    let medium = MemoryMedium::new();
    let mut state = state_over(&medium);

    let member = Member::new("Asha Rao", "98765 43210", at(2024, 1, 1)).with_posting("North Yard");
    state.add_member(member.clone()).unwrap();
    state
        .add_transaction(Transaction::subscription(
            member.id.clone(),
            at(2024, 1, 5),
            Money::from_major(50),
            "Monthly Subscription",
        ))
        .unwrap();
    state
        .add_notice(Notice::new("AGM", "Friday 5pm", true, at(2024, 1, 6)))
        .unwrap();
    state
        .add_holiday(Holiday::new(
            "Republic Day",
            chrono::NaiveDate::from_ymd_opt(2024, 1, 26).unwrap(),
            HolidayKind::Closed,
        ))
        .unwrap();
    state
        .add_bot_message(BotMessage::new(BotSender::User, "What is my leave quota?", at(2024, 1, 7)))
        .unwrap();
    state.set_meeting_link("https://meet.example.org/ewa").unwrap();

    let reopened = state_over(&medium);
    assert_eq!(reopened.members(), state.members());
    assert_eq!(reopened.transactions(), state.transactions());
    assert_eq!(reopened.notices(), state.notices());
    assert_eq!(reopened.holidays(), state.holidays());
    assert_eq!(reopened.bot_messages(), state.bot_messages());
    assert_eq!(reopened.meeting_link(), "https://meet.example.org/ewa");
    assert_eq!(reopened.summary().balance, Money::from_major(50));
}

#[test]
fn invalid_transaction_leaves_state_untouched() {
    let medium = MemoryMedium::new();
    let mut state = state_over(&medium);

    let orphan = Transaction::new(
        TransactionKind::Subscription,
        at(2024, 2, 1),
        Money::from_major(50),
        "No member",
    );
    let err = state.add_transaction(orphan).unwrap_err();
    assert!(matches!(err, AppError::Ledger(LedgerError::Validation(_))));
    assert!(state.transactions().is_empty());
    assert_eq!(medium.read("mdu_ewa_transactions").unwrap(), None);
}

#[test]
fn second_subscription_in_a_month_is_rejected() {
    let mut state = state_over(&MemoryMedium::new());
    let member = Member::new("Vikram Das", "9123456789", at(2024, 1, 1));
    state.add_member(member.clone()).unwrap();
    let pay = |day| {
        Transaction::subscription(member.id.clone(), at(2024, 3, day), Money::from_major(50), "Sub")
    };
    state.add_transaction(pay(2)).unwrap();
    let err = state.add_transaction(pay(20)).unwrap_err();
    assert!(matches!(err, AppError::Ledger(LedgerError::DuplicateSubscription(_))));
    assert_eq!(state.transactions().len(), 1);
}

#[test]
fn subscription_for_unknown_member_is_not_found() {
    let mut state = state_over(&MemoryMedium::new());
    let txn = Transaction::subscription(
        RecordId::new("ghost"),
        at(2024, 3, 2),
        Money::from_major(50),
        "Sub",
    );
    assert!(matches!(state.add_transaction(txn), Err(AppError::NotFound(_))));
}

#[test]
fn member_update_and_delete() {
    let mut state = state_over(&MemoryMedium::new());
    let member = Member::new("Asha Rao", "9876543210", at(2024, 1, 1));
    state.add_member(member.clone()).unwrap();

    let mut renamed = member.clone();
    renamed.name = "Asha R.".into();
    state.update_member(renamed).unwrap();
    assert_eq!(state.member(&member.id).unwrap().name, "Asha R.");

    let removed = state.delete_member(&member.id).unwrap();
    assert_eq!(removed.id, member.id);
    assert!(state.members().is_empty());
    assert!(matches!(state.delete_member(&member.id), Err(AppError::NotFound(_))));
    assert!(matches!(state.add_member(Member::new(" ", "1", at(2024, 1, 1))), Err(AppError::Invalid(_))));
}

#[test]
fn grievance_resolves_exactly_once() {
    let mut state = state_over(&MemoryMedium::new());
    let member = Member::new("Asha Rao", "9876543210", at(2024, 1, 1));
    state.add_member(member.clone()).unwrap();
    let grievance = Grievance::report(&member, "Transfer pending", "Workshop", None, at(2024, 4, 1));
    let id = grievance.id.clone();
    state.add_grievance(grievance).unwrap();

    assert!(matches!(
        state.resolve_grievance(&id, "   ", at(2024, 4, 2)),
        Err(AppError::Invalid(_))
    ));
    state.resolve_grievance(&id, "Escalated to HR", at(2024, 4, 3)).unwrap();
    let resolved = state.grievances()[0].clone();
    assert_eq!(resolved.status, GrievanceStatus::Resolved);
    assert_eq!(resolved.action_taken.as_deref(), Some("Escalated to HR"));
    assert_eq!(resolved.date_resolved, Some(at(2024, 4, 3)));

    assert!(matches!(
        state.resolve_grievance(&id, "Again", at(2024, 4, 4)),
        Err(AppError::Invalid(_))
    ));

    let mut reopened = resolved.clone();
    reopened.status = GrievanceStatus::Pending;
    assert!(matches!(state.update_grievance(reopened), Err(AppError::Invalid(_))));
    assert_eq!(state.grievances()[0].status, GrievanceStatus::Resolved);
}

#[test]
fn grievance_keeps_reporter_name_after_rename() {
    let mut state = state_over(&MemoryMedium::new());
    let member = Member::new("Asha Rao", "9876543210", at(2024, 1, 1));
    state.add_member(member.clone()).unwrap();
    state
        .add_grievance(Grievance::report(&member, "Pay slip", "Accounts", None, at(2024, 4, 1)))
        .unwrap();

    let mut renamed = member;
    renamed.name = "Asha Verma".into();
    state.update_member(renamed).unwrap();
    assert_eq!(state.grievances()[0].member_name, "Asha Rao");
}

#[test]
fn oversized_media_is_rejected_before_mutation() {
    let medium = MemoryMedium::new();
    let mut state = state_over(&medium).with_media_limit(16);

    let clip = ChatMessage::with_media("Asha", "A".repeat(17), MediaType::Audio, at(2024, 5, 1));
    let err = state.add_chat_message(clip).unwrap_err();
    assert!(matches!(err, AppError::PayloadTooLarge { size: 17, limit: 16 }));
    assert!(state.chat_messages().is_empty());
    assert_eq!(medium.read("mdu_ewa_chat").unwrap(), None);

    let long_text = ChatMessage::text("Asha", "t".repeat(64), at(2024, 5, 1));
    state.add_chat_message(long_text).unwrap();
    assert_eq!(state.chat_messages().len(), 1);
}

#[test]
fn failed_persist_keeps_new_value_in_memory() {
    let medium = MemoryMedium::with_quota(Some(64));
    let repos = Repositories::new(Box::new(medium.clone()), &StorageConfig::plaintext()).unwrap();
    let mut state = AppState::initialize(repos);

    let notice = Notice::new("Long", "x".repeat(200), false, at(2024, 6, 1));
    let err = state.add_notice(notice.clone()).unwrap_err();
    assert!(err.is_unpersisted());
    assert!(matches!(err, AppError::Store(StoreError::QuotaExceeded { .. })));
    assert_eq!(state.notices(), std::slice::from_ref(&notice));
    assert_eq!(medium.read("mdu_ewa_notices").unwrap(), None);
}

#[test]
fn notices_and_holidays_can_be_deleted() {
    let mut state = state_over(&MemoryMedium::new());
    let notice = Notice::new("Old", "Expired", false, at(2024, 1, 1));
    let holiday = Holiday::new(
        "Holi",
        chrono::NaiveDate::from_ymd_opt(2024, 3, 25).unwrap(),
        HolidayKind::Restricted,
    );
    state.add_notice(notice.clone()).unwrap();
    state.add_holiday(holiday.clone()).unwrap();

    assert_eq!(state.delete_notice(&notice.id).unwrap(), notice);
    assert_eq!(state.delete_holiday(&holiday.id).unwrap(), holiday);
    assert!(state.notices().is_empty());
    assert!(state.holidays().is_empty());
}

#[test]
fn manager_creds_default_then_persist() {
    let medium = MemoryMedium::new();
    let mut state = state_over(&medium);
    assert_eq!(state.manager_creds(), &ManagerCreds::new("Magic$Mountain", "918144372669"));

    state.set_manager_creds(ManagerCreds::new("river-stone", "919000000001")).unwrap();
    let reopened = state_over(&medium);
    assert_eq!(reopened.manager_creds().password, "river-stone");
}

#[test]
fn statement_for_empty_month_carries_balance() {
    let mut state = state_over(&MemoryMedium::new());
    let member = Member::new("Asha Rao", "9876543210", at(2024, 1, 1));
    state.add_member(member.clone()).unwrap();
    state
        .add_transaction(Transaction::new(TransactionKind::Donation, at(2024, 1, 1), Money::from_major(100), "Gift"))
        .unwrap();
    state
        .add_transaction(Transaction::new(TransactionKind::Expense, at(2024, 1, 5), Money::from_major(40), "Tea"))
        .unwrap();
    state
        .add_transaction(Transaction::subscription(member.id, at(2024, 1, 10), Money::from_major(50), "Sub"))
        .unwrap();

    let february = state.statement(Period::new(2024, 1).unwrap());
    assert!(february.is_empty());
    assert_eq!(february.opening_balance, Money::from_major(110));
    assert_eq!(february.closing_balance, Money::from_major(110));
    let balances: Vec<Money> = state.ledger().iter().map(|row| row.balance).collect();
    assert_eq!(balances, vec![Money::from_major(100), Money::from_major(60), Money::from_major(110)]);
}

#[test]
fn open_uses_directory_under_data_dir() {
    let dir = tempdir().expect("tempdir");
    let mut config = Config::default();
    config.storage = storage();
    config.data_dir = Some(dir.path().to_path_buf());

    {
        let mut state = AppState::open(&config).expect("open");
        state
            .add_member(Member::new("Asha Rao", "9876543210", at(2024, 1, 1)))
            .unwrap();
    }
    assert!(dir.path().join("store").join("mdu_ewa_members.dat").exists());
    let state = AppState::open(&config).expect("reopen");
    assert_eq!(state.members().len(), 1);
}

#[test]
fn grievance_update_cannot_resolve_or_rewrite_reporter() {
    let mut state = state_over(&MemoryMedium::new());
    let member = Member::new("Asha Rao", "9876543210", at(2024, 1, 1));
    state.add_member(member.clone()).unwrap();
    let grievance = Grievance::report(&member, "Transfer pending", "Workshop", None, at(2024, 4, 1));
    state.add_grievance(grievance.clone()).unwrap();

    let mut shortcut = grievance.clone();
    shortcut.status = GrievanceStatus::Resolved;
    assert!(matches!(state.update_grievance(shortcut), Err(AppError::Invalid(_))));
    let stored = &state.grievances()[0];
    assert_eq!(stored.status, GrievanceStatus::Pending);
    assert_eq!(stored.action_taken, None);
    assert_eq!(stored.date_resolved, None);

    let mut edited = grievance.clone();
    edited.description = "Transfer order delayed".into();
    edited.addressed_to = Some("Divisional Office".into());
    edited.member_id = RecordId::new("someone-else");
    edited.member_name = "Someone Else".into();
    edited.date_reported = at(2030, 1, 1);
    state.update_grievance(edited).unwrap();

    let stored = &state.grievances()[0];
    assert_eq!(stored.description, "Transfer order delayed");
    assert_eq!(stored.addressed_to.as_deref(), Some("Divisional Office"));
    assert_eq!(stored.member_id, member.id);
    assert_eq!(stored.member_name, "Asha Rao");
    assert_eq!(stored.date_reported, at(2024, 4, 1));
}

#[test]
fn resolved_grievance_keeps_its_trail_on_update() {
    let mut state = state_over(&MemoryMedium::new());
    let member = Member::new("Asha Rao", "9876543210", at(2024, 1, 1));
    state.add_member(member.clone()).unwrap();
    let grievance = Grievance::report(&member, "Pay slip", "Accounts", None, at(2024, 4, 1));
    state.add_grievance(grievance.clone()).unwrap();
    state.resolve_grievance(&grievance.id, "Corrected", at(2024, 4, 2)).unwrap();

    let mut edited = state.grievances()[0].clone();
    edited.formation = "Payroll".into();
    edited.action_taken = None;
    edited.date_resolved = None;
    state.update_grievance(edited).unwrap();

    let stored = &state.grievances()[0];
    assert_eq!(stored.formation, "Payroll");
    assert_eq!(stored.action_taken.as_deref(), Some("Corrected"));
    assert_eq!(stored.date_resolved, Some(at(2024, 4, 2)));
}

#[test]
fn member_update_applies_the_same_checks_as_add() {
    let mut state = state_over(&MemoryMedium::new());
    let member = Member::new("Asha Rao", "9876543210", at(2024, 1, 1));
    state.add_member(member.clone()).unwrap();

    let mut blank_name = member.clone();
    blank_name.name = "  ".into();
    assert!(matches!(state.update_member(blank_name), Err(AppError::Invalid(_))));

    let mut blank_mobile = member.clone();
    blank_mobile.mobile = String::new();
    assert!(matches!(state.update_member(blank_mobile), Err(AppError::Invalid(_))));

    assert_eq!(state.members(), std::slice::from_ref(&member));
}
