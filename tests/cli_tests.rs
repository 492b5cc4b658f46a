use assert_cmd::Command;
use chrono::{TimeZone, Utc};
use ewa_core::{
    config::{Config, ConfigManager},
    domain::{Member, Money, Transaction, TransactionKind},
    AppState,
};
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::{tempdir, TempDir};

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ewa_core_cli").unwrap();
    cmd.env("EWA_CORE_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

/// Saves a fast-KDF config into `home` and fills the store with a small ledger.
fn seeded_home() -> TempDir {
    let home = tempdir().expect("tempdir");
    let mut config = Config::default();
    config.storage.kdf_iterations = 8;
    config.data_dir = Some(home.path().to_path_buf());
    ConfigManager::with_base_dir(home.path().to_path_buf())
        .unwrap()
        .save(&config)
        .unwrap();

    let at = |m, d| Utc.with_ymd_and_hms(2024, m, d, 9, 0, 0).unwrap();
    let mut state = AppState::open(&config).unwrap();
    let asha = Member::new("Asha Rao", "9876543210", at(1, 1)).with_posting("North Yard");
    let vikram = Member::new("Vikram Das", "9123456789", at(1, 1)).with_posting("Loco Shed");
    state.add_member(asha.clone()).unwrap();
    state.add_member(vikram).unwrap();
    state
        .add_transaction(Transaction::new(TransactionKind::Donation, at(1, 1), Money::from_major(100), "Gift"))
        .unwrap();
    state
        .add_transaction(Transaction::new(TransactionKind::Expense, at(1, 5), Money::from_major(40), "Tea"))
        .unwrap();
    state
        .add_transaction(Transaction::subscription(asha.id, at(1, 10), Money::from_major(50), "Monthly Subscription"))
        .unwrap();
    home
}

#[test]
fn version_prints_package_version() {
    let home = tempdir().unwrap();
    cli(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(contains(format!("ewa_core {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn ledger_prints_running_balance() {
    let home = seeded_home();
    cli(&home)
        .args(["ledger", "2024", "1"])
        .assert()
        .success()
        .stdout(contains("Ledger: January 2024"))
        .stdout(contains("Opening balance: 0.00"))
        .stdout(contains("Monthly Subscription"))
        .stdout(contains("Closing balance: 110.00"));
}

#[test]
fn empty_month_carries_previous_balance() {
    let home = seeded_home();
    cli(&home)
        .args(["ledger", "2024", "2"])
        .assert()
        .success()
        .stdout(contains("No transactions in February 2024."))
        .stdout(contains("Opening balance: 110.00"))
        .stdout(contains("Closing balance: 110.00"));
}

#[test]
fn summary_reports_fund_totals() {
    let home = seeded_home();
    cli(&home)
        .args(["summary", "2024"])
        .assert()
        .success()
        .stdout(contains("Members:        2"))
        .stdout(contains("Total income:   150.00"))
        .stdout(contains("Fund balance:   110.00"));
}

#[test]
fn members_due_lists_unpaid_only() {
    let home = seeded_home();
    cli(&home)
        .args(["members", "--due", "--month", "2024-01"])
        .assert()
        .success()
        .stdout(contains("Vikram Das"))
        .stdout(contains("Asha Rao").not())
        .stdout(contains("0 of 1 paid"));
}

#[test]
fn fresh_home_has_empty_ledger() {
    let home = tempdir().unwrap();
    cli(&home)
        .args(["ledger", "2024", "3"])
        .assert()
        .success()
        .stdout(contains("Closing balance: 0.00"));
}

#[test]
fn bad_arguments_fail_with_usage() {
    let home = tempdir().unwrap();
    cli(&home)
        .args(["ledger", "2024", "13"])
        .assert()
        .failure()
        .stderr(contains("outside 1-12"))
        .stderr(contains("Usage: ewa_core_cli"));
    cli(&home)
        .arg("transfer")
        .assert()
        .failure()
        .stderr(contains("unknown command"));
}
