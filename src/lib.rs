#![doc(test(attr(deny(warnings))))]

//! ewa_core
//!
//! Application layer of the association manager: the in-memory state
//! container over the encrypted repositories, sign-in rules, report views and
//! the reporting CLI. Ledger arithmetic lives in `ewa-ledger`, persistence in
//! `ewa-store`.

pub mod access;
pub mod cli;
pub mod errors;
pub mod reports;
pub mod state;
pub mod utils;

pub use access::{AccessError, AccessRules, OtpChallenge, Role, Session, VerifiedManager};
pub use errors::AppError;
pub use state::AppState;

pub use ewa_config as config;
pub use ewa_domain as domain;
pub use ewa_ledger as ledger;
pub use ewa_store as store;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("EWA Core tracing initialized.");
    });
}
