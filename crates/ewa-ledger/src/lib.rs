//! ewa-ledger
//!
//! Running-balance ledger, reporting periods and fund summaries.
//! Depends on ewa-domain. Pure computation: no storage, no terminal I/O.

pub mod error;
pub mod ledger;
pub mod listing;
pub mod period;
pub mod summary;
pub mod validation;

pub use error::LedgerError;
pub use ledger::*;
pub use listing::*;
pub use period::Period;
pub use summary::*;
pub use validation::*;
