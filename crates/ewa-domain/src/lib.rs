//! ewa-domain
//!
//! Pure records kept by the association (members, ledger entries, grievances,
//! bulletins, chat logs, credentials). No I/O, no storage. Only data types,
//! their wire shape, and small invariant-preserving helpers.

pub mod bulletin;
pub mod chat;
pub mod common;
pub mod credentials;
pub mod grievance;
pub mod member;
pub mod money;
pub mod transaction;

pub use bulletin::*;
pub use chat::*;
pub use common::*;
pub use credentials::*;
pub use grievance::*;
pub use member::*;
pub use money::*;
pub use transaction::*;
