//! Shared identifier types.
//!
//! All entities use SQLite rowid keys; the aliases keep signatures readable
//! and make it obvious which table an id belongs to.

pub type UserId = i64;
pub type TransactionId = i64;
pub type ExchangeCargoId = i64;
pub type ProblemCargoId = i64;
