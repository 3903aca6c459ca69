//! HTTP handlers, grouped by resource.

pub mod auth;
pub mod barcodes;
pub mod exchange_cargos;
pub mod problem_cargos;
pub mod transactions;
pub mod users;
