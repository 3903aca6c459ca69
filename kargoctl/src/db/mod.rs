//! Database layer: row models, repository handlers and error
//! classification. Handlers own the SQL; nothing above this layer writes
//! queries directly.

pub mod errors;
pub mod handlers;
pub mod models;
