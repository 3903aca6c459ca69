//! Repository handlers, one per aggregate.

pub mod exchange_cargos;
pub mod problem_cargos;
pub mod repository;
pub mod transactions;
pub mod users;

pub use exchange_cargos::ExchangeCargos;
pub use problem_cargos::ProblemCargos;
pub use repository::Repository;
pub use transactions::Transactions;
pub use users::Users;
