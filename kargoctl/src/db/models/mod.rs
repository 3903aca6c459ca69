pub mod exchange_cargos;
pub mod problem_cargos;
pub mod transactions;
pub mod users;
