pub mod saldo_service;
pub use saldo_service::SaldoService;
