pub mod withdraw_service;

pub use withdraw_service::WithdrawService;
