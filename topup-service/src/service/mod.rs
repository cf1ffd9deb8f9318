pub mod topup_service;

pub use topup_service::TopupService;
