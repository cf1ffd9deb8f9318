pub mod dto;
pub mod entities;
pub mod mapper;

pub use entities::{NewTopup, Topup, UpdateTopup};
