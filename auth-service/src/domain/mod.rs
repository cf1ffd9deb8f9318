pub mod dto;
pub mod entities;
pub mod events;
pub mod mapper;

pub use entities::{NewUser, RefreshToken, ResetToken, Role, User, UserRole};
