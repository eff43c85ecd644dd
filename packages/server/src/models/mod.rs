pub mod auth;
pub mod county;
pub mod event;
pub mod shared;
pub mod text;
pub mod upload;
pub mod user;
