pub mod auth;
pub mod county;
pub mod event;
pub mod health;
pub mod text;
pub mod upload;
pub mod user;
