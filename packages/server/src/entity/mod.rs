pub mod blob;
pub mod county;
pub mod event;
pub mod event_like;
pub mod user;
pub mod user_profile;
