pub mod caller;
pub mod county;
pub mod error;
pub mod event;
pub mod text_gen;
