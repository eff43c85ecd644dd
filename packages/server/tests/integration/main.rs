mod common;

mod county;
mod event;
mod text;
