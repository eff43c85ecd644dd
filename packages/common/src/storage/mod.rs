mod error;
mod name;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use filesystem::FilesystemMediaStore;
pub use name::validate_media_name;
pub use traits::{BoxReader, MediaStore};
