mod category;
mod error;
mod traits;

#[cfg(feature = "object-storage")]
pub mod s3;

pub use category::ImageCategory;
pub use error::StorageError;
pub use traits::{ObjectStore, object_key};
