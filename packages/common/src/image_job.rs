use serde::{Deserialize, Serialize};

use crate::storage::ImageCategory;

/// Queue that image post-processing jobs are published to.
pub const IMAGE_PROCESSING_QUEUE: &str = "image.processing.background";

/// Message published after an image lands in the object store, telling the
/// background processor where to find it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProcessingJob {
    pub file_name: String,
    pub bucket_name: String,
}

impl ImageProcessingJob {
    pub fn new(file_name: impl Into<String>, category: ImageCategory) -> Self {
        Self {
            file_name: file_name.into(),
            bucket_name: category.bucket_name().to_string(),
        }
    }
}
