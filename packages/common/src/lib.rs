pub mod image_job;
pub mod storage;

pub use image_job::ImageProcessingJob;
