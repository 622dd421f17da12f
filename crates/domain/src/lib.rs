mod annotation;
mod error;
mod image;
mod layout;
mod sample;
mod session;

pub use annotation::{Annotation, BoundingBox};
pub use error::DomainError;
pub use image::DecodedImage;
pub use layout::{DatasetLayout, QUARANTINE_DIR_NAME, SNAPSHOT_FILE_NAME};
pub use sample::{annotation_file_name, is_image_file_name, Sample, SampleLocation, Subset};
pub use session::{SessionSnapshot, StatusCounts};
