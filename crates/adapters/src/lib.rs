pub mod fs;
pub mod presenters;
pub mod random;
pub mod snapshot;
pub mod voc;

pub use fs::{DirectoryImageLister, FsFileMover};
pub use presenters::{present_annotation, present_sample_row, present_status, present_subset_counts};
pub use random::SeededRandomSource;
pub use snapshot::JsonSnapshotStore;
pub use voc::VocAnnotationReader;

use std::path::Path;

use image::io::Reader as ImageReader;
use voc_verifier_application::{ApplicationError, ImageDecoder};
use voc_verifier_domain::{is_image_file_name, DecodedImage};

#[derive(Debug, Default)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, ApplicationError> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        if !is_image_file_name(name) {
            return Err(ApplicationError::Decode(format!(
                "unsupported image format: {:?}",
                path
            )));
        }
        if !path.is_file() {
            return Err(ApplicationError::MissingFile(path.to_path_buf()));
        }

        let image = ImageReader::open(path)
            .map_err(|error| ApplicationError::Io(error.to_string()))?
            .with_guessed_format()
            .map_err(|error| ApplicationError::Decode(error.to_string()))?
            .decode()
            .map_err(|error| ApplicationError::Decode(error.to_string()))?
            .to_rgb8();

        let pixels = image
            .pixels()
            .map(|pixel| {
                let [r, g, b] = pixel.0;
                ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
            })
            .collect();

        Ok(DecodedImage {
            width: image.width(),
            height: image.height(),
            pixels,
        })
    }
}
