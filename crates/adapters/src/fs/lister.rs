use std::path::Path;

use voc_verifier_application::{ApplicationError, ImageLister};
use voc_verifier_domain::is_image_file_name;
use walkdir::WalkDir;

#[derive(Debug, Default)]
pub struct DirectoryImageLister;

impl ImageLister for DirectoryImageLister {
    fn list_images(&self, dir: &Path) -> Result<Vec<String>, ApplicationError> {
        if !dir.is_dir() {
            return Err(ApplicationError::NotFound(format!(
                "directory does not exist: {}",
                dir.display()
            )));
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|error| ApplicationError::Io(error.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if is_image_file_name(name) {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}
