use std::fs;
use std::io;
use std::path::Path;

use tracing::{error, info, warn};
use voc_verifier_application::{ApplicationError, FileMover};
use voc_verifier_domain::annotation_file_name;

/// Moves image/annotation pairs on the local filesystem.
#[derive(Debug, Default)]
pub struct FsFileMover;

impl FileMover for FsFileMover {
    fn move_pair(
        &self,
        src_dir: &Path,
        dst_dir: &Path,
        image_name: &str,
    ) -> Result<(), ApplicationError> {
        let image_src = src_dir.join(image_name);
        if !image_src.is_file() {
            return Err(ApplicationError::MissingFile(image_src));
        }

        fs::create_dir_all(dst_dir).map_err(|error| move_failure(image_name, &error))?;

        let image_dst = dst_dir.join(image_name);
        move_file(&image_src, &image_dst).map_err(|error| move_failure(image_name, &error))?;

        let annotation_name = annotation_file_name(image_name);
        let annotation_src = src_dir.join(&annotation_name);
        if !annotation_src.is_file() {
            warn!(
                path = %annotation_src.display(),
                "annotation missing, moved image only"
            );
            return Ok(());
        }

        let annotation_dst = dst_dir.join(&annotation_name);
        if let Err(move_error) = move_file(&annotation_src, &annotation_dst) {
            // Put the image back so the pair is not split across directories.
            if let Err(rollback_error) = move_file(&image_dst, &image_src) {
                error!(
                    image = %image_dst.display(),
                    %rollback_error,
                    "could not move image back, pair is now split"
                );
            }
            return Err(move_failure(image_name, &move_error));
        }

        info!(
            from = %src_dir.display(),
            to = %dst_dir.display(),
            image = image_name,
            "moved sample pair"
        );
        Ok(())
    }
}

fn move_file(src: &Path, dst: &Path) -> io::Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        // rename cannot cross filesystems
        Err(_) if src.is_file() => {
            fs::copy(src, dst)?;
            fs::remove_file(src)
        }
        Err(error) => Err(error),
    }
}

fn move_failure(image_name: &str, error: &io::Error) -> ApplicationError {
    ApplicationError::MoveFailure {
        sample: image_name.to_string(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn moves_image_and_annotation_creating_destination() {
        let dir = TempDir::new().expect("tempdir");
        let src = dir.path().join("train");
        let dst = dir.path().join("defective").join("train");
        fs::create_dir_all(&src).expect("mkdir");
        fs::write(src.join("a.jpg"), b"img").expect("write");
        fs::write(src.join("a.xml"), b"<annotation/>").expect("write");

        FsFileMover.move_pair(&src, &dst, "a.jpg").expect("move");

        assert!(dst.join("a.jpg").is_file());
        assert!(dst.join("a.xml").is_file());
        assert!(!src.join("a.jpg").exists());
        assert!(!src.join("a.xml").exists());
        assert_eq!(fs::read(dst.join("a.jpg")).expect("read"), b"img");
    }

    #[test]
    fn missing_image_is_reported_without_side_effects() {
        let dir = TempDir::new().expect("tempdir");
        let src = dir.path().join("train");
        let dst = dir.path().join("defective").join("train");
        fs::create_dir_all(&src).expect("mkdir");

        let result = FsFileMover.move_pair(&src, &dst, "ghost.jpg");

        assert!(matches!(result, Err(ApplicationError::MissingFile(_))));
        assert!(!dst.exists());
    }

    #[test]
    fn failed_annotation_move_puts_the_image_back() {
        let dir = TempDir::new().expect("tempdir");
        let src = dir.path().join("train");
        let dst = dir.path().join("defective").join("train");
        fs::create_dir_all(&src).expect("mkdir");
        fs::write(src.join("a.jpg"), b"img").expect("write");
        fs::write(src.join("a.xml"), b"<annotation/>").expect("write");
        fs::create_dir_all(dst.join("a.xml")).expect("block annotation destination");

        let result = FsFileMover.move_pair(&src, &dst, "a.jpg");

        assert!(matches!(result, Err(ApplicationError::MoveFailure { .. })));
        assert_eq!(fs::read(src.join("a.jpg")).expect("image back"), b"img");
        assert!(src.join("a.xml").is_file());
        assert!(!dst.join("a.jpg").exists());
    }

    #[test]
    fn image_without_annotation_still_moves() {
        let dir = TempDir::new().expect("tempdir");
        let src = dir.path().join("validation");
        let dst = dir.path().join("defective").join("validation");
        fs::create_dir_all(&src).expect("mkdir");
        fs::write(src.join("b.png"), b"img").expect("write");

        FsFileMover.move_pair(&src, &dst, "b.png").expect("move");

        assert!(dst.join("b.png").is_file());
        assert!(!src.join("b.png").exists());
    }
}
