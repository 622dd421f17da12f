use std::path::{Path, PathBuf};

use voc_verifier_domain::{
    Annotation, DecodedImage, Sample, SampleLocation, SessionSnapshot, StatusCounts,
};

use crate::ApplicationError;

pub trait ImageLister {
    /// Bare image file names directly inside `dir`, sorted.
    ///
    /// A missing directory is reported as [`ApplicationError::NotFound`].
    fn list_images(&self, dir: &Path) -> Result<Vec<String>, ApplicationError>;
}

pub trait FileMover {
    /// Moves `image_name` and its same-stem annotation from `src_dir` to
    /// `dst_dir`, creating `dst_dir` first.
    fn move_pair(&self, src_dir: &Path, dst_dir: &Path, image_name: &str)
        -> Result<(), ApplicationError>;
}

pub trait AnnotationReader {
    fn read_annotation(&self, path: &Path) -> Result<Annotation, ApplicationError>;
}

pub trait SnapshotStore {
    fn load(&self, path: &Path) -> Result<Option<SessionSnapshot>, ApplicationError>;

    fn save(&self, path: &Path, snapshot: &SessionSnapshot) -> Result<(), ApplicationError>;
}

pub trait RandomSource {
    /// True with probability `probability`.
    fn chance(&mut self, probability: f64) -> bool;

    /// Uniform index in `0..len`; `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, ApplicationError>;
}

/// Everything a renderer needs to put one sample on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub sample: Sample,
    pub location: SampleLocation,
    pub image_path: PathBuf,
    pub annotation: Annotation,
    pub annotation_error: Option<String>,
    pub review_mode: bool,
    pub status: StatusCounts,
}

impl Frame {
    pub fn is_quarantined(&self) -> bool {
        self.location == SampleLocation::Quarantined
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Kept(Sample),
    Restored(Sample),
    Removed(Sample),
    EnteredReview,
    ExitedReview,
    ReviewCompleted,
    Saved(PathBuf),
    Loaded(StatusCounts),
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Self::Kept(sample) => format!("Keeping sample: {}", sample.file_name()),
            Self::Restored(sample) => format!("Restored sample: {}", sample.file_name()),
            Self::Removed(sample) => format!("Removed sample: {}", sample.file_name()),
            Self::EnteredReview => "Entering review mode.".to_string(),
            Self::ExitedReview => "Exiting review mode.".to_string(),
            Self::ReviewCompleted => {
                "Review mode completed. Returning to normal mode.".to_string()
            }
            Self::Saved(path) => format!("State saved to {}", path.display()),
            Self::Loaded(counts) => format!(
                "Loaded state: Processed {} samples, Kept {}, Removed {}",
                counts.processed, counts.kept, counts.removed
            ),
        }
    }
}

pub trait Renderer {
    fn render(&mut self, frame: &Frame) -> Result<(), ApplicationError>;

    fn notify(&mut self, notice: &Notice);
}
