use std::path::PathBuf;

use thiserror::Error;
use voc_verifier_domain::{DomainError, Sample, Subset};

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("missing file: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    #[error("failed to move {sample}: {message}")]
    MoveFailure { sample: String, message: String },
    #[error("io error: {0}")]
    Io(String),
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("dataset unavailable: {0}")]
    DatasetUnavailable(String),
    #[error("no samples available in train or validation")]
    NoSamples,
    #[error("no more images in {0} set")]
    ExhaustedSubset(Subset),
    #[error("no previous sample available")]
    EmptyHistory,
    #[error("no previous sample in review mode")]
    EmptyReviewList,
    #[error("no removed samples to review")]
    NothingToReview,
    #[error("sample {0} is not in the removed list, skipping restoration")]
    StaleReviewEntry(Sample),
    #[error("samples cannot be removed while reviewing the quarantine")]
    ReviewModeActive,
    #[error("sample {0} is already quarantined")]
    AlreadyQuarantined(Sample),
    #[error("no sample is currently selected")]
    NoCurrentSample,
}

impl ApplicationError {
    /// Only running out of samples ends an interactive session; everything
    /// else leaves the state untouched and lets the reviewer carry on.
    pub fn ends_session(&self) -> bool {
        matches!(self, Self::ExhaustedSubset(_))
    }
}
