use std::path::{Path, PathBuf};

use crate::{Sample, SampleLocation, Subset};

pub const QUARANTINE_DIR_NAME: &str = "defective";
pub const SNAPSHOT_FILE_NAME: &str = "verifier_state.json";

/// Resolves every path the verifier touches below one dataset root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn subset_dir(&self, subset: Subset) -> PathBuf {
        self.root.join(subset.as_str())
    }

    pub fn quarantine_dir(&self, subset: Subset) -> PathBuf {
        self.root.join(QUARANTINE_DIR_NAME).join(subset.as_str())
    }

    pub fn dir_for(&self, subset: Subset, location: SampleLocation) -> PathBuf {
        match location {
            SampleLocation::Live => self.subset_dir(subset),
            SampleLocation::Quarantined => self.quarantine_dir(subset),
        }
    }

    pub fn image_path(&self, sample: &Sample, location: SampleLocation) -> PathBuf {
        self.dir_for(sample.subset(), location)
            .join(sample.file_name())
    }

    pub fn annotation_path(&self, sample: &Sample, location: SampleLocation) -> PathBuf {
        self.dir_for(sample.subset(), location)
            .join(sample.annotation_name())
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.root.join(SNAPSHOT_FILE_NAME)
    }
}
