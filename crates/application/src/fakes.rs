//! In-memory ports shared by the controller tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use voc_verifier_domain::{
    annotation_file_name, is_image_file_name, Annotation, BoundingBox, DatasetLayout,
    SessionSnapshot, Subset,
};

use crate::{
    AnnotationReader, ApplicationError, FileMover, Frame, ImageLister, Notice, RandomSource,
    Renderer, SnapshotStore,
};

#[derive(Debug, Clone)]
enum FakeFile {
    Image,
    Annotation(Vec<BoundingBox>),
    Broken,
}

#[derive(Default)]
struct DatasetInner {
    dirs: BTreeMap<PathBuf, BTreeMap<String, FakeFile>>,
    fail_moves: bool,
    moves: usize,
}

/// Directory tree kept in memory; implements listing, moving and reading.
#[derive(Clone, Default)]
pub struct FakeDataset {
    inner: Rc<RefCell<DatasetInner>>,
}

impl FakeDataset {
    pub fn root() -> PathBuf {
        PathBuf::from("/dataset")
    }

    pub fn live(subset: Subset) -> PathBuf {
        DatasetLayout::new(Self::root()).subset_dir(subset)
    }

    pub fn quarantine(subset: Subset) -> PathBuf {
        DatasetLayout::new(Self::root()).quarantine_dir(subset)
    }

    pub fn add_pair(&self, subset: Subset, image_name: &str) {
        self.insert_pair(Self::live(subset), image_name);
    }

    pub fn add_quarantined_pair(&self, subset: Subset, image_name: &str) {
        self.insert_pair(Self::quarantine(subset), image_name);
    }

    pub fn add_empty_subset(&self, subset: Subset) {
        self.inner
            .borrow_mut()
            .dirs
            .entry(Self::live(subset))
            .or_default();
    }

    pub fn set_annotation(&self, subset: Subset, xml_name: &str, boxes: Vec<BoundingBox>) {
        self.inner
            .borrow_mut()
            .dirs
            .entry(Self::live(subset))
            .or_default()
            .insert(xml_name.to_string(), FakeFile::Annotation(boxes));
    }

    pub fn set_broken_annotation(&self, subset: Subset, xml_name: &str) {
        self.inner
            .borrow_mut()
            .dirs
            .entry(Self::live(subset))
            .or_default()
            .insert(xml_name.to_string(), FakeFile::Broken);
    }

    pub fn contains(&self, dir: &Path, name: &str) -> bool {
        self.inner
            .borrow()
            .dirs
            .get(dir)
            .is_some_and(|files| files.contains_key(name))
    }

    pub fn file_count(&self) -> usize {
        self.inner.borrow().dirs.values().map(BTreeMap::len).sum()
    }

    pub fn move_count(&self) -> usize {
        self.inner.borrow().moves
    }

    pub fn fail_moves(&self, fail: bool) {
        self.inner.borrow_mut().fail_moves = fail;
    }

    fn insert_pair(&self, dir: PathBuf, image_name: &str) {
        let mut inner = self.inner.borrow_mut();
        let files = inner.dirs.entry(dir).or_default();
        files.insert(image_name.to_string(), FakeFile::Image);
        files.insert(
            annotation_file_name(image_name),
            FakeFile::Annotation(Vec::new()),
        );
    }
}

impl ImageLister for FakeDataset {
    fn list_images(&self, dir: &Path) -> Result<Vec<String>, ApplicationError> {
        let inner = self.inner.borrow();
        let files = inner
            .dirs
            .get(dir)
            .ok_or_else(|| ApplicationError::NotFound(dir.display().to_string()))?;
        Ok(files
            .keys()
            .filter(|name| is_image_file_name(name))
            .cloned()
            .collect())
    }
}

impl FileMover for FakeDataset {
    fn move_pair(
        &self,
        src_dir: &Path,
        dst_dir: &Path,
        image_name: &str,
    ) -> Result<(), ApplicationError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_moves {
            return Err(ApplicationError::MoveFailure {
                sample: image_name.to_string(),
                message: "simulated failure".to_string(),
            });
        }

        let annotation_name = annotation_file_name(image_name);
        let source = inner
            .dirs
            .get_mut(src_dir)
            .ok_or_else(|| ApplicationError::MissingFile(src_dir.join(image_name)))?;
        let image = source
            .remove(image_name)
            .ok_or_else(|| ApplicationError::MissingFile(src_dir.join(image_name)))?;
        let annotation = source.remove(&annotation_name);

        let destination = inner.dirs.entry(dst_dir.to_path_buf()).or_default();
        destination.insert(image_name.to_string(), image);
        if let Some(annotation) = annotation {
            destination.insert(annotation_name, annotation);
        }
        inner.moves += 1;
        Ok(())
    }
}

impl AnnotationReader for FakeDataset {
    fn read_annotation(&self, path: &Path) -> Result<Annotation, ApplicationError> {
        let inner = self.inner.borrow();
        let file = path
            .parent()
            .and_then(|dir| inner.dirs.get(dir))
            .zip(path.file_name().and_then(|name| name.to_str()))
            .and_then(|(files, name)| files.get(name));
        match file {
            Some(FakeFile::Annotation(objects)) => Ok(Annotation {
                objects: objects.clone(),
            }),
            Some(FakeFile::Broken) => Err(ApplicationError::Parse {
                path: path.to_path_buf(),
                message: "unexpected end of document".to_string(),
            }),
            Some(FakeFile::Image) | None => Err(ApplicationError::MissingFile(path.to_path_buf())),
        }
    }
}

#[derive(Clone, Default)]
pub struct MemorySnapshots {
    stored: Rc<RefCell<Option<SessionSnapshot>>>,
}

impl MemorySnapshots {
    pub fn stored(&self) -> Option<SessionSnapshot> {
        self.stored.borrow().clone()
    }
}

impl SnapshotStore for MemorySnapshots {
    fn load(&self, _path: &Path) -> Result<Option<SessionSnapshot>, ApplicationError> {
        Ok(self.stored.borrow().clone())
    }

    fn save(&self, _path: &Path, snapshot: &SessionSnapshot) -> Result<(), ApplicationError> {
        *self.stored.borrow_mut() = Some(snapshot.clone());
        Ok(())
    }
}

/// Replays queued answers; falls back to `false` and index `0`.
#[derive(Clone, Default)]
pub struct ScriptedRandom {
    chances: Rc<RefCell<VecDeque<bool>>>,
    picks: Rc<RefCell<VecDeque<usize>>>,
}

impl ScriptedRandom {
    pub fn push_chances(&self, values: &[bool]) {
        self.chances.borrow_mut().extend(values.iter().copied());
    }

    pub fn push_picks(&self, values: &[usize]) {
        self.picks.borrow_mut().extend(values.iter().copied());
    }
}

impl RandomSource for ScriptedRandom {
    fn chance(&mut self, _probability: f64) -> bool {
        self.chances.borrow_mut().pop_front().unwrap_or(false)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.picks.borrow_mut().pop_front().unwrap_or(0) % len
    }
}

#[derive(Clone, Default)]
pub struct FakeRenderer {
    frames: Rc<RefCell<Vec<Frame>>>,
    notices: Rc<RefCell<Vec<Notice>>>,
    failing: Rc<Cell<bool>>,
}

impl FakeRenderer {
    /// Frames are still recorded, but `render` reports a decode error.
    pub fn fail_renders(&self, fail: bool) {
        self.failing.set(fail);
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.frames.borrow().last().cloned()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn has_notice(&self, notice: &Notice) -> bool {
        self.notices.borrow().contains(notice)
    }
}

impl Renderer for FakeRenderer {
    fn render(&mut self, frame: &Frame) -> Result<(), ApplicationError> {
        self.frames.borrow_mut().push(frame.clone());
        if self.failing.get() {
            return Err(ApplicationError::Decode(format!(
                "corrupt image: {}",
                frame.image_path.display()
            )));
        }
        Ok(())
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.borrow_mut().push(notice.clone());
    }
}
