use std::path::PathBuf;

use tracing::{debug, info, warn};
use voc_verifier_domain::{
    Annotation, DatasetLayout, Sample, SampleLocation, SessionSnapshot, StatusCounts, Subset,
};

use crate::{
    AnnotationReader, ApplicationError, DispatchOutcome, FileMover, Frame, ImageLister,
    InitializeSessionCommand, Notice, RandomSource, Renderer, SessionCommand, SessionOptions,
    SessionState, SnapshotStore,
};

const RESELECT_SUBSET_PROBABILITY: f64 = 0.5;

pub struct SessionPorts {
    pub lister: Box<dyn ImageLister>,
    pub mover: Box<dyn FileMover>,
    pub annotations: Box<dyn AnnotationReader>,
    pub snapshots: Box<dyn SnapshotStore>,
    pub random: Box<dyn RandomSource>,
    pub renderer: Box<dyn Renderer>,
}

pub struct SessionController {
    layout: DatasetLayout,
    options: SessionOptions,
    lister: Box<dyn ImageLister>,
    mover: Box<dyn FileMover>,
    annotations: Box<dyn AnnotationReader>,
    snapshots: Box<dyn SnapshotStore>,
    random: Box<dyn RandomSource>,
    renderer: Box<dyn Renderer>,
    state: SessionState,
}

impl SessionController {
    /// Builds the session state for a dataset and shows the first sample.
    ///
    /// On success `history` holds at least one sample.
    pub fn initialize(
        command: InitializeSessionCommand,
        ports: SessionPorts,
        options: SessionOptions,
    ) -> Result<Self, ApplicationError> {
        if command.dataset_root.as_os_str().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "dataset path must not be empty".to_string(),
            ));
        }

        let mut controller = Self {
            layout: DatasetLayout::new(command.dataset_root),
            options,
            lister: ports.lister,
            mover: ports.mover,
            annotations: ports.annotations,
            snapshots: ports.snapshots,
            random: ports.random,
            renderer: ports.renderer,
            state: SessionState::default(),
        };

        let snapshot = if command.resume {
            controller.read_snapshot()?
        } else {
            None
        };
        let resumed = snapshot.is_some();
        match snapshot {
            Some(snapshot) => controller.apply_snapshot(snapshot),
            None if command.resume => info!(
                path = %controller.layout.snapshot_path().display(),
                "no saved session found, starting from the beginning"
            ),
            None => {}
        }

        controller.state.removed_samples = controller.scan_quarantine()?;
        controller.state.total_count = controller.count_live_samples()?;
        if controller.state.total_count == 0 {
            return Err(ApplicationError::NoSamples);
        }

        info!(
            dataset = %controller.layout.root().display(),
            total = controller.state.total_count,
            removed = controller.state.removed_samples.len(),
            resumed,
            "session initialized"
        );
        if resumed {
            let status = controller.status();
            controller.renderer.notify(&Notice::Loaded(status));
        }

        controller.select_next()?;
        if let Err(error) = controller.render_current() {
            warn!(%error, "first sample could not be displayed");
        }
        Ok(controller)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    pub fn status(&self) -> StatusCounts {
        StatusCounts {
            total: self.state.total_count,
            processed: self.state.processed_count,
            kept: self.state.kept_count,
            removed: self.state.removed_samples.len(),
        }
    }

    pub fn dispatch(
        &mut self,
        command: SessionCommand,
    ) -> Result<DispatchOutcome, ApplicationError> {
        debug!(?command, "dispatching");
        match command {
            SessionCommand::Keep => {
                self.keep()?;
                self.advance_after_decision()?;
            }
            SessionCommand::Remove => {
                self.remove()?;
                self.advance_after_decision()?;
            }
            SessionCommand::Next => self.advance()?,
            SessionCommand::Previous => self.retreat()?,
            SessionCommand::ToggleReview => self.toggle_review()?,
            SessionCommand::Save => {
                self.save_snapshot()?;
            }
            SessionCommand::Quit => {
                self.save_snapshot()?;
                return Ok(DispatchOutcome::Quit);
            }
        }
        Ok(DispatchOutcome::Continue)
    }

    pub fn advance(&mut self) -> Result<(), ApplicationError> {
        self.select_next()?;
        self.render_current()
    }

    pub fn retreat(&mut self) -> Result<(), ApplicationError> {
        if self.state.review_mode {
            if self.state.review_index > 1 {
                self.state.review_index -= 2;
                return self.advance();
            }
            return Err(ApplicationError::EmptyReviewList);
        }

        if self.state.history.len() <= 1 {
            return Err(ApplicationError::EmptyHistory);
        }

        self.state.history.pop();
        let sample = self
            .state
            .history
            .last()
            .cloned()
            .ok_or(ApplicationError::EmptyHistory)?;
        self.state.processed_count = self.state.processed_count.saturating_sub(1);
        self.state.active_subset = Some(sample.subset());
        let location = self.location_of(&sample);
        self.state.current = Some((sample, location));
        self.render_current()
    }

    pub fn keep(&mut self) -> Result<(), ApplicationError> {
        let sample = self.current_sample()?;

        if !self.state.review_mode {
            self.state.kept_count += 1;
            info!(%sample, "keeping sample");
            self.renderer.notify(&Notice::Kept(sample));
            return Ok(());
        }

        let Some(position) = self
            .state
            .removed_samples
            .iter()
            .position(|removed| removed == &sample)
        else {
            warn!(%sample, "current review sample is no longer quarantined");
            return Err(ApplicationError::StaleReviewEntry(sample));
        };

        self.mover.move_pair(
            &self.layout.quarantine_dir(sample.subset()),
            &self.layout.subset_dir(sample.subset()),
            sample.file_name(),
        )?;

        self.state.removed_samples.remove(position);
        // The cursor already points past the restored entry.
        if position < self.state.review_index {
            self.state.review_index -= 1;
        }
        self.state.kept_count += 1;
        self.state.current = Some((sample.clone(), SampleLocation::Live));
        info!(%sample, "restored sample");
        self.renderer.notify(&Notice::Restored(sample));
        Ok(())
    }

    pub fn remove(&mut self) -> Result<(), ApplicationError> {
        if self.state.review_mode {
            return Err(ApplicationError::ReviewModeActive);
        }

        let sample = self.current_sample()?;
        if self.location_of(&sample) == SampleLocation::Quarantined {
            return Err(ApplicationError::AlreadyQuarantined(sample));
        }

        self.mover.move_pair(
            &self.layout.subset_dir(sample.subset()),
            &self.layout.quarantine_dir(sample.subset()),
            sample.file_name(),
        )?;

        self.state.mark_removed(sample.clone());
        self.state.current = Some((sample.clone(), SampleLocation::Quarantined));
        info!(%sample, "removed sample");
        self.renderer.notify(&Notice::Removed(sample));
        Ok(())
    }

    pub fn toggle_review(&mut self) -> Result<(), ApplicationError> {
        if self.state.review_mode {
            self.state.exit_review();
            info!("leaving review mode");
            self.renderer.notify(&Notice::ExitedReview);
            return self.advance();
        }

        if self.state.removed_samples.is_empty() {
            return Err(ApplicationError::NothingToReview);
        }

        self.state.enter_review();
        info!(
            removed = self.state.removed_samples.len(),
            "entering review mode"
        );
        self.renderer.notify(&Notice::EnteredReview);
        self.advance()
    }

    pub fn save_snapshot(&mut self) -> Result<PathBuf, ApplicationError> {
        let snapshot = SessionSnapshot {
            history: self.state.history.clone(),
            processed_samples: self.state.processed_count,
            kept_samples: self.state.kept_count,
        };
        let path = self.layout.snapshot_path();
        self.snapshots.save(&path, &snapshot)?;
        info!(path = %path.display(), history = snapshot.history.len(), "session saved");
        self.renderer.notify(&Notice::Saved(path.clone()));
        Ok(path)
    }

    /// Replaces history and counters with the saved session, if one exists.
    ///
    /// Quarantined samples are rescanned from disk rather than trusted from
    /// the snapshot. Returns whether a snapshot was found.
    pub fn load_snapshot(&mut self) -> Result<bool, ApplicationError> {
        let Some(snapshot) = self.read_snapshot()? else {
            return Ok(false);
        };
        let removed_samples = self.scan_quarantine()?;

        self.apply_snapshot(snapshot);
        self.state.removed_samples = removed_samples;
        self.state.exit_review();
        let current = self.state.history.last().cloned();
        self.state.current = current.map(|sample| {
            let location = self.location_of(&sample);
            (sample, location)
        });

        let status = self.status();
        self.renderer.notify(&Notice::Loaded(status));
        if self.state.current.is_some() {
            self.render_current()?;
        }
        Ok(true)
    }

    /// Moves the cursor to the next sample without drawing it.
    fn select_next(&mut self) -> Result<(), ApplicationError> {
        if self.state.review_mode {
            if let Some(sample) = self
                .state
                .removed_samples
                .get(self.state.review_index)
                .cloned()
            {
                self.state.review_index += 1;
                self.state.active_subset = Some(sample.subset());
                self.state.current = Some((sample, SampleLocation::Quarantined));
                return Ok(());
            }

            self.state.exit_review();
            info!("review of quarantined samples completed");
            self.renderer.notify(&Notice::ReviewCompleted);
        }

        let sample = self.draw_live_sample()?;
        debug!(%sample, "selected sample");
        self.state.history.push(sample.clone());
        self.state.processed_count += 1;
        self.state.current = Some((sample, SampleLocation::Live));
        Ok(())
    }

    fn advance_after_decision(&mut self) -> Result<(), ApplicationError> {
        if self.options.advance_after_decision {
            self.advance()?;
        }
        Ok(())
    }

    fn current_sample(&self) -> Result<Sample, ApplicationError> {
        self.state
            .current_sample()
            .cloned()
            .ok_or(ApplicationError::NoCurrentSample)
    }

    fn location_of(&self, sample: &Sample) -> SampleLocation {
        if self.state.is_removed(sample) {
            SampleLocation::Quarantined
        } else {
            SampleLocation::Live
        }
    }

    fn draw_live_sample(&mut self) -> Result<Sample, ApplicationError> {
        let reselect = self.state.active_subset.is_none()
            || self.random.chance(RESELECT_SUBSET_PROBABILITY);
        let preferred = match self.state.active_subset {
            Some(subset) if !reselect => subset,
            _ => Subset::ALL[self.random.pick_index(Subset::ALL.len())],
        };

        for subset in [preferred, preferred.other()] {
            let names = self.list_or_empty(&self.layout.subset_dir(subset))?;
            if names.is_empty() {
                debug!(%subset, "no images left in subset");
                continue;
            }

            let name = names[self.random.pick_index(names.len())].clone();
            self.state.active_subset = Some(subset);
            return Ok(Sample::new(subset, name)?);
        }

        warn!(subset = %preferred, "no more images to review");
        Err(ApplicationError::ExhaustedSubset(preferred))
    }

    fn list_or_empty(&self, dir: &std::path::Path) -> Result<Vec<String>, ApplicationError> {
        match self.lister.list_images(dir) {
            Ok(names) => Ok(names),
            Err(ApplicationError::NotFound(_)) => Ok(Vec::new()),
            Err(error) => Err(error),
        }
    }

    fn scan_quarantine(&self) -> Result<Vec<Sample>, ApplicationError> {
        let mut removed = Vec::new();
        for subset in Subset::ALL {
            for name in self.list_or_empty(&self.layout.quarantine_dir(subset))? {
                match Sample::new(subset, name) {
                    Ok(sample) => removed.push(sample),
                    Err(error) => warn!(%error, "skipping unreadable quarantine entry"),
                }
            }
        }
        Ok(removed)
    }

    fn count_live_samples(&self) -> Result<usize, ApplicationError> {
        let mut total = 0;
        let mut readable = 0;
        let mut failures = Vec::new();

        for subset in Subset::ALL {
            let dir = self.layout.subset_dir(subset);
            match self.lister.list_images(&dir) {
                Ok(names) => {
                    readable += 1;
                    total += names.len();
                }
                Err(error) => {
                    warn!(%subset, %error, "cannot enumerate subset, counting it as empty");
                    failures.push(format!("{subset}: {error}"));
                }
            }
        }

        if readable == 0 {
            return Err(ApplicationError::DatasetUnavailable(failures.join("; ")));
        }
        Ok(total)
    }

    fn read_snapshot(&self) -> Result<Option<SessionSnapshot>, ApplicationError> {
        self.snapshots.load(&self.layout.snapshot_path())
    }

    fn apply_snapshot(&mut self, snapshot: SessionSnapshot) {
        info!(
            history = snapshot.history.len(),
            processed = snapshot.processed_samples,
            kept = snapshot.kept_samples,
            "restoring saved session"
        );
        self.state.history = snapshot.history;
        self.state.processed_count = snapshot.processed_samples;
        self.state.kept_count = snapshot.kept_samples;
    }

    fn render_current(&mut self) -> Result<(), ApplicationError> {
        let (sample, location) = self
            .state
            .current
            .clone()
            .ok_or(ApplicationError::NoCurrentSample)?;

        let annotation_path = self.layout.annotation_path(&sample, location);
        let (annotation, annotation_error) =
            match self.annotations.read_annotation(&annotation_path) {
                Ok(annotation) => (annotation, None),
                Err(error) => {
                    warn!(%error, "showing sample without overlays");
                    (Annotation::default(), Some(error.to_string()))
                }
            };

        let frame = Frame {
            image_path: self.layout.image_path(&sample, location),
            sample,
            location,
            annotation,
            annotation_error,
            review_mode: self.state.review_mode,
            status: self.status(),
        };
        self.renderer.render(&frame)
    }
}
