use voc_verifier_domain::{Sample, SampleLocation, Subset};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub history: Vec<Sample>,
    /// Quarantined samples in discovery order, without duplicates.
    pub removed_samples: Vec<Sample>,
    pub processed_count: u64,
    pub kept_count: u64,
    pub total_count: usize,
    pub review_mode: bool,
    pub review_index: usize,
    pub current: Option<(Sample, SampleLocation)>,
    pub active_subset: Option<Subset>,
}

impl SessionState {
    pub fn current_sample(&self) -> Option<&Sample> {
        self.current.as_ref().map(|(sample, _)| sample)
    }

    pub fn is_removed(&self, sample: &Sample) -> bool {
        self.removed_samples.contains(sample)
    }

    pub(crate) fn exit_review(&mut self) {
        self.review_mode = false;
        self.review_index = 0;
    }

    pub(crate) fn enter_review(&mut self) {
        self.review_mode = true;
        self.review_index = 0;
    }

    pub(crate) fn mark_removed(&mut self, sample: Sample) {
        if !self.is_removed(&sample) {
            self.removed_samples.push(sample);
        }
    }
}
