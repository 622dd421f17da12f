use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct InitializeSessionCommand {
    pub dataset_root: PathBuf,
    pub resume: bool,
}

/// One reviewer action. Each maps onto exactly one controller operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Keep,
    Remove,
    Next,
    Previous,
    ToggleReview,
    Save,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Show the next sample right after a successful keep or remove.
    pub advance_after_decision: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            advance_after_decision: true,
        }
    }
}
