use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::Sample;

/// Persisted subset of the session state.
///
/// Quarantined samples are deliberately absent: they are rebuilt from the
/// `defective` directory every time a session starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub history: Vec<Sample>,
    pub processed_samples: u64,
    pub kept_samples: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub processed: u64,
    pub kept: u64,
    pub removed: usize,
}

impl Display for StatusCounts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total: {}, Processed: {}, Kept: {}, Removed: {}",
            self.total, self.processed, self.kept, self.removed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Subset;

    #[test]
    fn snapshot_uses_stable_key_names() {
        let snapshot = SessionSnapshot {
            history: vec![Sample::new(Subset::Train, "a.jpg").expect("sample")],
            processed_samples: 3,
            kept_samples: 1,
        };
        let json = serde_json::to_string(&snapshot).expect("serialize");
        assert_eq!(
            json,
            r#"{"history":[["train","a.jpg"]],"processed_samples":3,"kept_samples":1}"#
        );
    }

    #[test]
    fn status_line_lists_all_counters() {
        let counts = StatusCounts {
            total: 10,
            processed: 4,
            kept: 2,
            removed: 1,
        };
        assert_eq!(
            counts.to_string(),
            "Total: 10, Processed: 4, Kept: 2, Removed: 1"
        );
    }
}
