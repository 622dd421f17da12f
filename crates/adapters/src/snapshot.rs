use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use voc_verifier_application::{ApplicationError, SnapshotStore};
use voc_verifier_domain::SessionSnapshot;

/// Stores the session snapshot as pretty-printed JSON.
#[derive(Debug, Default)]
pub struct JsonSnapshotStore;

impl SnapshotStore for JsonSnapshotStore {
    fn load(&self, path: &Path) -> Result<Option<SessionSnapshot>, ApplicationError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(ApplicationError::Io(error.to_string())),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|error| {
                ApplicationError::Persistence(format!("{}: {error}", path.display()))
            })
    }

    fn save(&self, path: &Path, snapshot: &SessionSnapshot) -> Result<(), ApplicationError> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))?;

        // Staged write, then rename over the target.
        let staging = staging_path(path);
        fs::write(&staging, json).map_err(|error| ApplicationError::Io(error.to_string()))?;
        fs::rename(&staging, path).map_err(|error| ApplicationError::Io(error.to_string()))
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use voc_verifier_domain::{Sample, Subset};

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("verifier_state.json");
        let snapshot = SessionSnapshot {
            history: vec![
                Sample::new(Subset::Train, "a.jpg").expect("sample"),
                Sample::new(Subset::Validation, "b.png").expect("sample"),
            ],
            processed_samples: 2,
            kept_samples: 1,
        };

        let store = JsonSnapshotStore;
        store.save(&path, &snapshot).expect("save");
        let loaded = store.load(&path).expect("load");

        assert_eq!(loaded, Some(snapshot));
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn missing_snapshot_loads_as_none() {
        let dir = TempDir::new().expect("tempdir");
        let loaded = JsonSnapshotStore
            .load(&dir.path().join("verifier_state.json"))
            .expect("load");
        assert!(loaded.is_none());
    }

    #[test]
    fn reads_snapshot_written_by_hand() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("verifier_state.json");
        fs::write(
            &path,
            r#"{"history": [["train", "x.jpg"]], "processed_samples": 5, "kept_samples": 3}"#,
        )
        .expect("write");

        let loaded = JsonSnapshotStore.load(&path).expect("load").expect("some");

        assert_eq!(loaded.processed_samples, 5);
        assert_eq!(loaded.kept_samples, 3);
        assert_eq!(loaded.history[0].file_name(), "x.jpg");
    }

    #[test]
    fn history_with_paths_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("verifier_state.json");
        fs::write(
            &path,
            r#"{"history": [["train", "../../etc/passwd.jpg"]], "processed_samples": 1, "kept_samples": 0}"#,
        )
        .expect("write");

        assert!(matches!(
            JsonSnapshotStore.load(&path),
            Err(ApplicationError::Persistence(_))
        ));
    }
}
