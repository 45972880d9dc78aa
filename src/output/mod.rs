//! Artifact persistence: deterministic timestamp-derived file names, the
//! exists-check cache skip, and deletion of artifacts that fell out of the
//! current query window.

pub mod animate;
pub mod error;

use crate::output::error::OutputError;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::info;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Timestamp format embedded in artifact file names.
const ARTIFACT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";

/// Owns one run's artifact directory for a given `<prefix>_*.<ext>` family.
///
/// The only persisted state of the whole pipeline is the set of files this
/// store names: existence doubles as the cache key, and any file of the
/// family not produced (or reused) by the current run is deleted by
/// [`ArtifactStore::cleanup_stale`]. There is no locking; concurrent runs
/// against the same directory race on these paths.
#[derive(Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
    prefix: String,
    extension: String,
    produced: BTreeSet<PathBuf>,
}

impl ArtifactStore {
    pub fn new(
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        extension: impl Into<String>,
    ) -> Result<Self, OutputError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| OutputError::DirCreation(dir.clone(), e))?;
        Ok(Self {
            dir,
            prefix: prefix.into(),
            extension: extension.into(),
            produced: BTreeSet::new(),
        })
    }

    /// Deterministic artifact path for one frame timestamp.
    pub fn path_for(&self, timestamp: DateTime<Utc>) -> PathBuf {
        self.dir.join(format!(
            "{}_{}.{}",
            self.prefix,
            timestamp.format(ARTIFACT_TIMESTAMP_FORMAT),
            self.extension
        ))
    }

    /// Path of the aggregate artifact (`<prefix>.<ext>` with the given
    /// extension, e.g. the assembled animation).
    pub fn aggregate_path(&self, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", self.prefix, extension))
    }

    /// The cache-skip heuristic: a frame whose artifact already exists is
    /// not rendered again.
    pub fn is_cached(&self, timestamp: DateTime<Utc>) -> bool {
        self.path_for(timestamp).exists()
    }

    /// Records a path as produced (or reused) by this run, protecting it
    /// from the cleanup pass.
    pub fn mark_produced(&mut self, path: PathBuf) {
        self.produced.insert(path);
    }

    /// Paths produced by this run, ascending by name (and thus by
    /// timestamp, since the name format sorts chronologically).
    pub fn produced(&self) -> Vec<PathBuf> {
        self.produced.iter().cloned().collect()
    }

    /// Deletes every `<prefix>_*.<ext>` file in the directory that this run
    /// did not produce. Returns the deleted paths.
    pub fn cleanup_stale(&self) -> Result<Vec<PathBuf>, OutputError> {
        let entries = std::fs::read_dir(&self.dir)
            .map_err(|e| OutputError::DirList(self.dir.clone(), e))?;

        let mut removed = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| OutputError::DirList(self.dir.clone(), e))?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if self.parse_timestamp(name).is_none() {
                continue;
            }
            if self.produced.contains(&path) {
                continue;
            }
            info!("Removing stale artifact {:?}", path);
            std::fs::remove_file(&path).map_err(|e| OutputError::StaleDelete(path.clone(), e))?;
            removed.push(path);
        }
        Ok(removed)
    }

    /// Inverse of [`ArtifactStore::path_for`] naming: the timestamp encoded
    /// in a file name of this family, or `None` for foreign files.
    pub fn parse_timestamp(&self, file_name: &str) -> Option<DateTime<Utc>> {
        let stem = file_name
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix('_')?
            .strip_suffix(self.extension.as_str())?
            .strip_suffix('.')?;
        NaiveDateTime::parse_from_str(stem, ARTIFACT_TIMESTAMP_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 9, 4, h, m, 0).unwrap()
    }

    fn store(dir: &Path) -> ArtifactStore {
        ArtifactStore::new(dir, "radar", "png").unwrap()
    }

    #[test]
    fn path_naming_round_trips_through_parse() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let path = store.path_for(ts(12, 50));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert_eq!(name, "radar_20230904_1250.png");
        assert_eq!(store.parse_timestamp(name), Some(ts(12, 50)));
    }

    #[test]
    fn foreign_files_do_not_parse() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        assert!(store.parse_timestamp("radar.webp").is_none());
        assert!(store.parse_timestamp("other_20230904_1250.png").is_none());
        assert!(store.parse_timestamp("radar_20230904.png").is_none());
    }

    #[test]
    fn existing_artifact_is_reported_cached() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        assert!(!store.is_cached(ts(12, 0)));
        std::fs::write(store.path_for(ts(12, 0)), b"frame").unwrap();
        assert!(store.is_cached(ts(12, 0)));
    }

    #[test]
    fn cleanup_removes_only_unproduced_family_members() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());

        let kept = store.path_for(ts(12, 50));
        let stale = store.path_for(ts(11, 0));
        let foreign = dir.path().join("notes.txt");
        std::fs::write(&kept, b"frame").unwrap();
        std::fs::write(&stale, b"frame").unwrap();
        std::fs::write(&foreign, b"text").unwrap();

        store.mark_produced(kept.clone());
        let removed = store.cleanup_stale().unwrap();

        assert_eq!(removed, vec![stale.clone()]);
        assert!(kept.exists());
        assert!(!stale.exists());
        assert!(foreign.exists());
    }

    #[test]
    fn produced_paths_come_back_sorted_by_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        let later = store.path_for(ts(13, 0));
        let earlier = store.path_for(ts(12, 10));
        store.mark_produced(later.clone());
        store.mark_produced(earlier.clone());
        assert_eq!(store.produced(), vec![earlier, later]);
    }

    #[test]
    fn hour_of_ten_minute_frames_yields_six_distinct_increasing_names() {
        use crate::types::query_window::QueryWindow;
        use chrono::Duration;

        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let window = QueryWindow::trailing(ts(13, 0), Duration::minutes(60));

        let names: Vec<String> = window
            .slots(10)
            .into_iter()
            .map(|slot| {
                store
                    .path_for(slot)
                    .file_name()
                    .unwrap()
                    .to_str()
                    .unwrap()
                    .to_string()
            })
            .collect();

        assert_eq!(names.len(), 6);
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, names);
        for (name, minutes) in names.iter().zip([10, 20, 30, 40, 50, 0]) {
            let parsed = store.parse_timestamp(name).unwrap();
            assert_eq!(parsed.format("%M").to_string(), format!("{minutes:02}"));
        }
    }

    #[test]
    fn rerun_with_cache_leaves_artifacts_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let slots = [ts(12, 10), ts(12, 20), ts(12, 30)];

        // First run writes every frame.
        let mut first = store(dir.path());
        for slot in slots {
            let path = first.path_for(slot);
            std::fs::write(&path, format!("frame-{slot}")).unwrap();
            first.mark_produced(path);
        }
        assert!(first.cleanup_stale().unwrap().is_empty());

        // Second run over the same window skips every render but still marks
        // the reused paths; nothing is rewritten or deleted.
        let mut second = store(dir.path());
        for slot in slots {
            assert!(second.is_cached(slot));
            second.mark_produced(second.path_for(slot));
        }
        assert!(second.cleanup_stale().unwrap().is_empty());
        for slot in slots {
            let contents = std::fs::read_to_string(second.path_for(slot)).unwrap();
            assert_eq!(contents, format!("frame-{slot}"));
        }
    }
}
