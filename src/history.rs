use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::mode::Mode;

/// One completed game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: DateTime<Local>,
    pub mode: Mode,
    pub elapsed_secs: u64,
    pub new_best: bool,
}

/// Append-only CSV log of finished games
#[derive(Debug, Clone)]
pub struct GameHistory {
    path: PathBuf,
}

impl GameHistory {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &HistoryEntry) -> csv::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // If the log doesn't exist yet, emit a header
        let needs_header = !self.path.exists();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(entry)?;
        writer.flush()?;
        Ok(())
    }

    /// Up to `limit` most recent games, newest first. A missing log is empty.
    pub fn recent(&self, limit: usize) -> csv::Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut entries = reader
            .deserialize()
            .collect::<csv::Result<Vec<HistoryEntry>>>()?;
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(mode: Mode, elapsed_secs: u64, new_best: bool) -> HistoryEntry {
        HistoryEntry {
            date: Local::now(),
            mode,
            elapsed_secs,
            new_best,
        }
    }

    #[test]
    fn test_missing_log_is_empty() {
        let dir = tempdir().unwrap();
        let history = GameHistory::with_path(dir.path().join("history.csv"));
        assert!(history.recent(5).unwrap().is_empty());
    }

    #[test]
    fn test_recent_is_newest_first_and_limited() {
        let dir = tempdir().unwrap();
        let history = GameHistory::with_path(dir.path().join("sub").join("history.csv"));

        history.append(&entry(Mode::Normal, 40, true)).unwrap();
        history.append(&entry(Mode::Hard, 120, true)).unwrap();
        history.append(&entry(Mode::Normal, 55, false)).unwrap();

        let recent = history.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].elapsed_secs, 55);
        assert!(!recent[0].new_best);
        assert_eq!(recent[1].mode, Mode::Hard);

        let contents = std::fs::read_to_string(history.path()).unwrap();
        assert_eq!(contents.lines().next(), Some("date,mode,elapsed_secs,new_best"));
        assert_eq!(contents.lines().count(), 4);
    }
}
