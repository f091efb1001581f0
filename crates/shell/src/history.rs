//! Append-only JSONL history recorder.
//!
//! The persistence collaborator is fire-and-forget: every failure is logged
//! and swallowed, so a bad disk can never abort a navigation.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;
use warren::sink::HistoryRecorder;
use warren_protocol::HistoryEntry;

pub struct JsonlHistory {
    path: PathBuf,
    file: Option<File>,
}

impl JsonlHistory {
    /// Opens the history file at `path`, creating parent directories as
    /// needed. On failure the recorder degrades to a logged no-op.
    pub fn open(path: PathBuf) -> Self {
        let file = match open_append(&path) {
            Ok(file) => Some(file),
            Err(err) => {
                warn!(
                    target = "warren.history",
                    path = %path.display(),
                    error = %err,
                    "history recording disabled"
                );
                None
            }
        };
        Self { path, file }
    }

    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("warren")
            .join("history.jsonl")
    }
}

fn open_append(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

impl HistoryRecorder for JsonlHistory {
    fn record(&mut self, entry: HistoryEntry) {
        let Some(file) = self.file.as_mut() else {
            return;
        };
        let line = match serde_json::to_string(&entry) {
            Ok(line) => line,
            Err(err) => {
                warn!(target = "warren.history", error = %err, "history entry not serializable");
                return;
            }
        };
        if let Err(err) = writeln!(file, "{line}") {
            warn!(
                target = "warren.history",
                path = %self.path.display(),
                error = %err,
                "history write failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str) -> HistoryEntry {
        HistoryEntry {
            url: url.to_string(),
            title: "title".to_string(),
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn records_append_parseable_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.jsonl");
        let mut history = JsonlHistory::open(path.clone());

        history.record(entry("https://a.test/"));
        history.record(entry("https://b.test/"));

        let contents = fs::read_to_string(&path).unwrap();
        let parsed: Vec<HistoryEntry> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].url, "https://b.test/");
    }

    #[test]
    fn unwritable_path_degrades_to_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();

        // Parent is a regular file, so the open fails and recording is off.
        let mut history = JsonlHistory::open(blocker.join("history.jsonl"));
        history.record(entry("https://a.test/"));
    }
}
