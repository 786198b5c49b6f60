//! JSONL file writer for decision records.
//!
//! Each [`DecisionRecord`] is serialized as a single JSON line with a
//! `strategy` field and `timestamp`, appended to the file via a buffered
//! writer. This is an audit trail, not a query store: nothing reads it
//! back here.

use conclave_application::DecisionLogger;
use conclave_domain::DecisionRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL decision logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlDecisionLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlDecisionLogger {
    /// Create a new logger writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create decision log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create decision log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DecisionLogger for JsonlDecisionLogger {
    fn log(&self, record: &DecisionRecord) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let payload = match serde_json::to_value(record) {
            Ok(serde_json::Value::Object(mut map)) => {
                map.insert(
                    "timestamp".to_string(),
                    serde_json::Value::String(timestamp),
                );
                serde_json::Value::Object(map)
            }
            Ok(other) => serde_json::json!({
                "timestamp": timestamp,
                "record": other,
            }),
            Err(e) => {
                warn!("Could not serialize decision record: {}", e);
                return;
            }
        };

        let Ok(line) = serde_json::to_string(&payload) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // Flush per record — JSONL is append-only and crash-legible
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlDecisionLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::{
        Ballot, BallotEntry, DecisionRecord, Domain, Opinion, RoundBallots, Tally,
        ThresholdPolicy,
    };

    fn sample_record() -> DecisionRecord {
        let round = RoundBallots::new(0, vec![
            BallotEntry::new("a", 2.0, Ballot::Voted {
                opinion: Opinion::new("ship", "ready"),
            }),
            BallotEntry::new("b", 1.0, Ballot::Voted {
                opinion: Opinion::new("hold", "not ready"),
            }),
        ]);
        let tally = Tally::from_round(&round, 3.0);
        DecisionRecord::from_vote("ship it?", Domain::General, ThresholdPolicy::SimpleMajority, &tally, round)
    }

    #[test]
    fn test_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        let logger = JsonlDecisionLogger::new(&path).unwrap();

        logger.log(&sample_record());
        logger.log(&sample_record());
        drop(logger);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["strategy"], "voting");
            assert_eq!(value["outcome"], "passed");
            assert!(value["timestamp"].is_string());
        }
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("decisions.jsonl");
        let logger = JsonlDecisionLogger::new(&path);
        assert!(logger.is_some());
        assert!(path.exists());
    }
}
