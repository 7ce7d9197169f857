//! Append-only per-volume free-space logs.
//!
//! One file per volume at `<data_dir>/<slug>.log`, one sample per line:
//!
//! ```text
//! 2026-03-14T06:00:01 102176960512 (95 GB 168 MB 553 KB 256 B)
//! ```
//!
//! Existing lines are never rewritten or truncated; a whole line is the
//! atomic unit of durability. Reading tolerates malformed lines (including
//! timestampless entries from older tooling) by skipping them.

use crate::error::Result;
use crate::models::volume::Sample;
use crate::util::human::fmt_bytes_parts;
use crate::util::slug::volume_slug;
use chrono::{Local, NaiveDateTime};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

pub struct HistoryStore {
    data_dir: PathBuf,
}

impl HistoryStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn log_path(&self, volume_path: &str) -> PathBuf {
        self.data_dir.join(format!("{}.log", volume_slug(volume_path)))
    }

    /// Append one sample to the volume's log, creating the data directory
    /// and file on demand.
    pub fn append(&self, volume_path: &str, sample: &Sample) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path(volume_path))?;
        writeln!(
            file,
            "{} {} ({})",
            sample.timestamp.format("%Y-%m-%dT%H:%M:%S"),
            sample.free_bytes,
            fmt_bytes_parts(sample.free_bytes)
        )?;
        Ok(())
    }

    /// Read every parseable sample, oldest first in file order. A missing
    /// file is an empty history; unparseable lines are skipped, never fatal.
    pub fn read_all(&self, volume_path: &str) -> Vec<Sample> {
        let path = self.log_path(volume_path);
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(_) => return Vec::new(),
        };

        let mut samples = Vec::new();
        let mut skipped = 0usize;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() { continue; }
            match parse_line(line) {
                Some(s) => samples.push(s),
                None    => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(path = %path.display(), skipped, "skipped unparseable history lines");
        }
        samples
    }
}

fn parse_line(line: &str) -> Option<Sample> {
    let mut fields = line.splitn(3, ' ');
    let ts = fields.next()?;
    let bytes = fields.next()?;

    // Accept an optional fractional-seconds part written by older versions.
    let timestamp = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()?
        .and_local_timezone(Local)
        .earliest()?;
    let free_bytes = bytes.parse().ok()?;

    Some(Sample { timestamp, free_bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(h: u32, free: u64) -> Sample {
        Sample {
            timestamp: Local.with_ymd_and_hms(2026, 3, 14, h, 30, 5).unwrap(),
            free_bytes: free,
        }
    }

    #[test]
    fn append_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path());

        let first = sample(6, 102_176_960_512);
        let second = sample(7, 101_000_000_000);
        store.append("/", &first).unwrap();
        store.append("/", &second).unwrap();

        let all = store.read_all("/");
        assert_eq!(all, vec![first, second]);
    }

    #[test]
    fn missing_log_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path());
        assert!(store.read_all("/never-sampled").is_empty());
    }

    #[test]
    fn append_never_rewrites_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path());

        store.append("/", &sample(6, 500)).unwrap();
        let before = fs::read_to_string(store.log_path("/")).unwrap();
        store.append("/", &sample(7, 400)).unwrap();
        let after = fs::read_to_string(store.log_path("/")).unwrap();

        assert!(after.starts_with(&before));
        assert_eq!(after.lines().count(), 2);
    }

    #[test]
    fn malformed_lines_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path());
        store.append("/data", &sample(6, 700)).unwrap();

        // Inject garbage, a legacy timestampless entry, and a blank line
        // between two valid appends.
        let path = store.log_path("/data");
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "not a sample at all").unwrap();
        writeln!(file, "12345678 (11 MB 792 KB 334 B)").unwrap();
        writeln!(file).unwrap();
        drop(file);
        store.append("/data", &sample(7, 600)).unwrap();

        let all = store.read_all("/data");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].free_bytes, 700);
        assert_eq!(all[1].free_bytes, 600);
    }

    #[test]
    fn distinct_volumes_use_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path());
        assert_ne!(store.log_path("/"), store.log_path("/mnt/media"));
        assert_eq!(
            store.log_path("/").file_name().unwrap().to_str().unwrap(),
            "root.log"
        );
    }
}
