//! Persisted daily notification counter.
//!
//! One JSON file per data directory tracks the active calendar day and how
//! many push notifications were sent on it. The count is global across all
//! volumes of a settings file: `max_per_day` is a single knob, not a
//! per-volume allowance. The day is the local calendar date of the executing
//! host; when it changes the counter hard-resets to zero.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const TRACKING_FILE: &str = "notification_tracking.json";

#[derive(Debug, Serialize, Deserialize, Default)]
struct Tracking {
    date:  String,
    count: u32,
}

pub struct NotificationTracker {
    path: PathBuf,
}

impl NotificationTracker {
    pub fn new(data_dir: &Path) -> Self {
        Self { path: data_dir.join(TRACKING_FILE) }
    }

    /// Consume one notification slot for `today`, if the daily limit allows.
    ///
    /// The updated count is persisted *before* this returns, so a crash
    /// between consuming and sending over-counts by at most one and never
    /// under-counts. `None` means unlimited: always allowed, and the
    /// tracking file is left untouched.
    pub fn try_consume(&self, limit: Option<u32>, today: NaiveDate) -> bool {
        let Some(limit) = limit else { return true };

        let today = today.format("%Y-%m-%d").to_string();
        let mut tracking = self.load();
        if tracking.date != today {
            tracking = Tracking { date: today, count: 0 };
        }

        if tracking.count >= limit {
            return false;
        }

        tracking.count += 1;
        self.save(&tracking);
        true
    }

    /// Load persisted tracking state. A missing or corrupt file reads as
    /// "no notifications sent yet", which forces a reset on the next consume.
    fn load(&self) -> Tracking {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(_) => return Tracking::default(),
        };
        serde_json::from_str(&text).unwrap_or_default()
    }

    fn save(&self, tracking: &Tracking) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let json = match serde_json::to_string(tracking) {
            Ok(j) => j,
            Err(_) => return,
        };
        if let Err(err) = fs::write(&self.path, json) {
            warn!(path = %self.path.display(), %err, "could not persist notification tracking");
        }
    }
}
