//! One check-and-report cycle over every configured volume.
//!
//! Each volume is processed in order: query free space, append a history
//! sample, regenerate the trend chart, evaluate the threshold, and — when
//! below it — send a rate-limited push notification. Failures are isolated
//! per volume: an unreadable path becomes that volume's outcome and the
//! fold moves on, so one offline disk never blocks the rest.

use crate::chart;
use crate::collectors::disk;
use crate::config::Config;
use crate::error::Error;
use crate::history::HistoryStore;
use crate::models::volume::{DiskSpace, Sample, VolumeConfig};
use crate::notify::Notifier;
use crate::tracker::NotificationTracker;
use crate::util::human::fmt_bytes;
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

#[derive(Debug)]
pub enum VolumeOutcome {
    Checked {
        space:           DiskSpace,
        below_threshold: bool,
        notified:        bool,
        suppressed:      bool,
    },
    Unreadable(Error),
}

#[derive(Debug)]
pub struct VolumeReport {
    pub path:               String,
    pub minimum_free_bytes: u64,
    pub outcome:            VolumeOutcome,
}

#[derive(Debug)]
pub struct RunReport {
    pub volumes: Vec<VolumeReport>,
}

impl RunReport {
    pub fn processed(&self) -> usize {
        self.volumes
            .iter()
            .filter(|v| matches!(v.outcome, VolumeOutcome::Checked { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.volumes.len() - self.processed()
    }

    /// True when every configured volume failed; the only per-volume
    /// condition that turns the whole invocation into a failure.
    pub fn all_failed(&self) -> bool {
        !self.volumes.is_empty() && self.processed() == 0
    }
}

/// Run one complete check cycle. `today` is the calendar day used for
/// notification rate-limiting; the binary passes the host-local date, tests
/// pass a fixed one to exercise rollover.
pub fn run(config: &Config, notifier: &dyn Notifier, today: NaiveDate) -> RunReport {
    let history = HistoryStore::new(&config.data_dir);
    let tracker = NotificationTracker::new(&config.data_dir);

    let volumes = config
        .volumes
        .iter()
        .map(|vol| VolumeReport {
            path: vol.path.clone(),
            minimum_free_bytes: vol.minimum_free_bytes,
            outcome: check_volume(vol, config, &history, &tracker, notifier, today),
        })
        .collect();

    RunReport { volumes }
}

fn check_volume(
    vol: &VolumeConfig,
    config: &Config,
    history: &HistoryStore,
    tracker: &NotificationTracker,
    notifier: &dyn Notifier,
    today: NaiveDate,
) -> VolumeOutcome {
    let space = match disk::read_disk_space(&vol.path) {
        Ok(space) => space,
        Err(err) => {
            warn!(path = %vol.path, %err, "volume unreadable, skipping");
            return VolumeOutcome::Unreadable(err);
        }
    };

    let sample = Sample {
        timestamp:  Local::now(),
        free_bytes: space.avail_bytes,
    };
    if let Err(err) = history.append(&vol.path, &sample) {
        warn!(path = %vol.path, %err, "could not append history sample");
    }

    // Best-effort: the chart is observability, not correctness.
    if let Err(err) = chart::render(&vol.path, &history.read_all(&vol.path), &config.data_dir) {
        warn!(path = %vol.path, %err, "chart render failed");
    }

    let below_threshold = space.avail_bytes < vol.minimum_free_bytes;
    let mut notified = false;
    let mut suppressed = false;

    if below_threshold {
        if tracker.try_consume(config.max_per_day, today) {
            let title = format!("Low Disk Space Alert: {}", vol.path);
            match notifier.send(&title, &alert_message(vol, &space)) {
                Ok(()) => notified = true,
                // The consumed slot stays consumed; retry belongs to the
                // next scheduled run.
                Err(err) => warn!(path = %vol.path, %err, "notification send failed"),
            }
        } else {
            suppressed = true;
            info!(path = %vol.path, "below threshold, but the daily notification limit is reached");
        }
    }

    VolumeOutcome::Checked { space, below_threshold, notified, suppressed }
}

fn alert_message(vol: &VolumeConfig, space: &DiskSpace) -> String {
    format!(
        "Volume {} is running low on disk space!\n\n\
         Free space: {}\n\
         Used space: {}\n\
         Total space: {}\n\
         Free: {:.1}%\n\n\
         Minimum threshold: {}",
        vol.path,
        fmt_bytes(space.avail_bytes),
        fmt_bytes(space.used_bytes),
        fmt_bytes(space.total_bytes),
        space.free_pct(),
        fmt_bytes(vol.minimum_free_bytes),
    )
}
