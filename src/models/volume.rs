use chrono::{DateTime, Local};

/// One monitored volume: a path plus its free-space floor.
#[derive(Debug, Clone)]
pub struct VolumeConfig {
    pub path: String,
    pub minimum_free_bytes: u64,
}

/// Usage snapshot for the filesystem containing a volume path.
#[derive(Debug, Clone, Copy)]
pub struct DiskSpace {
    pub total_bytes: u64,
    pub used_bytes:  u64,
    pub avail_bytes: u64,
}

impl DiskSpace {
    pub fn free_pct(&self) -> f64 {
        if self.total_bytes == 0 { return 0.0; }
        self.avail_bytes as f64 / self.total_bytes as f64 * 100.0
    }
}

/// One timestamped free-space observation, as written to a volume's log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp:  DateTime<Local>,
    pub free_bytes: u64,
}
