use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing required settings. Fatal: aborts before any
    /// volume is processed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A size string that doesn't match `<number><unit>` with unit in
    /// B/KB/MB/GB/TB.
    #[error("invalid size format {0:?} (use forms like \"10GB\", \"500MB\")")]
    InvalidSizeFormat(String),

    /// The volume path doesn't exist or can't be statted. Per-volume: the
    /// pipeline skips this volume and continues with the rest.
    #[error("volume {path} is unreadable: {source}")]
    VolumeUnreadable {
        path: String,
        #[source]
        source: nix::Error,
    },

    /// Push notification delivery failed. Logged, never retried within the
    /// same invocation.
    #[error("notification send failed: {0}")]
    Notify(String),

    /// Trend chart rendering failed. Best-effort: downgraded to a warning.
    #[error("chart render failed: {0}")]
    Chart(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
