use crate::error::Error;
use crate::models::volume::DiskSpace;

/// Query usage for the filesystem containing `path` via statvfs.
/// A nonexistent or inaccessible path is a per-volume failure; callers skip
/// the volume and keep going.
pub fn read_disk_space(path: &str) -> Result<DiskSpace, Error> {
    use nix::sys::statvfs::statvfs;

    let stat = statvfs(path).map_err(|e| Error::VolumeUnreadable {
        path: path.to_string(),
        source: e,
    })?;

    let frsize = stat.fragment_size() as u64;
    let total_bytes = stat.blocks()           * frsize;
    let avail_bytes = stat.blocks_available() * frsize;
    let free_bytes  = stat.blocks_free()      * frsize;
    let used_bytes  = total_bytes.saturating_sub(free_bytes);

    Ok(DiskSpace { total_bytes, used_bytes, avail_bytes })
}
