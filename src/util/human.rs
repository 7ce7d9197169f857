use crate::error::Error;

const KB: u64 = 1_024;
const MB: u64 = 1_048_576;
const GB: u64 = 1_073_741_824;
const TB: u64 = 1_099_511_627_776;

/// Format a raw byte count into a human-readable string: "12.5 GB"
pub fn fmt_bytes(bytes: u64) -> String {
    let b = bytes as f64;
    if b >= TB as f64      { format!("{:.1} TB", b / TB as f64) }
    else if b >= GB as f64 { format!("{:.1} GB", b / GB as f64) }
    else if b >= MB as f64 { format!("{:.1} MB", b / MB as f64) }
    else if b >= KB as f64 { format!("{:.1} KB", b / KB as f64) }
    else                   { format!("{} B",  bytes) }
}

/// Format a byte count as a composite breakdown of all non-zero units,
/// largest first: "1 TB 54 GB 239 MB". Used in the history log lines.
pub fn fmt_bytes_parts(bytes: u64) -> String {
    if bytes == 0 { return "0 B".to_string(); }

    let mut parts = Vec::new();
    let mut rem = bytes;
    for (name, size) in [("TB", TB), ("GB", GB), ("MB", MB), ("KB", KB), ("B", 1)] {
        if rem >= size {
            parts.push(format!("{} {}", rem / size, name));
            rem %= size;
        }
    }
    parts.join(" ")
}

/// Parse a human-friendly size string ("10GB", "500 MB", "1.5tb") to bytes.
/// Units are binary multiples (1 KB = 1024 B); a bare number or "B" suffix
/// means bytes.
pub fn parse_size(text: &str) -> Result<u64, Error> {
    let s = text.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (num, unit) = s.split_at(split);

    let value: f64 = num
        .parse()
        .map_err(|_| Error::InvalidSizeFormat(text.to_string()))?;

    let multiplier = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 1,
        "KB"     => KB,
        "MB"     => MB,
        "GB"     => GB,
        "TB"     => TB,
        _        => return Err(Error::InvalidSizeFormat(text.to_string())),
    };

    Ok((value * multiplier as f64) as u64)
}
