/// Map a volume path to the file stem used for its history log and chart.
///
/// Deterministic and total: trailing separators are stripped, remaining
/// separators become `_`, drive-letter colons are dropped, and the
/// filesystem root maps to "root". Distinct configured paths must map to
/// distinct stems; `config` rejects settings where they don't.
pub fn volume_slug(path: &str) -> String {
    let trimmed = path.trim_end_matches(['/', '\\']);
    let replaced: String = trimmed
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();

    if replaced.is_empty() || replaced == "_" {
        return "root".to_string();
    }

    let slug: String = replaced.chars().filter(|c| *c != ':').collect();
    if slug.is_empty() { "root".to_string() } else { slug }
}
