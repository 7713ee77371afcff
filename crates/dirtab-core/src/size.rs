//! Human-readable size labels.

const KB: u64 = 1024;
const MB: u64 = 1024 * 1024;

/// Render a byte count as `B`, `KB` or `MB` with one decimal place.
///
/// Sizes below 1 KB are printed as an integer byte count. There is no
/// unit above MB, so very large files read as e.g. `"20480.0 MB"`.
pub fn format_size(bytes: u64) -> String {
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
