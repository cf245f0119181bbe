//! Pure formatting helpers for listing cells: human-readable sizes,
//! timestamps and percent-encoded link targets.

use chrono::{DateTime, Local};

/// Unit thresholds, largest first. The byte unit carries a singular form.
const UNITS: &[(u64, &str, Option<&str>)] = &[
    (1 << 50, "PB", None),
    (1 << 40, "TB", None),
    (1 << 30, "GB", None),
    (1 << 20, "MB", None),
    (1 << 10, "KB", None),
    (1, "bytes", Some("byte")),
];

/// Format a byte count with the largest unit not exceeding it.
///
/// The amount is truncated, never rounded: `1536` is `"1 KB"`.
pub fn format_size(bytes: u64) -> String {
    let (factor, plural, singular) = UNITS
        .iter()
        .find(|(factor, _, _)| bytes >= *factor)
        .copied()
        .unwrap_or((1, "bytes", Some("byte")));
    let amount = bytes / factor;
    let unit = match singular {
        Some(one) if amount == 1 => one,
        _ => plural,
    };
    format!("{amount} {unit}")
}

/// Machine-readable timestamp for the `datetime` attribute.
pub fn format_iso(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Display timestamp for the Modified column.
pub fn format_display(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Percent-encode a link target, leaving unreserved characters and `/` intact.
pub fn encode_href(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
