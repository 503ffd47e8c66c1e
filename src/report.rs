//! Human-friendly size reporting for verbose output.

/// Unit names, smallest first. Merged flash images top out well below the
/// gigabyte range, so the scale stops at megabytes.
const SUFFIXES: [&str; 3] = ["bytes", "kilobytes", "megabytes"];

const ONE_KILOBYTE: f64 = 1024.0;

/// Format a byte count with the largest applicable unit.
///
/// Plain byte counts print with no decimals ("10 bytes"); scaled units keep
/// two ("1.50 kilobytes"). Pure function: same input, same string.
pub fn format_size(bytes: u64) -> String {
    let mut count = bytes as f64;
    let mut suffix = 0;
    while count >= ONE_KILOBYTE && suffix + 1 < SUFFIXES.len() {
        suffix += 1;
        count /= ONE_KILOBYTE;
    }
    if suffix == 0 {
        format!("{:.0} {}", count, SUFFIXES[suffix])
    } else {
        format!("{:.2} {}", count, SUFFIXES[suffix])
    }
}
