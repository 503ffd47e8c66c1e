//! Merge configuration for imagemerge.
//!
//! All configuration comes from command-line flags; there is no config file.
//! The offset is the one value that needs validation, and it is checked here
//! before any file I/O happens.

use anyhow::{bail, Result};

/// Scaling factor from user-facing offset units to bytes.
pub const ONE_KILOBYTE: u64 = 1024;

/// Largest accepted raw offset value (pre-scaling).
pub const MAX_OFFSET: u64 = 32768;

/// Raw offset values must land on this boundary.
pub const OFFSET_STEP: u64 = 512;

/// Everything the merge pipeline needs to know.
pub struct MergeConfig {
    /// Program (firmware) image, placed at byte 0 of the output.
    pub prog_image: Option<String>,

    /// Filesystem image, placed at `offset`.
    pub fs_image: Option<String>,

    /// Output path for the merged image.
    pub out_image: Option<String>,

    /// Filesystem placement offset in bytes. Starts at the raw value 512 and
    /// is replaced by the scaled `-offset` value when the flag is given.
    pub offset: u64,

    /// Byte used to pad the gap between the program and filesystem regions.
    pub fill: u8,

    /// Report sizes while merging.
    pub verbose: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            prog_image: None,
            fs_image: None,
            out_image: None,
            offset: 512,
            fill: 0,
            verbose: false,
        }
    }
}

/// Validate a raw `-offset` flag value and scale it to bytes.
///
/// The raw value is given in kilobyte units: 512, 1024 ... 32768. It must be
/// a whole number, a multiple of 512, and no larger than 32768. Find the
/// correct value for your board in its flash partition table.
pub fn validate_offset(raw: &str) -> Result<u64> {
    let Ok(offset) = raw.trim().parse::<u64>() else {
        bail!("Invalid offset {}. Must be a number", raw);
    };
    if offset % OFFSET_STEP != 0 {
        bail!("Invalid offset {}. Must be a multiple of {}", offset, OFFSET_STEP);
    }
    if offset > MAX_OFFSET {
        bail!(
            "Invalid offset {}. Must be between {} and {}",
            offset,
            OFFSET_STEP,
            MAX_OFFSET
        );
    }
    Ok(offset * ONE_KILOBYTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_scales_to_bytes() {
        assert_eq!(validate_offset("512").unwrap(), 512 * 1024);
        assert_eq!(validate_offset("1024").unwrap(), 1024 * 1024);
        assert_eq!(validate_offset("32768").unwrap(), 32768 * 1024);
    }

    #[test]
    fn rejects_non_multiple_of_512() {
        let err = validate_offset("513").unwrap_err();
        assert!(err.to_string().contains("multiple of 512"));
    }

    #[test]
    fn rejects_offset_above_maximum() {
        // 33280 is a multiple of 512 but past the upper bound
        let err = validate_offset("33280").unwrap_err();
        assert!(err.to_string().contains("between 512 and 32768"));
    }

    #[test]
    fn rejects_non_numeric_value() {
        assert!(validate_offset("lots").is_err());
        assert!(validate_offset("").is_err());
    }

    #[test]
    fn default_config_matches_tool_defaults() {
        let cfg = MergeConfig::default();
        assert_eq!(cfg.offset, 512);
        assert_eq!(cfg.fill, 0);
        assert!(!cfg.verbose);
    }
}
