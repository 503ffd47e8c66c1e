//! merge module: the whole pipeline from input images to the written flash
//! image.
//!
//! The merge performs, in order:
//!   1. Read the program image fully into memory
//!   2. Read the filesystem image
//!   3. Reject layouts where the program would run into the filesystem region
//!   4. Compose the output buffer (fill byte, program at 0, filesystem at
//!      the configured offset)
//!   5. Write the image and verify the size on disk
//!
//! Every buffer is owned by exactly one binding and dropped once copied
//! onward, so an early error return cannot leak a sibling buffer.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};

use anyhow::{bail, Context, Result};

use crate::config::MergeConfig;
use crate::report::format_size;

/// File size via a metadata lookup, 0 for anything missing or unreadable.
pub fn file_size(path: &str) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a binary file into an exactly-sized buffer.
///
/// The length comes from a metadata lookup before allocation, so the buffer
/// never over- or under-reads. A nonexistent file and a zero-length file are
/// the same failure here: either way there is nothing to merge.
pub fn read_image(path: &str) -> Result<Vec<u8>> {
    let len = file_size(path);
    if len == 0 {
        bail!("Cannot read {}", path);
    }
    let mut buf = vec![0u8; len as usize];
    let mut file = File::open(path).with_context(|| format!("Cannot read {}", path))?;
    file.read_exact(&mut buf)
        .with_context(|| format!("Cannot read {}", path))?;
    Ok(buf)
}

/// Write the composed image in one call, truncating any previous file.
pub fn write_image(path: &str, image: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Cannot create {}", path))?;
    file.write_all(image)
        .with_context(|| format!("Error writing to {}", path))?;
    Ok(())
}

/// Place both images into one buffer of length `offset + fs_image.len()`.
///
/// The gap between the program and filesystem regions (and any slack after
/// the program, if the filesystem image is the shorter part) holds the fill
/// byte. Callers must have rejected `prog.len() > offset` already;
/// `run_merge` does so before composing.
pub fn compose(prog: &[u8], fs_image: &[u8], offset: usize, fill: u8) -> Vec<u8> {
    let mut image = vec![fill; offset + fs_image.len()];
    image[..prog.len()].copy_from_slice(prog);
    image[offset..offset + fs_image.len()].copy_from_slice(fs_image);
    image
}

/// Run the full merge described by `cfg`.
///
/// Both inputs are read before anything is written, so a failed read leaves
/// the output path untouched. The size verification after the write is
/// advisory: a mismatch prints a diagnostic but is not an error.
pub fn run_merge(cfg: &MergeConfig) -> Result<()> {
    if cfg.verbose {
        println!("Offset {} / {:#x}", cfg.offset, cfg.offset);
    }

    // ---------------------------------------------------------
    // 1) Program image
    // ---------------------------------------------------------
    let Some(prog_name) = cfg.prog_image.as_deref() else {
        bail!("No program image file given");
    };
    let prog = read_image(prog_name)?;
    if cfg.verbose {
        println!("{}, size {}", prog_name, format_size(prog.len() as u64));
    }

    // ---------------------------------------------------------
    // 2) Filesystem image
    // ---------------------------------------------------------
    let Some(fs_name) = cfg.fs_image.as_deref() else {
        bail!("No filesystem image file given");
    };
    let fs_image = read_image(fs_name)?;
    if cfg.verbose {
        println!("{}, size {}", fs_name, format_size(fs_image.len() as u64));
    }

    // ---------------------------------------------------------
    // 3) Layout check
    // ---------------------------------------------------------
    if prog.len() as u64 > cfg.offset {
        bail!(
            "Program image is {} bytes and overlaps the filesystem region at offset {}",
            prog.len(),
            cfg.offset
        );
    }

    // ---------------------------------------------------------
    // 4) Compose the merged image
    // ---------------------------------------------------------
    let Some(out_name) = cfg.out_image.as_deref() else {
        bail!("No output image file given");
    };
    let image = compose(&prog, &fs_image, cfg.offset as usize, cfg.fill);

    // ---------------------------------------------------------
    // 5) Write and verify
    // ---------------------------------------------------------
    write_image(out_name, &image)?;
    if file_size(out_name) != image.len() as u64 {
        println!("Error writing to {}", out_name);
    }
    if cfg.verbose {
        println!("{}, size {}", out_name, format_size(image.len() as u64));
    }
    Ok(())
}
