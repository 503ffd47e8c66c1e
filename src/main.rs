//! Entry point for the `imagemerge` tool.
//!
//! imagemerge concatenates a program (firmware) image and a filesystem image
//! into one flash image, padding the gap between them with a fill byte.
//! Typical use is preparing a combined image for boards whose firmware and
//! filesystem partitions live at fixed flash addresses:
//!
//! ```bash
//! imagemerge -prog firmware.bin -fs littlefs.bin -image everything.bin -offset 1024 -v
//! ```
//!
//! The resulting file can be flashed in one pass at address 0x0.
//!
//! This file only handles CLI behavior and the exit-status policy. The merge
//! itself is implemented in `merge.rs`.

use std::env;
use std::process;

use imagemerge::config::{self, MergeConfig};
use imagemerge::merge;
use imagemerge::opt::{FlagOpt, OptParser, Parsed, ValueOpt};

/// Failure exit status. Help displays, including the ones reached through an
/// argument error, exit 0 instead.
const EXIT_FAILURE: i32 = -1;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        help(); // no options, show help
    }

    let mut cfg = MergeConfig::default();
    for parsed in OptParser::new(&args) {
        match parsed {
            Parsed::Value(ValueOpt::Prog, v) => cfg.prog_image = Some(v.to_string()),
            Parsed::Value(ValueOpt::Fs, v) => cfg.fs_image = Some(v.to_string()),
            Parsed::Value(ValueOpt::Image, v) => cfg.out_image = Some(v.to_string()),
            Parsed::Value(ValueOpt::Offset, v) => match config::validate_offset(v) {
                Ok(bytes) => cfg.offset = bytes,
                Err(err) => {
                    println!("{}", err);
                    process::exit(EXIT_FAILURE);
                }
            },
            Parsed::Value(ValueOpt::FillChar, v) => {
                // first byte of the value; an empty value falls back to NUL
                cfg.fill = v.bytes().next().unwrap_or(0);
            }
            Parsed::Flag(FlagOpt::Verbose) => cfg.verbose = true,
            Parsed::Flag(FlagOpt::Help) => help(),
            Parsed::MissingValue(name) => {
                println!("Missing value for -{}", name);
                help();
            }
            Parsed::NoOption(_) => {
                println!("No options given");
                help();
            }
            Parsed::NotFound(token) => {
                println!("{} illegal option", token);
                help();
            }
        }
    }

    if let Err(err) = merge::run_merge(&cfg) {
        println!("{}", err);
        process::exit(EXIT_FAILURE);
    }
}

/// Print the full usage text and exit cleanly. Argument errors land here too
/// after their diagnostic: every help display is a status-0 exit.
fn help() -> ! {
    println!("imagemerge {}", env!("CARGO_PKG_VERSION"));
    println!("Usage:");
    println!(" -prog <file_name>               Program image file");
    println!(" -fs <file_name>                 Filesystem image file name");
    println!(" -image <file_name>              Resulting image");
    println!(" [-offset <512, 1024 ... 32768>] Offset to FS start, default 1024");
    println!(" [-fillchar <value>]             Fill character between program image and FS, default 0");
    println!(" [-v]                            Verbose");
    println!(" [-h]                            This help");
    println!("Usage example:");
    println!("imagemerge -prog firmware.bin -fs littlefs.bin -image everything.bin -offset 512 -v");
    process::exit(0);
}
