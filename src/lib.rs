//! imagemerge library
//!
//! Shared modules used by the imagemerge binary (option parsing, merge
//! configuration, the merge pipeline, size reporting)

pub mod config;
pub mod merge;
pub mod opt;
pub mod report;
