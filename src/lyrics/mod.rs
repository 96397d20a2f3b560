//! Lyrics model: lines, recorded timestamps and the output file format.

pub mod sheet;
pub mod timestamp;

pub use sheet::LyricSheet;
pub use timestamp::{split_tag, Timestamp};
