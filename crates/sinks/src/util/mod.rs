//! File helpers for the rotating sink
//!
//! - **segment**: output file naming and a byte-counting buffered writer
//! - **gzip**: compress a closed file to a `.gz` sibling

pub mod gzip;
pub mod segment;

pub use gzip::{compress_file, compress_file_blocking, gz_path};
pub use segment::{SegmentWriter, segment_path};
