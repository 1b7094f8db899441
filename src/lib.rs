//! `disk-sort` sorts line-oriented text on disk.
//!
//! It is meant for inputs that are too large, or deliberately not supposed, to be held in memory at once.
//! The input is split into chunks of at most `max_size` records, every chunk is sorted in memory by a pluggable
//! [`InMemorySorter`] and stored as a temporary file in a working directory. The chunk files are then folded one by
//! one into a single running merge accumulator using a linear two-way merge, and the accumulator is finally copied
//! to the output file. For more information see [External Sorting](https://en.wikipedia.org/wiki/External_sorting).
//!
//! # Overview
//!
//! * **Pluggable in-memory sort:**
//!   chunks are sorted by any [`InMemorySorter`]; its comparison also drives merging so both always agree.
//!   [`StableSorter`] and the multi-threaded [`ParallelSorter`] are provided.
//! * **Cascading merge:**
//!   merging costs *n* \* *k* record moves for *k* chunks, memory usage stays constant.
//! * **Scoped cleanup:**
//!   only temporary files created by the sorter are removed, the working directory itself is kept.
//! * **Memory limit support:**
//!   chunks can be limited by consumed memory instead of record count (`memory-limit` feature required).
//!
//! # Example
//!
//! ```no_run
//! use std::fs;
//! use std::io;
//! use std::path::Path;
//!
//! use disk_sort::{DiskSorter, LineSource, StableSorter};
//!
//! fn main() {
//!     let input = LineSource::new(io::BufReader::new(fs::File::open("input.txt").unwrap()));
//!
//!     let mut sorter = DiskSorter::new(10_000, Path::new("sorting_run"), StableSorter::natural()).unwrap();
//!     let summary = sorter.sort(input, Path::new("output.txt")).unwrap();
//!
//!     println!("{} records sorted", summary.records);
//! }
//! ```

pub mod buffer;
pub mod chunk;
pub mod merger;
pub mod sort;
pub mod sorter;
pub mod source;
pub mod workdir;

pub use buffer::{ChunkBuffer, ChunkBufferBuilder, LimitedBuffer, LimitedBufferBuilder};
pub use chunk::{copy_file, write_chunk, ChunkError, ChunkReader, ChunkWriter};
pub use merger::{merge_files, TwoWayMerger};
pub use sort::{DiskSorter, DiskSorterBuilder, SortError, SortSummary};
pub use sorter::{InMemorySorter, ParallelSorter, StableSorter};
pub use source::{LineSource, WordSource};
pub use workdir::WorkDir;
