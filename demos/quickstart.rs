use std::fs;
use std::io;
use std::path;

use env_logger;
use log;

use disk_sort::{DiskSorter, LineSource, StableSorter};

fn main() {
    env_logger::Builder::new().filter_level(log::LevelFilter::Debug).init();

    let input = LineSource::new(io::BufReader::new(fs::File::open("input.txt").unwrap()));

    let mut sorter = DiskSorter::new(10_000, path::Path::new("sorting_run"), StableSorter::natural()).unwrap();
    let summary = sorter.sort(input, path::Path::new("output.txt")).unwrap();

    log::info!(
        "{} records sorted ({} chunks, {} merges)",
        summary.records,
        summary.chunks,
        summary.merges
    );
}
