use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path;

use env_logger;
use log;

use disk_sort::{DiskSorterBuilder, InMemorySorter, WordSource};

/// Orders words by length first, then alphabetically ignoring case.
struct ByLengthSorter;

impl InMemorySorter for ByLengthSorter {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.len()
            .cmp(&b.len())
            .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
    }
}

fn main() {
    env_logger::Builder::new().filter_level(log::LevelFilter::Info).init();

    let input = WordSource::new(io::BufReader::new(fs::File::open("speech.txt").unwrap())).with_trim_punctuation(true);

    let mut sorter = DiskSorterBuilder::new()
        .with_max_size(10)
        .with_work_dir(path::Path::new("sorting_run"))
        .with_sorter(ByLengthSorter)
        .build()
        .unwrap();

    sorter.sort(input, path::Path::new("sorting_run/words.sorted")).unwrap();
}
