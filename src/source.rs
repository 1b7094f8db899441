//! Record sources.
//!
//! Any `IntoIterator<Item = Result<String, E>>` can feed the sorter. This module provides the two common text
//! sources: one record per line and one record per word.

use std::collections::VecDeque;
use std::io::{self, BufRead};

/// Yields every line of the reader as a record, without its line terminator.
pub struct LineSource<R: BufRead> {
    lines: io::Lines<R>,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        LineSource { lines: reader.lines() }
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next()
    }
}

/// Splits the reader into whitespace-delimited words and yields every word as a record.
pub struct WordSource<R: BufRead> {
    lines: io::Lines<R>,
    pending: VecDeque<String>,
    trim_punctuation: bool,
    lowercase: bool,
}

impl<R: BufRead> WordSource<R> {
    pub fn new(reader: R) -> Self {
        WordSource {
            lines: reader.lines(),
            pending: VecDeque::new(),
            trim_punctuation: false,
            lowercase: false,
        }
    }

    /// Strips leading and trailing ASCII punctuation from words. Words consisting only of punctuation are skipped.
    pub fn with_trim_punctuation(mut self, trim_punctuation: bool) -> Self {
        self.trim_punctuation = trim_punctuation;
        return self;
    }

    /// Converts words to lowercase.
    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        return self;
    }

    fn normalize(&self, word: &str) -> Option<String> {
        let word = if self.trim_punctuation {
            word.trim_matches(|c: char| c.is_ascii_punctuation())
        } else {
            word
        };

        if word.is_empty() {
            None
        } else if self.lowercase {
            Some(word.to_lowercase())
        } else {
            Some(word.to_string())
        }
    }
}

impl<R: BufRead> Iterator for WordSource<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(word) = self.pending.pop_front() {
                return Some(Ok(word));
            }

            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err)),
            };
            let words: Vec<String> = line.split_whitespace().filter_map(|word| self.normalize(word)).collect();
            self.pending.extend(words);
        }
    }
}
