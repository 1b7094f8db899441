//! Line-oriented chunk files.
//!
//! A chunk file holds one record per `\n`-terminated line. Records therefore must not contain line terminators
//! themselves; [`ChunkWriter`] rejects them instead of silently splitting a record in two.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io::{self, prelude::*};
use std::path::Path;

/// Chunk file error.
#[derive(Debug)]
pub enum ChunkError {
    /// Common I/O error.
    IO(io::Error),
    /// Record at the given (zero-based) position of the written stream contains a line terminator.
    InvalidRecord(usize),
}

impl Error for ChunkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self {
            ChunkError::IO(err) => Some(err),
            ChunkError::InvalidRecord(_) => None,
        }
    }
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            ChunkError::IO(err) => write!(f, "I/O operation failed: {}", err),
            ChunkError::InvalidRecord(ordinal) => write!(f, "record #{} contains a line terminator", ordinal),
        }
    }
}

impl From<io::Error> for ChunkError {
    fn from(err: io::Error) -> Self {
        ChunkError::IO(err)
    }
}

/// Buffered chunk file writer. Creates or truncates the file.
pub struct ChunkWriter {
    writer: io::BufWriter<fs::File>,
    written: usize,
}

impl ChunkWriter {
    /// Creates a chunk writer.
    ///
    /// # Arguments
    /// * `path` - File to write to
    /// * `buf_size` - Write buffer size, default [`io::BufWriter`] size if [`None`]
    pub fn create(path: &Path, buf_size: Option<usize>) -> io::Result<Self> {
        let file = fs::File::create(path)?;
        let writer = match buf_size {
            Some(buf_size) => io::BufWriter::with_capacity(buf_size, file),
            None => io::BufWriter::new(file),
        };

        return Ok(ChunkWriter { writer, written: 0 });
    }

    /// Appends a record as a new line.
    pub fn write(&mut self, record: &str) -> Result<(), ChunkError> {
        if record.contains(&['\n', '\r'][..]) {
            return Err(ChunkError::InvalidRecord(self.written));
        }

        self.writer.write_all(record.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.written += 1;

        return Ok(());
    }

    /// Number of records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes the file and returns the number of records written.
    pub fn finish(mut self) -> io::Result<usize> {
        self.writer.flush()?;
        return Ok(self.written);
    }
}

/// Chunk file reader. Yields records in file order.
///
/// End of data is signalled by [`None`], so an empty record is read back as an empty string.
pub struct ChunkReader {
    lines: io::Lines<io::BufReader<fs::File>>,
}

impl ChunkReader {
    pub fn open(path: &Path, buf_size: Option<usize>) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        let reader = match buf_size {
            Some(buf_size) => io::BufReader::with_capacity(buf_size, file),
            None => io::BufReader::new(file),
        };

        return Ok(ChunkReader { lines: reader.lines() });
    }
}

impl Iterator for ChunkReader {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next()
    }
}

/// Writes records to a chunk file one per line, overwriting its content.
/// Returns the number of records written.
pub fn write_chunk<I, S>(path: &Path, records: I, buf_size: Option<usize>) -> Result<usize, ChunkError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut writer = ChunkWriter::create(path, buf_size)?;
    for record in records {
        writer.write(record.as_ref())?;
    }

    return Ok(writer.finish()?);
}

/// Copies a chunk file line by line. Returns the number of records copied.
pub fn copy_file(from: &Path, to: &Path, buf_size: Option<usize>) -> Result<usize, ChunkError> {
    let reader = ChunkReader::open(from, buf_size)?;
    let mut writer = ChunkWriter::create(to, buf_size)?;
    for record in reader {
        writer.write(&record?)?;
    }

    return Ok(writer.finish()?);
}
