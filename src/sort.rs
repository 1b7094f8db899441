//! On-disk sorter.

use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::chunk::{copy_file, write_chunk, ChunkError, ChunkWriter};
use crate::merger::merge_files;
use crate::sorter::{InMemorySorter, StableSorter};
use crate::workdir::WorkDir;
use crate::{ChunkBuffer, ChunkBufferBuilder, LimitedBufferBuilder};

/// Number of records per chunk used when no limit is configured.
pub const DEFAULT_MAX_SIZE: usize = 100_000;

/// Sorting error.
#[derive(Debug)]
pub enum SortError<I: Error = io::Error> {
    /// Working directory creation error.
    WorkDir(io::Error),
    /// Common I/O error.
    IO(io::Error),
    /// Input data stream error.
    InputError(I),
    /// Chunk size is zero.
    InvalidChunkSize,
    /// Input record at the given (zero-based) position contains a line terminator.
    InvalidRecord(usize),
    /// Output file is one of the sorter's own temporary files.
    InvalidOutput(PathBuf),
}

impl<I> Error for SortError<I>
where
    I: Error + 'static,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self {
            SortError::WorkDir(err) => Some(err),
            SortError::IO(err) => Some(err),
            SortError::InputError(err) => Some(err),
            SortError::InvalidChunkSize => None,
            SortError::InvalidRecord(_) => None,
            SortError::InvalidOutput(_) => None,
        }
    }
}

impl<I: Error> Display for SortError<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            SortError::WorkDir(err) => write!(f, "working directory not created: {}", err),
            SortError::IO(err) => write!(f, "I/O operation failed: {}", err),
            SortError::InputError(err) => write!(f, "input data stream error: {}", err),
            SortError::InvalidChunkSize => write!(f, "chunk size must be a positive number"),
            SortError::InvalidRecord(ordinal) => write!(f, "input record #{} contains a line terminator", ordinal),
            SortError::InvalidOutput(path) => {
                write!(f, "output file {} collides with a temporary file", path.display())
            }
        }
    }
}

impl<I: Error> From<ChunkError> for SortError<I> {
    fn from(err: ChunkError) -> Self {
        match err {
            ChunkError::IO(err) => SortError::IO(err),
            ChunkError::InvalidRecord(ordinal) => SortError::InvalidRecord(ordinal),
        }
    }
}

/// Outcome of a successful sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSummary {
    /// Number of records sorted.
    pub records: usize,
    /// Number of chunk files created.
    pub chunks: usize,
    /// Number of two-way merges performed.
    pub merges: usize,
}

/// On-disk sorter builder. Provides methods for [`DiskSorter`] initialization.
pub struct DiskSorterBuilder<S = StableSorter, B = LimitedBufferBuilder>
where
    S: InMemorySorter,
    B: ChunkBufferBuilder<String>,
{
    /// Directory to be used to store temporary data.
    work_dir: Option<PathBuf>,
    /// Chunk file read/write buffer size.
    rw_buf_size: Option<usize>,
    /// In-memory chunk sorter.
    sorter: S,
    /// Chunk buffer builder.
    buffer_builder: B,
}

impl DiskSorterBuilder {
    /// Creates an instance of a builder with default parameters: lexicographic order,
    /// [`DEFAULT_MAX_SIZE`] records per chunk and a fresh directory in the OS temporary directory.
    pub fn new() -> Self {
        DiskSorterBuilder::default()
    }
}

impl Default for DiskSorterBuilder {
    fn default() -> Self {
        DiskSorterBuilder {
            work_dir: None,
            rw_buf_size: None,
            sorter: StableSorter::natural(),
            buffer_builder: LimitedBufferBuilder::new(DEFAULT_MAX_SIZE, false),
        }
    }
}

impl<S> DiskSorterBuilder<S, LimitedBufferBuilder>
where
    S: InMemorySorter,
{
    /// Sets the maximum number of records sorted in memory and stored in a single chunk file.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.buffer_builder = LimitedBufferBuilder::new(max_size, false);
        return self;
    }
}

impl<S, B> DiskSorterBuilder<S, B>
where
    S: InMemorySorter,
    B: ChunkBufferBuilder<String>,
{
    /// Builds a [`DiskSorter`] instance using provided configuration.
    /// The working directory is created if it doesn't exist.
    pub fn build(self) -> Result<DiskSorter<S, B>, SortError> {
        if self.buffer_builder.has_zero_limit() {
            return Err(SortError::InvalidChunkSize);
        }

        let work_dir = match &self.work_dir {
            Some(path) => WorkDir::open(path),
            None => WorkDir::temporary(None),
        }
        .map_err(SortError::WorkDir)?;

        return Ok(DiskSorter {
            sorter: self.sorter,
            work_dir,
            buffer_builder: self.buffer_builder,
            rw_buf_size: self.rw_buf_size,
        });
    }

    /// Sets directory to be used to store temporary data. It is created on build if missing and kept afterwards.
    pub fn with_work_dir(mut self, path: &Path) -> Self {
        self.work_dir = Some(path.into());
        return self;
    }

    /// Sets chunk read/write buffer size.
    pub fn with_rw_buf_size(mut self, buf_size: usize) -> Self {
        self.rw_buf_size = Some(buf_size);
        return self;
    }

    /// Sets the in-memory sorter. Its order is the order of the result.
    pub fn with_sorter<S2: InMemorySorter>(self, sorter: S2) -> DiskSorterBuilder<S2, B> {
        DiskSorterBuilder {
            work_dir: self.work_dir,
            rw_buf_size: self.rw_buf_size,
            sorter,
            buffer_builder: self.buffer_builder,
        }
    }

    /// Sets buffer builder. Replaces the limit set by [`DiskSorterBuilder::with_max_size`].
    pub fn with_buffer<B2: ChunkBufferBuilder<String>>(self, buffer_builder: B2) -> DiskSorterBuilder<S, B2> {
        DiskSorterBuilder {
            work_dir: self.work_dir,
            rw_buf_size: self.rw_buf_size,
            sorter: self.sorter,
            buffer_builder,
        }
    }
}

/// On-disk sorter.
///
/// Splits the input into chunks, sorts every chunk in memory and stores it in the working directory,
/// then folds the chunks one by one into a merge accumulator which is finally copied to the output.
/// A sorter exclusively owns its working directory; two sorters must not share one.
pub struct DiskSorter<S = StableSorter, B = LimitedBufferBuilder>
where
    S: InMemorySorter,
    B: ChunkBufferBuilder<String>,
{
    /// In-memory chunk sorter.
    sorter: S,
    /// Directory to be used to store temporary data.
    work_dir: WorkDir,
    /// Chunk buffer builder.
    buffer_builder: B,
    /// Chunk file read/write buffer size.
    rw_buf_size: Option<usize>,
}

impl<S> DiskSorter<S, LimitedBufferBuilder>
where
    S: InMemorySorter,
{
    /// Creates a new on-disk sorter instance.
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of records in a chunk, must be positive
    /// * `work_dir` - Directory to store temporary files in, created if it doesn't exist
    /// * `sorter` - In-memory sorter used to sort chunks
    pub fn new(max_size: usize, work_dir: &Path, sorter: S) -> Result<Self, SortError> {
        DiskSorterBuilder::new()
            .with_max_size(max_size)
            .with_work_dir(work_dir)
            .with_sorter(sorter)
            .build()
    }
}

impl<S, B> DiskSorter<S, B>
where
    S: InMemorySorter,
    B: ChunkBufferBuilder<String>,
{
    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    /// Removes temporary files left behind by a failed sort.
    pub fn clear(&mut self) -> io::Result<usize> {
        self.work_dir.cleanup()
    }

    /// Sorts records from the input and writes them to `output`, one record per line.
    /// The output file is created or overwritten.
    ///
    /// The output must not be one of the working directory temporary files.
    /// Any error aborts sorting. Temporary files are removed only when sorting succeeds,
    /// see [`DiskSorter::clear`].
    ///
    /// # Arguments
    /// * `records` - Input records, none of them may contain a line terminator
    /// * `output` - Destination file
    pub fn sort<I, E>(&mut self, records: I, output: &Path) -> Result<SortSummary, SortError<E>>
    where
        I: IntoIterator<Item = Result<String, E>>,
        E: Error,
    {
        if self.work_dir.owns(output) {
            return Err(SortError::InvalidOutput(output.to_path_buf()));
        }

        let mut chunk_buf = self.buffer_builder.build();
        let mut chunks = Vec::new();
        let mut total = 0;

        for item in records.into_iter() {
            let record = item.map_err(SortError::InputError)?;
            if record.contains(&['\n', '\r'][..]) {
                return Err(SortError::InvalidRecord(total));
            }

            chunk_buf.push(record);
            total += 1;

            if chunk_buf.is_full() {
                chunks.push(self.create_chunk(chunk_buf, chunks.len())?);
                chunk_buf = self.buffer_builder.build();
            }
        }

        if !chunk_buf.is_empty() {
            chunks.push(self.create_chunk(chunk_buf, chunks.len())?);
        }

        log::debug!("split done: {} records in {} chunks", total, chunks.len());

        let merges = self.merge_chunks(&chunks, output)?;
        self.work_dir.cleanup().map_err(SortError::IO)?;

        log::info!(
            "sorted {} records into {} ({} chunks, {} merges)",
            total,
            output.display(),
            chunks.len(),
            merges
        );

        return Ok(SortSummary {
            records: total,
            chunks: chunks.len(),
            merges,
        });
    }

    fn create_chunk(&mut self, mut buffer: B::Buffer, ordinal: usize) -> Result<PathBuf, ChunkError> {
        log::debug!("sorting chunk #{} ({} records) ...", ordinal, buffer.len());
        self.sorter.sort(buffer.as_mut_slice());

        let path = self.work_dir.chunk_path(ordinal);
        log::debug!("saving chunk data to {}", path.display());
        write_chunk(&path, buffer, self.rw_buf_size)?;

        return Ok(path);
    }

    /// Folds chunks into the accumulator in creation order and copies the result to `output`.
    /// Returns the number of merges performed.
    fn merge_chunks(&mut self, chunks: &[PathBuf], output: &Path) -> Result<usize, ChunkError> {
        let (first, rest) = match chunks.split_first() {
            Some(split) => split,
            None => {
                ChunkWriter::create(output, self.rw_buf_size).and_then(ChunkWriter::finish)?;
                return Ok(0);
            }
        };

        if rest.is_empty() {
            log::debug!("single chunk, copying it to the output");
            copy_file(first, output, self.rw_buf_size)?;
            return Ok(0);
        }

        let accumulator = self.work_dir.accumulator_path();
        let merge = self.work_dir.merge_path();
        let sorter = &self.sorter;
        let compare = |a: &str, b: &str| sorter.compare(a, b);

        copy_file(first, &accumulator, self.rw_buf_size)?;

        for (idx, chunk) in rest.iter().enumerate() {
            let merged = merge_files(&accumulator, chunk, &merge, compare, self.rw_buf_size)?;
            // the merge target can't be the file being read, so the result is moved over the accumulator
            fs::rename(&merge, &accumulator)?;
            log::debug!("chunk #{} merged, accumulator holds {} records", idx + 1, merged);
        }

        copy_file(&accumulator, output, self.rw_buf_size)?;

        return Ok(rest.len());
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::cmp::Ordering;
    use std::fs;
    use std::io;
    use std::path::Path;

    use rand::seq::SliceRandom;
    use rstest::*;

    use super::{DiskSorter, DiskSorterBuilder, SortError, SortSummary};
    use crate::buffer::LimitedBufferBuilder;
    use crate::sorter::{InMemorySorter, ParallelSorter, StableSorter};

    #[fixture]
    fn tmp_dir() -> tempfile::TempDir {
        tempfile::tempdir_in("./").unwrap()
    }

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path).unwrap().lines().map(String::from).collect()
    }

    fn temp_files(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with("tempfile"))
            .collect()
    }

    fn input_of(records: &[&str]) -> Vec<Result<String, io::Error>> {
        records.iter().map(|r| Ok(String::from(*r))).collect()
    }

    /// Remembers every buffer right after sorting it.
    struct RecordingSorter {
        sorted: RefCell<Vec<Vec<String>>>,
    }

    impl InMemorySorter for RecordingSorter {
        fn compare(&self, a: &str, b: &str) -> Ordering {
            a.cmp(b)
        }

        fn sort(&self, buffer: &mut [String]) {
            buffer.sort();
            self.sorted.borrow_mut().push(buffer.to_vec());
        }
    }

    #[rstest]
    #[case(1, false)]
    #[case(7, false)]
    #[case(7, true)]
    #[case(100, false)]
    #[case(250, true)]
    fn test_disk_sorter(tmp_dir: tempfile::TempDir, #[case] max_size: usize, #[case] reversed: bool) {
        let input_sorted = Vec::from_iter((0..100).map(|i| format!("{:03}", i)));

        let mut input_shuffled = input_sorted.clone();
        input_shuffled.shuffle(&mut rand::thread_rng());
        let input: Vec<Result<String, io::Error>> = Vec::from_iter(input_shuffled.into_iter().map(Ok));

        let sorter = if reversed {
            StableSorter::reversed()
        } else {
            StableSorter::natural()
        };
        let mut disk_sorter = DiskSorter::new(max_size, &tmp_dir.path().join("work"), sorter).unwrap();

        let output = tmp_dir.path().join("data.sorted");
        let summary = disk_sorter.sort(input, &output).unwrap();

        let expected_chunks = (100 + max_size - 1) / max_size;
        assert_eq!(
            summary,
            SortSummary {
                records: 100,
                chunks: expected_chunks,
                merges: expected_chunks - 1,
            }
        );

        let mut expected_result = input_sorted;
        if reversed {
            expected_result.reverse();
        }
        assert_eq!(read_lines(&output), expected_result);
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn test_disk_sorter_stability(tmp_dir: tempfile::TempDir, #[case] reversed: bool) {
        // records are compared by the first character only, the digit keeps the input order
        let compare: fn(&str, &str) -> Ordering = if reversed {
            |a, b| a[..1].cmp(&b[..1]).reverse()
        } else {
            |a, b| a[..1].cmp(&b[..1])
        };
        let mut disk_sorter = DiskSorter::new(3, tmp_dir.path(), StableSorter::by(compare)).unwrap();

        let output = tmp_dir.path().join("out.txt");
        let input = input_of(&["b0", "a1", "b2", "a3", "b4", "a5", "b6", "a7"]);
        let summary = disk_sorter.sort(input, &output).unwrap();

        assert_eq!(summary.chunks, 3);
        assert_eq!(summary.merges, 2);

        let expected_result = if reversed {
            vec!["b0", "b2", "b4", "b6", "a1", "a3", "a5", "a7"]
        } else {
            vec!["a1", "a3", "a5", "a7", "b0", "b2", "b4", "b6"]
        };
        assert_eq!(read_lines(&output), expected_result);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(4)]
    #[case(5)]
    #[case(8)]
    #[case(33)]
    fn test_disk_sorter_conserves_records(tmp_dir: tempfile::TempDir, #[case] records_number: usize) {
        // duplicates and empty records included
        let mut input = Vec::from_iter((0..records_number).map(|i| match i % 5 {
            0 => String::new(),
            n => format!("r{}", n),
        }));
        input.shuffle(&mut rand::thread_rng());

        let mut disk_sorter = DiskSorter::new(4, tmp_dir.path(), StableSorter::natural()).unwrap();
        let output = tmp_dir.path().join("out.txt");
        let summary = disk_sorter
            .sort(input.iter().cloned().map(Ok::<_, io::Error>), &output)
            .unwrap();

        let mut expected = input;
        expected.sort();
        assert_eq!(summary.records, records_number);
        assert_eq!(read_lines(&output), expected);
    }

    #[rstest]
    fn test_chunk_boundary(tmp_dir: tempfile::TempDir) {
        let sorter = RecordingSorter {
            sorted: RefCell::new(Vec::new()),
        };
        let mut disk_sorter = DiskSorter::new(3, tmp_dir.path(), &sorter).unwrap();

        let output = tmp_dir.path().join("out.txt");
        let summary = disk_sorter
            .sort(input_of(&["d", "b", "a", "c", "f", "e"]), &output)
            .unwrap();

        assert_eq!(
            summary,
            SortSummary {
                records: 6,
                chunks: 2,
                merges: 1
            }
        );
        assert_eq!(*sorter.sorted.borrow(), vec![vec!["a", "b", "d"], vec!["c", "e", "f"]]);
        assert_eq!(read_lines(&output), vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[rstest]
    fn test_empty_input(tmp_dir: tempfile::TempDir) {
        let mut disk_sorter = DiskSorter::new(3, tmp_dir.path(), StableSorter::natural()).unwrap();

        let output = tmp_dir.path().join("out.txt");
        fs::write(&output, "stale\n").unwrap();

        let summary = disk_sorter.sort(input_of(&[]), &output).unwrap();

        assert_eq!(
            summary,
            SortSummary {
                records: 0,
                chunks: 0,
                merges: 0
            }
        );
        assert_eq!(fs::read_to_string(&output).unwrap(), "");
        assert!(temp_files(tmp_dir.path()).is_empty());
    }

    #[rstest]
    fn test_single_chunk_is_copied(tmp_dir: tempfile::TempDir) {
        let mut disk_sorter = DiskSorter::new(3, tmp_dir.path(), StableSorter::natural()).unwrap();

        let output = tmp_dir.path().join("out.txt");
        let summary = disk_sorter.sort(input_of(&["c", "a", "b"]), &output).unwrap();

        assert_eq!(summary.chunks, 1);
        assert_eq!(summary.merges, 0);
        assert_eq!(read_lines(&output), vec!["a", "b", "c"]);
    }

    #[rstest]
    fn test_cleanup(tmp_dir: tempfile::TempDir) {
        let unrelated = tmp_dir.path().join("notes.tempfile");
        fs::write(&unrelated, "keep me\n").unwrap();

        let mut disk_sorter = DiskSorter::new(2, tmp_dir.path(), StableSorter::natural()).unwrap();
        let output = tmp_dir.path().join("out.txt");
        disk_sorter.sort(input_of(&["e", "d", "c", "b", "a"]), &output).unwrap();

        assert_eq!(temp_files(tmp_dir.path()), vec!["notes.tempfile"]);
        assert_eq!(fs::read_to_string(&unrelated).unwrap(), "keep me\n");
        assert!(tmp_dir.path().is_dir());
    }

    #[rstest]
    fn test_sorter_reuse(tmp_dir: tempfile::TempDir) {
        let mut disk_sorter = DiskSorter::new(2, tmp_dir.path(), StableSorter::natural()).unwrap();

        let first = tmp_dir.path().join("first.txt");
        let second = tmp_dir.path().join("second.txt");
        disk_sorter.sort(input_of(&["z", "y", "x", "w", "v"]), &first).unwrap();
        disk_sorter.sort(input_of(&["b", "a"]), &second).unwrap();

        assert_eq!(read_lines(&first), vec!["v", "w", "x", "y", "z"]);
        assert_eq!(read_lines(&second), vec!["a", "b"]);
    }

    #[rstest]
    fn test_input_error(tmp_dir: tempfile::TempDir) {
        let mut disk_sorter = DiskSorter::new(2, tmp_dir.path(), StableSorter::natural()).unwrap();

        let input = vec![
            Ok("b".to_string()),
            Ok("a".to_string()),
            Err(io::Error::new(io::ErrorKind::Other, "test error")),
        ];
        let output = tmp_dir.path().join("out.txt");
        let result = disk_sorter.sort(input, &output);

        assert!(matches!(result, Err(SortError::InputError(_))));
        assert!(!output.exists());
        // temporary files are left behind until explicitly cleared
        assert_eq!(temp_files(tmp_dir.path()), vec!["0.tempfile"]);
        assert_eq!(disk_sorter.clear().unwrap(), 1);
        assert!(temp_files(tmp_dir.path()).is_empty());
    }

    #[rstest]
    fn test_invalid_record(tmp_dir: tempfile::TempDir) {
        let mut disk_sorter = DiskSorter::new(2, tmp_dir.path(), StableSorter::natural()).unwrap();

        let output = tmp_dir.path().join("out.txt");
        let result = disk_sorter.sort(input_of(&["a", "b", "c", "two\nlines"]), &output);

        assert!(matches!(result, Err(SortError::InvalidRecord(3))));
    }

    #[rstest]
    fn test_invalid_chunk_size(tmp_dir: tempfile::TempDir) {
        let result = DiskSorter::new(0, tmp_dir.path(), StableSorter::natural());
        assert!(matches!(result, Err(SortError::InvalidChunkSize)));
    }

    #[rstest]
    fn test_zero_limit_buffer_rejected(tmp_dir: tempfile::TempDir) {
        let result = DiskSorterBuilder::new()
            .with_work_dir(tmp_dir.path())
            .with_buffer(LimitedBufferBuilder::new(0, false))
            .build();
        assert!(matches!(result, Err(SortError::InvalidChunkSize)));

        let result = DiskSorterBuilder::new()
            .with_max_size(5)
            .with_buffer(LimitedBufferBuilder::new(1, false))
            .with_work_dir(tmp_dir.path())
            .build();
        assert!(result.is_ok());
    }

    #[rstest]
    #[case("0.tempfile", 1)]
    #[case("0.tempfile", 2)]
    #[case("accumulator.tempfile", 2)]
    fn test_output_collides_with_temp_file(
        tmp_dir: tempfile::TempDir,
        #[case] file_name: &str,
        #[case] max_size: usize,
    ) {
        let mut disk_sorter = DiskSorter::new(max_size, tmp_dir.path(), StableSorter::natural()).unwrap();

        let output = tmp_dir.path().join(file_name);
        let result = disk_sorter.sort(input_of(&["c", "b", "a"]), &output);

        assert!(matches!(result, Err(SortError::InvalidOutput(path)) if path == output));
        assert!(!output.exists());
        assert!(temp_files(tmp_dir.path()).is_empty());

        // an unrelated name with the same suffix is a valid output
        let output = tmp_dir.path().join("sorted.tempfile");
        disk_sorter.sort(input_of(&["c", "b", "a"]), &output).unwrap();
        assert_eq!(read_lines(&output), vec!["a", "b", "c"]);
    }

    #[rstest]
    fn test_output_error(tmp_dir: tempfile::TempDir) {
        let mut disk_sorter = DiskSorter::new(2, tmp_dir.path(), StableSorter::natural()).unwrap();

        let output = tmp_dir.path().join("missing").join("out.txt");
        let result = disk_sorter.sort(input_of(&["b", "a", "c"]), &output);

        assert!(matches!(result, Err(SortError::IO(_))));
    }

    #[rstest]
    fn test_builder(tmp_dir: tempfile::TempDir) {
        let work_dir = tmp_dir.path().join("sorting_run");
        let mut disk_sorter = DiskSorterBuilder::new()
            .with_max_size(16)
            .with_work_dir(&work_dir)
            .with_rw_buf_size(64)
            .with_sorter(ParallelSorter::reversed(Some(2)).unwrap())
            .build()
            .unwrap();
        assert!(work_dir.is_dir());
        assert_eq!(disk_sorter.work_dir(), work_dir.as_path());

        let mut input = Vec::from_iter((0..50).map(|i| format!("{:02}", i)));
        input.shuffle(&mut rand::thread_rng());

        let output = tmp_dir.path().join("out.txt");
        let summary = disk_sorter.sort(input.into_iter().map(Ok::<_, io::Error>), &output).unwrap();

        assert_eq!(summary.chunks, 4);
        assert_eq!(read_lines(&output), Vec::from_iter((0..50).rev().map(|i| format!("{:02}", i))));
    }

    #[test]
    fn test_default_work_dir_is_temporary() {
        let disk_sorter = DiskSorterBuilder::new().build().unwrap();
        let path = disk_sorter.work_dir().to_path_buf();
        assert!(path.is_dir());

        drop(disk_sorter);
        assert!(!path.exists());
    }

    #[cfg(feature = "memory-limit")]
    #[rstest]
    fn test_memory_limited_buffer(tmp_dir: tempfile::TempDir) {
        use crate::buffer::mem::MemoryLimitedBufferBuilder;

        // three 6-byte records fill a 90 bytes buffer
        let mut disk_sorter = DiskSorterBuilder::new()
            .with_work_dir(tmp_dir.path())
            .with_buffer(MemoryLimitedBufferBuilder::new(90))
            .build()
            .unwrap();

        let output = tmp_dir.path().join("out.txt");
        let input = input_of(&["record", "recorc", "recorb", "recora", "recor9"]);
        let summary = disk_sorter.sort(input, &output).unwrap();

        assert_eq!(summary.chunks, 2);
        assert_eq!(read_lines(&output), vec!["recor9", "recora", "recorb", "recorc", "record"]);
    }
}
