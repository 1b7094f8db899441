//! Two-way merger.

use std::cmp::Ordering;
use std::error::Error;
use std::iter::Fuse;
use std::marker::PhantomData;
use std::path::Path;

use crate::chunk::{ChunkError, ChunkReader, ChunkWriter};

/// Two-way merger implementation.
/// Merges two sorted inputs into a single sorted output.
/// Time complexity is *n* + *m* where *n* and *m* are the lengths of the inputs;
/// only the current head of each input is kept in memory.
///
/// On equal items the left one is emitted first.
pub struct TwoWayMerger<T, E, L, R, F>
where
    E: Error,
    L: Iterator<Item = Result<T, E>>,
    R: Iterator<Item = Result<T, E>>,
    F: Fn(&T, &T) -> Ordering,
{
    left: Fuse<L>,
    right: Fuse<R>,
    left_head: Option<T>,
    right_head: Option<T>,
    compare: F,
    initiated: bool,
    failed: bool,

    error_type: PhantomData<E>,
}

impl<T, E, L, R, F> TwoWayMerger<T, E, L, R, F>
where
    E: Error,
    L: Iterator<Item = Result<T, E>>,
    R: Iterator<Item = Result<T, E>>,
    F: Fn(&T, &T) -> Ordering,
{
    /// Creates an instance of a two-way merger.
    /// Both inputs should be sorted according to `compare` otherwise the result is undefined.
    ///
    /// # Arguments
    /// * `left` - Input winning ties
    /// * `right` - Second input
    /// * `compare` - Function to be used to compare items
    pub fn new<IL, IR>(left: IL, right: IR, compare: F) -> Self
    where
        IL: IntoIterator<Item = Result<T, E>, IntoIter = L>,
        IR: IntoIterator<Item = Result<T, E>, IntoIter = R>,
    {
        return TwoWayMerger {
            left: left.into_iter().fuse(),
            right: right.into_iter().fuse(),
            left_head: None,
            right_head: None,
            compare,
            initiated: false,
            failed: false,
            error_type: PhantomData,
        };
    }

    fn advance_left(&mut self) -> Result<(), E> {
        self.left_head = self.left.next().transpose()?;
        return Ok(());
    }

    fn advance_right(&mut self) -> Result<(), E> {
        self.right_head = self.right.next().transpose()?;
        return Ok(());
    }

    fn next_item(&mut self) -> Result<Option<T>, E> {
        if !self.initiated {
            self.initiated = true;
            self.advance_left()?;
            self.advance_right()?;
        }

        let take_left = match (&self.left_head, &self.right_head) {
            (None, None) => return Ok(None),
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some(left), Some(right)) => (self.compare)(left, right) != Ordering::Greater,
        };

        return if take_left {
            let item = self.left_head.take();
            self.advance_left()?;
            Ok(item)
        } else {
            let item = self.right_head.take();
            self.advance_right()?;
            Ok(item)
        };
    }
}

impl<T, E, L, R, F> Iterator for TwoWayMerger<T, E, L, R, F>
where
    E: Error,
    L: Iterator<Item = Result<T, E>>,
    R: Iterator<Item = Result<T, E>>,
    F: Fn(&T, &T) -> Ordering,
{
    type Item = Result<T, E>;

    /// Returns the next item from the inputs in ascending order.
    /// After an input error is returned the merger is exhausted.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.next_item() {
            Ok(item) => item.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Merges two sorted chunk files into `out`, which must be a different file than both inputs.
/// Returns the number of records written.
pub fn merge_files<F>(
    left: &Path,
    right: &Path,
    out: &Path,
    compare: F,
    buf_size: Option<usize>,
) -> Result<usize, ChunkError>
where
    F: Fn(&str, &str) -> Ordering,
{
    let merger = TwoWayMerger::new(
        ChunkReader::open(left, buf_size)?,
        ChunkReader::open(right, buf_size)?,
        |a: &String, b: &String| compare(a, b),
    );

    let mut writer = ChunkWriter::create(out, buf_size)?;
    for record in merger {
        writer.write(&record?)?;
    }

    return Ok(writer.finish()?);
}

#[cfg(test)]
mod test {
    use rstest::*;
    use std::error::Error;
    use std::fs;
    use std::io::{self, ErrorKind};

    use super::{merge_files, TwoWayMerger};
    use crate::chunk::write_chunk;

    #[rstest]
    #[case(vec![], vec![], vec![])]
    #[case(vec![], vec![Ok(1)], vec![Ok(1)])]
    #[case(vec![Ok(1)], vec![], vec![Ok(1)])]
    #[case(
        vec![Ok(1), Ok(3), Ok(5), Ok(7)],
        vec![Ok(2), Ok(4), Ok(6)],
        vec![Ok(1), Ok(2), Ok(3), Ok(4), Ok(5), Ok(6), Ok(7)],
    )]
    #[case(
        vec![Ok(1), Ok(1), Ok(8)],
        vec![Ok(1), Ok(9)],
        vec![Ok(1), Ok(1), Ok(1), Ok(8), Ok(9)],
    )]
    #[case(
        vec![Result::Err(io::Error::new(ErrorKind::Other, "test error"))],
        vec![Ok(1)],
        vec![Result::Err(io::Error::new(ErrorKind::Other, "test error"))],
    )]
    #[case(
        vec![Ok(1), Ok(2)],
        vec![Ok(3), Result::Err(io::Error::new(ErrorKind::Other, "test error")), Ok(4)],
        vec![Ok(1), Ok(2), Result::Err(io::Error::new(ErrorKind::Other, "test error"))],
    )]
    fn test_merger(
        #[case] left: Vec<Result<i32, io::Error>>,
        #[case] right: Vec<Result<i32, io::Error>>,
        #[case] expected_result: Vec<Result<i32, io::Error>>,
    ) {
        let merger = TwoWayMerger::new(left, right, i32::cmp);
        let actual_result = merger.collect();
        assert!(
            compare_vectors_of_result::<_, io::Error>(&actual_result, &expected_result),
            "actual={:?}, expected={:?}",
            actual_result,
            expected_result
        );
    }

    #[test]
    fn test_merger_left_wins_ties() {
        let left: Vec<Result<(i32, char), io::Error>> = vec![Ok((1, 'l')), Ok((2, 'l'))];
        let right: Vec<Result<(i32, char), io::Error>> = vec![Ok((1, 'r')), Ok((2, 'r'))];

        let merger = TwoWayMerger::new(left, right, |a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0));
        let actual: Result<Vec<_>, _> = merger.collect();

        assert_eq!(actual.unwrap(), vec![(1, 'l'), (1, 'r'), (2, 'l'), (2, 'r')]);
    }

    #[fixture]
    fn tmp_dir() -> tempfile::TempDir {
        tempfile::tempdir_in("./").unwrap()
    }

    #[rstest]
    #[case(vec!["b"], vec!["a"], "a\nb\n")]
    #[case(vec!["a"], vec!["a"], "a\na\n")]
    #[case(vec!["a", "c", "e"], vec![], "a\nc\ne\n")]
    #[case(vec![], vec!["a", "c", "e"], "a\nc\ne\n")]
    #[case(vec![], vec![], "")]
    #[case(vec!["", "b"], vec!["", "a"], "\n\na\nb\n")]
    fn test_merge_files(
        tmp_dir: tempfile::TempDir,
        #[case] left: Vec<&str>,
        #[case] right: Vec<&str>,
        #[case] expected: &str,
    ) {
        let left_path = tmp_dir.path().join("left.tempfile");
        let right_path = tmp_dir.path().join("right.tempfile");
        let out_path = tmp_dir.path().join("out.tempfile");

        write_chunk(&left_path, &left, None).unwrap();
        write_chunk(&right_path, &right, None).unwrap();

        let written = merge_files(&left_path, &right_path, &out_path, |a, b| a.cmp(b), None).unwrap();

        assert_eq!(written, left.len() + right.len());
        assert_eq!(fs::read_to_string(&out_path).unwrap(), expected);
    }

    #[rstest]
    fn test_merge_files_custom_order(tmp_dir: tempfile::TempDir) {
        let left_path = tmp_dir.path().join("left.tempfile");
        let right_path = tmp_dir.path().join("right.tempfile");
        let out_path = tmp_dir.path().join("out.tempfile");

        write_chunk(&left_path, ["z", "m", "a"], None).unwrap();
        write_chunk(&right_path, ["y", "b"], None).unwrap();

        merge_files(&left_path, &right_path, &out_path, |a, b| a.cmp(b).reverse(), None).unwrap();

        assert_eq!(fs::read_to_string(&out_path).unwrap(), "z\ny\nm\nb\na\n");
    }

    fn compare_vectors_of_result<T: PartialEq, E: Error + 'static>(
        actual: &Vec<Result<T, E>>,
        expected: &Vec<Result<T, E>>,
    ) -> bool {
        actual.len() == expected.len()
            && actual
                .into_iter()
                .zip(expected)
                .all(
                    |(actual_result, expected_result)| match (actual_result, expected_result) {
                        (Ok(actual_result), Ok(expected_result)) if actual_result == expected_result => true,
                        (Err(actual_err), Err(expected_err)) => actual_err.to_string() == expected_err.to_string(),
                        _ => false,
                    },
                )
    }
}
