//! In-memory sorters.

use std::cmp::Ordering;

/// In-memory sorter interface. Defines the total order of records and sorts a bounded buffer of them in place.
///
/// The same [`InMemorySorter::compare`] is used when sorted chunks are merged, so an implementation overriding
/// [`InMemorySorter::sort`] must produce an order consistent with it.
pub trait InMemorySorter {
    /// Compares two records.
    fn compare(&self, a: &str, b: &str) -> Ordering;

    /// Sorts the buffer in place. Default implementation is a stable comparison sort.
    fn sort(&self, buffer: &mut [String]) {
        buffer.sort_by(|a, b| self.compare(a, b));
    }
}

impl<S: InMemorySorter + ?Sized> InMemorySorter for &S {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        (**self).compare(a, b)
    }

    fn sort(&self, buffer: &mut [String]) {
        (**self).sort(buffer)
    }
}

impl<S: InMemorySorter + ?Sized> InMemorySorter for Box<S> {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        (**self).compare(a, b)
    }

    fn sort(&self, buffer: &mut [String]) {
        (**self).sort(buffer)
    }
}

fn natural(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

fn reversed(a: &str, b: &str) -> Ordering {
    a.cmp(b).reverse()
}

/// Standard library stable sort using a custom compare function.
#[derive(Clone, Copy)]
pub struct StableSorter<F = fn(&str, &str) -> Ordering> {
    compare: F,
}

impl StableSorter {
    /// Lexicographic (byte) order.
    pub fn natural() -> Self {
        StableSorter { compare: natural }
    }

    /// Reversed lexicographic order.
    pub fn reversed() -> Self {
        StableSorter { compare: reversed }
    }
}

impl<F> StableSorter<F>
where
    F: Fn(&str, &str) -> Ordering,
{
    pub fn by(compare: F) -> Self {
        StableSorter { compare }
    }
}

impl Default for StableSorter {
    fn default() -> Self {
        StableSorter::natural()
    }
}

impl<F> InMemorySorter for StableSorter<F>
where
    F: Fn(&str, &str) -> Ordering,
{
    fn compare(&self, a: &str, b: &str) -> Ordering {
        (self.compare)(a, b)
    }
}

/// Parallel stable sort running in its own thread pool.
pub struct ParallelSorter<F = fn(&str, &str) -> Ordering> {
    thread_pool: rayon::ThreadPool,
    compare: F,
}

impl ParallelSorter {
    /// Creates a parallel sorter using lexicographic order.
    ///
    /// # Arguments
    /// * `threads_number` - Number of threads to sort with. If the parameter is [`None`]
    ///   threads number will be selected based on available CPU core number.
    pub fn natural(threads_number: Option<usize>) -> Result<Self, rayon::ThreadPoolBuildError> {
        ParallelSorter::by(threads_number, natural as fn(&str, &str) -> Ordering)
    }

    /// Creates a parallel sorter using reversed lexicographic order.
    pub fn reversed(threads_number: Option<usize>) -> Result<Self, rayon::ThreadPoolBuildError> {
        ParallelSorter::by(threads_number, reversed as fn(&str, &str) -> Ordering)
    }
}

impl<F> ParallelSorter<F>
where
    F: Fn(&str, &str) -> Ordering + Sync,
{
    /// Creates a parallel sorter using a custom compare function.
    pub fn by(threads_number: Option<usize>, compare: F) -> Result<Self, rayon::ThreadPoolBuildError> {
        let mut thread_pool_builder = rayon::ThreadPoolBuilder::new();

        if let Some(threads_number) = threads_number {
            log::info!("initializing thread-pool (threads: {})", threads_number);
            thread_pool_builder = thread_pool_builder.num_threads(threads_number);
        } else {
            log::info!("initializing thread-pool (threads: default)");
        }

        return Ok(ParallelSorter {
            thread_pool: thread_pool_builder.build()?,
            compare,
        });
    }
}

impl<F> InMemorySorter for ParallelSorter<F>
where
    F: Fn(&str, &str) -> Ordering + Sync,
{
    fn compare(&self, a: &str, b: &str) -> Ordering {
        (self.compare)(a, b)
    }

    fn sort(&self, buffer: &mut [String]) {
        use rayon::slice::ParallelSliceMut;

        let compare = &self.compare;
        self.thread_pool.install(|| {
            buffer.par_sort_by(|a, b| compare(a, b));
        });
    }
}
