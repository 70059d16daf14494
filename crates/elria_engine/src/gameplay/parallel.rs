//! Fixed-split fork-join updates
//!
//! A slice is cut into at most `workers` contiguous ranges. Each range is
//! handed to its own scoped thread as a disjoint `&mut` sub-slice, and the
//! caller blocks until every worker has joined. There is no work stealing and
//! no locking; the exclusive borrow keeps the slice from being resized while
//! workers run.

use std::num::NonZeroUsize;
use std::ops::Range;
use std::thread;

use super::GameplayError;

/// Number of workers to use: the requested count, else the machine's parallelism
///
/// Always at least 1.
pub fn worker_count(requested: Option<usize>) -> usize {
    match requested {
        Some(count) => count.max(1),
        None => thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1),
    }
}

/// Split `0..len` into contiguous ranges, one per effective worker
///
/// The last range absorbs the remainder. An empty input yields no ranges.
pub fn partition_ranges(len: usize, workers: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let effective = workers.clamp(1, len);
    let per_worker = len / effective;

    (0..effective)
        .map(|i| {
            let start = i * per_worker;
            let end = if i == effective - 1 { len } else { start + per_worker };
            start..end
        })
        .collect()
}

/// Run `f` over every item, split across `workers` scoped threads
///
/// All workers are joined before returning. Panicking workers are counted and
/// reported as [`GameplayError::WorkerPanicked`].
pub fn parallel_update<T, F>(items: &mut [T], workers: usize, f: F) -> Result<(), GameplayError>
where
    T: Send,
    F: Fn(&mut T) + Sync,
{
    let ranges = partition_ranges(items.len(), workers);
    if ranges.is_empty() {
        return Ok(());
    }

    let f = &f;
    let panicked = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(ranges.len());
        let mut rest = items;
        for range in &ranges {
            let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
            rest = tail;
            handles.push(scope.spawn(move || chunk.iter_mut().for_each(f)));
        }
        handles
            .into_iter()
            .map(|handle| handle.join())
            .filter(|joined| joined.is_err())
            .count()
    });

    if panicked > 0 {
        log::error!("{} of {} update workers panicked", panicked, ranges.len());
        return Err(GameplayError::WorkerPanicked { count: panicked });
    }
    Ok(())
}
