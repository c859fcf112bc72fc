use std::num::NonZeroUsize;
use std::ops::Range;

/// Splits `file_count` positions into exactly `workers` contiguous ranges.
///
/// Every range but the last holds `file_count / workers` positions; the last one runs to the
/// end and picks up the remainder. With fewer files than workers all leading ranges are empty.
pub fn plan_shards(file_count: usize, workers: NonZeroUsize) -> Vec<Range<usize>> {
    let workers = workers.get();
    let per_shard = file_count / workers;

    (0..workers)
        .map(|i| {
            let start = i * per_shard;
            let end = if i + 1 == workers {
                file_count
            } else {
                (i + 1) * per_shard
            };
            start..end
        })
        .collect()
}

/// Borrows `files` as the shards produced by [`plan_shards`]
pub fn shard_files<T>(files: &[T], workers: NonZeroUsize) -> Vec<&[T]> {
    plan_shards(files.len(), workers)
        .into_iter()
        .map(|range| &files[range])
        .collect()
}
