//! Batched task runner
//!
//! Splits work into fixed-size groups and runs each group concurrently,
//! one group after the other.

use futures::future::try_join_all;
use std::future::Future;

/// Runs `task` over `items` in sequential batches of concurrent tasks
///
/// Items are split into `ceil(N / batch_size)` contiguous groups in their
/// original order. Every task of a group runs concurrently; the next group
/// starts only after the whole group has settled. After each group,
/// `on_batch_complete(index, total)` is called.
///
/// The first task error is returned immediately: the remaining tasks of that
/// group are dropped and no later group is started.
///
/// # Arguments
///
/// * `items` - Work items, consumed in order
/// * `batch_size` - Maximum tasks in flight at once (0 is treated as 1)
/// * `task` - Async operation run for each item
/// * `on_batch_complete` - Progress callback with (group index, group count)
///
/// # Returns
///
/// The task results in item order, or the first error.
pub async fn run_batched<T, R, E, F, Fut, C>(
    items: Vec<T>,
    batch_size: usize,
    task: F,
    mut on_batch_complete: C,
) -> Result<Vec<R>, E>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    C: FnMut(usize, usize),
{
    let batch_size = batch_size.max(1);
    let total = items.len().div_ceil(batch_size);
    let mut results = Vec::with_capacity(items.len());
    let mut remaining = items.into_iter();

    for index in 0..total {
        let group = remaining.by_ref().take(batch_size).map(&task);
        results.extend(try_join_all(group).await?);
        on_batch_complete(index, total);
    }

    Ok(results)
}
