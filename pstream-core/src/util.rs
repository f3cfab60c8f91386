use std::future::Future;

/// Run `op` over `items` in fixed-size batches.
///
/// Items within a batch run concurrently; batches run one after another, so
/// at most `batch_size` operations are in flight. A failed item is logged
/// and dropped without aborting its siblings.
pub async fn batched_filter_map<T, R, E, F, Fut>(items: Vec<T>, batch_size: usize, op: F) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = std::result::Result<R, E>>,
    E: std::fmt::Display,
{
    let batch_size = batch_size.max(1);
    let mut out = Vec::with_capacity(items.len());

    let mut iter = items.into_iter().peekable();
    while iter.peek().is_some() {
        let batch: Vec<T> = iter.by_ref().take(batch_size).collect();
        let results = futures::future::join_all(batch.into_iter().map(&op)).await;
        for result in results {
            match result {
                Ok(value) => out.push(value),
                Err(e) => tracing::debug!("Batched item failed: {e}"),
            }
        }
    }
    out
}
