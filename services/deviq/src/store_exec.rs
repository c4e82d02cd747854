use std::sync::Arc;
use tokio::sync::Mutex;

/// Run `f` against the shared store on the blocking pool, holding the lock
/// for the whole call so appends and aggregation reads never overlap.
pub async fn with_store_blocking<S, R, F>(
    store: Arc<Mutex<S>>,
    f: F,
) -> Result<R, tokio::task::JoinError>
where
    S: Send + 'static,
    R: Send + 'static,
    F: FnOnce(&mut S) -> R + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = store.blocking_lock();
        f(&mut *guard)
    })
    .await
}
