//! Keyed, memoized background loads for multi-tab views.
//!
//! A view with several tabs creates one [`LazyLoader`] when it is shown,
//! prefetches every tab right away and calls [`LazyLoader::trigger`] again
//! whenever the user switches tabs. Each key is fetched at most once for
//! the lifetime of the loader:
//!
//! - a trigger while the request is in flight joins the same request,
//! - a trigger after success returns the cached value,
//! - a trigger after failure returns the recorded error; only
//!   [`LazyLoader::retry`] starts a new request for a failed key.
//!
//! Dropping the loader drops the cache. A request that completes after the
//! drop still resolves its handles, but its result is not recorded anywhere.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use futures::future::{self, BoxFuture, FutureExt, Shared};
use thiserror::Error;
use tracing::{debug, warn};

/// Failure of a load, cheap to clone so every waiter can receive it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LoadError {
    message: Arc<str>,
}

impl LoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Arc::from(message.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<anyhow::Error> for LoadError {
    fn from(err: anyhow::Error) -> Self {
        // Alternate format keeps the whole context chain on one line
        Self::new(format!("{:#}", err))
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Handle to a (possibly shared) load. The request runs whether or not the
/// handle is awaited.
pub type LoadHandle<T> = Shared<BoxFuture<'static, LoadResult<T>>>;

/// Snapshot of one key, for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    NotStarted,
    Loading,
    Ready(T),
    Failed(LoadError),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

enum Slot<T> {
    InFlight(LoadHandle<T>),
    Ready(T),
    Failed(LoadError),
}

type Table<K, T> = Mutex<HashMap<K, Slot<T>>>;

fn lock<K, T>(table: &Table<K, T>) -> MutexGuard<'_, HashMap<K, Slot<T>>> {
    // The table holds no invariants a panicking writer could break halfway
    table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct LazyLoader<K, T> {
    table: Arc<Table<K, T>>,
}

impl<K, T> Default for LazyLoader<K, T> {
    fn default() -> Self {
        Self {
            table: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K, T> LazyLoader<K, T>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a handle for `key`, calling `fetch` only if `key` was never
    /// started. A new request is driven on a tokio task, so it completes and
    /// is recorded even if every handle is dropped unpolled. `fetch` must
    /// only build the future; it runs under the loader's lock.
    ///
    /// Must be called from within a tokio runtime.
    pub fn trigger<F, Fut>(&self, key: K, fetch: F) -> LoadHandle<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let (handle, started) = self.trigger_inner(key, fetch);
        if started {
            let driver = handle.clone();
            tokio::spawn(async move {
                let _ = driver.await;
            });
        }
        handle
    }

    /// Trigger `key` without waiting for the result.
    pub fn prefetch<F, Fut>(&self, key: K, fetch: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let _ = self.trigger(key, fetch);
    }

    /// Start over for a key whose last load failed. Keys in any other state
    /// behave exactly as with [`trigger`](Self::trigger).
    pub fn retry<F, Fut>(&self, key: K, fetch: F) -> LoadHandle<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        {
            let mut table = lock(&self.table);
            if matches!(table.get(&key), Some(Slot::Failed(_))) {
                debug!(?key, "Retrying failed load");
                table.remove(&key);
            }
        }
        self.trigger(key, fetch)
    }

    pub fn state(&self, key: &K) -> LoadState<T> {
        match lock(&self.table).get(key) {
            None => LoadState::NotStarted,
            Some(Slot::InFlight(_)) => LoadState::Loading,
            Some(Slot::Ready(value)) => LoadState::Ready(value.clone()),
            Some(Slot::Failed(err)) => LoadState::Failed(err.clone()),
        }
    }

    pub fn is_started(&self, key: &K) -> bool {
        lock(&self.table).contains_key(key)
    }

    /// Forget a finished load so the next trigger fetches again.
    ///
    /// Returns `false` and changes nothing while the key is in flight, which
    /// keeps the single-request guarantee.
    pub fn invalidate(&self, key: &K) -> bool {
        let mut table = lock(&self.table);
        match table.get(key) {
            Some(Slot::InFlight(_)) | None => false,
            Some(_) => {
                table.remove(key);
                true
            }
        }
    }

    fn trigger_inner<F, Fut>(&self, key: K, fetch: F) -> (LoadHandle<T>, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let mut table = lock(&self.table);
        match table.get(&key) {
            Some(Slot::InFlight(handle)) => return (handle.clone(), false),
            Some(Slot::Ready(value)) => return (future::ready(Ok(value.clone())).boxed().shared(), false),
            Some(Slot::Failed(err)) => return (future::ready(Err(err.clone())).boxed().shared(), false),
            None => {}
        }

        debug!(?key, "Starting load");
        let handle = Self::record_on_completion(Arc::downgrade(&self.table), key.clone(), fetch());
        table.insert(key, Slot::InFlight(handle.clone()));
        (handle, true)
    }

    fn record_on_completion<Fut>(table: Weak<Table<K, T>>, key: K, request: Fut) -> LoadHandle<T>
    where
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        async move {
            let result = request.await.map_err(LoadError::from);
            match table.upgrade() {
                Some(table) => {
                    let slot = match &result {
                        Ok(value) => {
                            debug!(?key, "Load finished");
                            Slot::Ready(value.clone())
                        }
                        Err(err) => {
                            warn!(?key, error = %err, "Load failed");
                            Slot::Failed(err.clone())
                        }
                    };
                    lock(&table).insert(key, slot);
                }
                None => debug!(?key, "Loader dropped before load finished, discarding result"),
            }
            result
        }
        .boxed()
        .shared()
    }
}
