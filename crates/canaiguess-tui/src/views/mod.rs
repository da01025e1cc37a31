//! Screen state for every route.
//!
//! Each module owns the local state of one screen (selection, forms, the
//! data it fetched). Rendering lives in `ui::screens`, keyboard handling in
//! `ui::input`. A view is built when its route is mounted and dropped when
//! the user navigates away, taking its loads with it.

pub mod admin;
pub mod auth;
pub mod form;
pub mod game;
pub mod leaderboard;
pub mod menu;
pub mod profile;

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use anyhow::Result;
use futures::future::BoxFuture;
use tracing::debug;

use canaiguess_core::{LazyLoader, LoadState};

use crate::app::TaskSender;

pub use admin::AdminView;
pub use auth::{LoginView, RegisterView};
pub use game::{GameView, ResultsView};
pub use leaderboard::LeaderboardView;
pub use menu::{LandingView, MenuView};
pub use profile::ProfileView;

/// The mounted screen
pub enum View {
    Landing(LandingView),
    Login(LoginView),
    Register(RegisterView),
    Menu(MenuView),
    Game(GameView),
    Results(ResultsView),
    Leaderboard(LeaderboardView),
    Profile(ProfileView),
    Admin(AdminView),
}

impl View {
    /// Whether printable keys go to a text field instead of the global bindings.
    pub fn captures_text(&self) -> bool {
        match self {
            View::Login(_) | View::Register(_) => true,
            View::Profile(view) => view.edit.is_some(),
            View::Admin(view) => view.editing_text(),
            _ => false,
        }
    }

    /// Housekeeping on every pass of the UI loop.
    pub fn tick(&mut self) {
        if let View::Admin(view) = self {
            view.tick();
        }
    }
}

// ============================================================================
// Tabs
// ============================================================================

/// A switchable section of a view.
pub trait TabKey: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Every tab, in display order
    fn all() -> &'static [Self];

    fn title(&self) -> &'static str;

    fn next(&self) -> Self {
        let all = Self::all();
        let pos = all.iter().position(|t| t == self).unwrap_or(0);
        all[(pos + 1) % all.len()]
    }

    fn prev(&self) -> Self {
        let all = Self::all();
        let pos = all.iter().position(|t| t == self).unwrap_or(0);
        all[(pos + all.len() - 1) % all.len()]
    }
}

/// Builds the request for one tab.
pub type Fetcher<K, T> = Box<dyn Fn(K) -> BoxFuture<'static, Result<T>>>;

/// Per-tab data of one view: a [`LazyLoader`] plus what it needs to start
/// requests. Failures also reach the status bar through the task channel.
pub struct TabLoads<K, T> {
    loader: LazyLoader<K, T>,
    tasks: TaskSender,
    fetch: Fetcher<K, T>,
    action: fn(K) -> &'static str,
    /// Reloads asked for while the key was still loading
    pending: HashSet<K>,
}

impl<K, T> TabLoads<K, T>
where
    K: TabKey,
    T: Clone + Send + Sync + 'static,
{
    pub fn new(tasks: TaskSender, fetch: Fetcher<K, T>, action: fn(K) -> &'static str) -> Self {
        Self {
            loader: LazyLoader::new(),
            tasks,
            fetch,
            action,
            pending: HashSet::new(),
        }
    }

    /// Start loading `key` in the background unless it was already started.
    pub fn load(&self, key: K) {
        self.loader
            .prefetch(key, || self.tasks.reporting((self.action)(key), (self.fetch)(key)));
    }

    /// Load every key in `keys`, in order.
    pub fn load_all(&self, keys: &[K]) {
        for &key in keys {
            self.load(key);
        }
    }

    /// Fetch again a key whose load failed.
    pub fn retry(&self, key: K) {
        let _ = self
            .loader
            .retry(key, || self.tasks.reporting((self.action)(key), (self.fetch)(key)));
    }

    /// Drop a finished result and fetch it again, after an action changed it.
    /// A load still running may predate the change, so the reload waits for
    /// it and starts from [`flush_pending`](Self::flush_pending).
    pub fn reload(&mut self, key: K) {
        if !self.loader.invalidate(&key) && self.loader.is_started(&key) {
            debug!(?key, "Reload queued behind running load");
            self.pending.insert(key);
            return;
        }
        self.load(key);
    }

    /// Start the queued reloads whose earlier load has finished.
    pub fn flush_pending(&mut self) {
        let finished: Vec<K> = self
            .pending
            .iter()
            .copied()
            .filter(|key| !self.loader.state(key).is_loading())
            .collect();
        for key in finished {
            self.pending.remove(&key);
            self.reload(key);
        }
    }

    pub fn state(&self, key: K) -> LoadState<T> {
        self.loader.state(&key)
    }
}

/// Move a selection up or down within `len` items.
pub fn step_selection(selection: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        0
    } else if down {
        (selection + 1).min(len - 1)
    } else {
        selection.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use futures::FutureExt;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Sample {
        A,
        B,
        C,
    }

    impl TabKey for Sample {
        fn all() -> &'static [Self] {
            &[Sample::A, Sample::B, Sample::C]
        }

        fn title(&self) -> &'static str {
            "sample"
        }
    }

    #[test]
    fn test_tab_next_wraps() {
        assert_eq!(Sample::A.next(), Sample::B);
        assert_eq!(Sample::C.next(), Sample::A);
    }

    #[test]
    fn test_tab_prev_wraps() {
        assert_eq!(Sample::A.prev(), Sample::C);
        assert_eq!(Sample::B.prev(), Sample::A);
    }

    #[test]
    fn test_step_selection() {
        assert_eq!(step_selection(0, 0, true), 0);
        assert_eq!(step_selection(0, 3, true), 1);
        assert_eq!(step_selection(2, 3, true), 2);
        assert_eq!(step_selection(0, 3, false), 0);
        assert_eq!(step_selection(2, 3, false), 1);
    }

    fn counting_loads(calls: Arc<AtomicUsize>) -> TabLoads<Sample, usize> {
        TabLoads::new(
            TaskSender::detached(),
            Box::new(move |_key| {
                let calls = calls.clone();
                async move { Ok(calls.fetch_add(1, Ordering::SeqCst) + 1) }.boxed()
            }),
            |_| "Load sample",
        )
    }

    async fn wait_ready(loads: &TabLoads<Sample, usize>, key: Sample) -> usize {
        for _ in 0..200 {
            if let LoadState::Ready(value) = loads.state(key) {
                return value;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("load of {:?} never finished", key);
    }

    #[tokio::test]
    async fn test_tab_loads_fetch_each_key_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loads = counting_loads(calls.clone());

        assert_eq!(loads.state(Sample::A), LoadState::NotStarted);
        loads.load(Sample::A);
        loads.load(Sample::A);
        assert_ne!(loads.state(Sample::A), LoadState::NotStarted);
        assert_eq!(loads.state(Sample::B), LoadState::NotStarted);

        assert_eq!(wait_ready(&loads, Sample::A).await, 1);
        loads.load(Sample::A);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    async fn wait_for(loads: &TabLoads<Sample, usize>, key: Sample, expected: LoadState<usize>) {
        for _ in 0..200 {
            if loads.state(key) == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("{:?} never reached {:?}, still {:?}", key, expected, loads.state(key));
    }

    #[tokio::test]
    async fn test_tab_loads_retry_after_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let loads: TabLoads<Sample, usize> = TabLoads::new(
            TaskSender::detached(),
            Box::new(move |_key| {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n == 1 {
                        Err(anyhow::anyhow!("connection refused"))
                    } else {
                        Ok(n)
                    }
                }
                .boxed()
            }),
            |_| "Load sample",
        );

        loads.load(Sample::B);
        for _ in 0..200 {
            if matches!(loads.state(Sample::B), LoadState::Failed(_)) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        match loads.state(Sample::B) {
            LoadState::Failed(err) => {
                assert_eq!(err.message(), "Load sample failed: connection refused")
            }
            other => panic!("expected failure, got {:?}", other),
        }

        // Coming back to the tab keeps the error
        loads.load(Sample::B);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        loads.retry(Sample::B);
        wait_for(&loads, Sample::B, LoadState::Ready(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_tab_loads_reload_while_loading_runs_afterwards() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut loads: TabLoads<Sample, usize> = TabLoads::new(
            TaskSender::detached(),
            Box::new(move |_key| {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n == 1 {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                    }
                    Ok(n)
                }
                .boxed()
            }),
            |_| "Load sample",
        );

        loads.load(Sample::A);
        loads.reload(Sample::A);
        loads.flush_pending();
        assert_eq!(loads.state(Sample::A), LoadState::Loading);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        wait_for(&loads, Sample::A, LoadState::Ready(1)).await;
        loads.flush_pending();
        wait_for(&loads, Sample::A, LoadState::Ready(2)).await;

        loads.flush_pending();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_tab_loads_reload_fetches_again() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut loads = counting_loads(calls.clone());

        loads.load(Sample::C);
        assert_eq!(wait_ready(&loads, Sample::C).await, 1);
        loads.reload(Sample::C);
        assert_eq!(wait_ready(&loads, Sample::C).await, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
