//! Leaderboard with a score tab and an accuracy tab.
//!
//! Both tabs start loading as soon as the view is shown, so switching tabs
//! normally finds the data ready.

use futures::FutureExt;

use canaiguess_core::models::{AccuracyEntry, LeaderboardEntry};
use canaiguess_core::{ApiClient, LoadState};

use crate::app::TaskSender;

use super::{step_selection, TabKey, TabLoads};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeaderboardTab {
    Score,
    Accuracy,
}

impl TabKey for LeaderboardTab {
    fn all() -> &'static [Self] {
        &[LeaderboardTab::Score, LeaderboardTab::Accuracy]
    }

    fn title(&self) -> &'static str {
        match self {
            LeaderboardTab::Score => "Score",
            LeaderboardTab::Accuracy => "Accuracy",
        }
    }
}

#[derive(Debug, Clone)]
pub enum LeaderboardData {
    Score(Vec<LeaderboardEntry>),
    Accuracy(Vec<AccuracyEntry>),
}

impl LeaderboardData {
    pub fn len(&self) -> usize {
        match self {
            LeaderboardData::Score(rows) => rows.len(),
            LeaderboardData::Accuracy(rows) => rows.len(),
        }
    }
}

fn fetch(api: &ApiClient, tab: LeaderboardTab) -> futures::future::BoxFuture<'static, anyhow::Result<LeaderboardData>> {
    let api = api.clone();
    async move {
        match tab {
            LeaderboardTab::Score => api.fetch_leaderboard().await.map(LeaderboardData::Score),
            LeaderboardTab::Accuracy => api
                .fetch_accuracy_leaderboard()
                .await
                .map(LeaderboardData::Accuracy),
        }
    }
    .boxed()
}

fn action(tab: LeaderboardTab) -> &'static str {
    match tab {
        LeaderboardTab::Score => "Load leaderboard",
        LeaderboardTab::Accuracy => "Load accuracy leaderboard",
    }
}

pub struct LeaderboardView {
    pub tab: LeaderboardTab,
    pub selection: usize,
    loads: TabLoads<LeaderboardTab, LeaderboardData>,
}

impl LeaderboardView {
    pub fn mount(api: &ApiClient, tasks: &TaskSender) -> Self {
        let api = api.clone();
        let loads = TabLoads::new(tasks.clone(), Box::new(move |tab| fetch(&api, tab)), action);
        loads.load_all(LeaderboardTab::all());
        Self {
            tab: LeaderboardTab::Score,
            selection: 0,
            loads,
        }
    }

    pub fn select_tab(&mut self, tab: LeaderboardTab) {
        if tab != self.tab {
            self.tab = tab;
            self.selection = 0;
        }
        self.loads.load(tab);
    }

    pub fn retry(&self) {
        self.loads.retry(self.tab);
    }

    pub fn state(&self) -> LoadState<LeaderboardData> {
        self.loads.state(self.tab)
    }

    pub fn move_selection(&mut self, down: bool) {
        let len = self.state().ready().map(LeaderboardData::len).unwrap_or(0);
        self.selection = step_selection(self.selection, len, down);
    }
}
