//! Admin panel: user management, report moderation and the image pool.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use futures::future::{BoxFuture, FutureExt};

use canaiguess_core::models::{Report, UserSummary};
use canaiguess_core::{ApiClient, LoadState};

use crate::app::TaskSender;

use super::form::{TextInput, MAX_PATH_LENGTH};
use super::{step_selection, TabKey, TabLoads};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminTab {
    Users,
    Reports,
    Images,
}

impl TabKey for AdminTab {
    fn all() -> &'static [Self] {
        &[AdminTab::Users, AdminTab::Reports, AdminTab::Images]
    }

    fn title(&self) -> &'static str {
        match self {
            AdminTab::Users => "Users",
            AdminTab::Reports => "Reports",
            AdminTab::Images => "Images",
        }
    }
}

impl AdminTab {
    /// The list shown by this tab, if it shows one
    pub fn list(&self) -> Option<AdminList> {
        match self {
            AdminTab::Users => Some(AdminList::Users),
            AdminTab::Reports => Some(AdminList::Reports),
            AdminTab::Images => None,
        }
    }
}

/// Server-side lists loaded by the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminList {
    Users,
    Reports,
}

impl TabKey for AdminList {
    fn all() -> &'static [Self] {
        &[AdminList::Users, AdminList::Reports]
    }

    fn title(&self) -> &'static str {
        match self {
            AdminList::Users => "Users",
            AdminList::Reports => "Reports",
        }
    }
}

#[derive(Debug, Clone)]
pub enum AdminData {
    Users(Vec<UserSummary>),
    Reports(Vec<Report>),
}

impl AdminData {
    pub fn len(&self) -> usize {
        match self {
            AdminData::Users(rows) => rows.len(),
            AdminData::Reports(rows) => rows.len(),
        }
    }
}

fn fetch(api: &ApiClient, list: AdminList) -> BoxFuture<'static, Result<AdminData>> {
    let api = api.clone();
    async move {
        match list {
            AdminList::Users => api.fetch_all_users().await.map(AdminData::Users),
            AdminList::Reports => api.fetch_unresolved_reports().await.map(AdminData::Reports),
        }
    }
    .boxed()
}

fn action(list: AdminList) -> &'static str {
    match list {
        AdminList::Users => "Load users",
        AdminList::Reports => "Load reports",
    }
}

/// Focus within the images tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFocus {
    Path,
    Label,
    Upload,
    DeleteId,
    Delete,
}

impl ImageFocus {
    pub fn next(&self) -> Self {
        match self {
            ImageFocus::Path => ImageFocus::Label,
            ImageFocus::Label => ImageFocus::Upload,
            ImageFocus::Upload => ImageFocus::DeleteId,
            ImageFocus::DeleteId => ImageFocus::Delete,
            ImageFocus::Delete => ImageFocus::Path,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ImageFocus::Path => ImageFocus::Delete,
            ImageFocus::Label => ImageFocus::Path,
            ImageFocus::Upload => ImageFocus::Label,
            ImageFocus::DeleteId => ImageFocus::Upload,
            ImageFocus::Delete => ImageFocus::DeleteId,
        }
    }
}

/// Upload and delete forms of the images tab
#[derive(Debug)]
pub struct ImageTools {
    pub path: TextInput,
    /// Label for the upload: AI-generated when true
    pub fake: bool,
    pub delete_id: TextInput,
    pub focus: ImageFocus,
}

impl Default for ImageTools {
    fn default() -> Self {
        Self {
            path: TextInput::new("Image file", MAX_PATH_LENGTH),
            fake: false,
            delete_id: TextInput::new("Image id", 19),
            focus: ImageFocus::Path,
        }
    }
}

impl ImageTools {
    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            ImageFocus::Path => Some(&mut self.path),
            ImageFocus::DeleteId => Some(&mut self.delete_id),
            _ => None,
        }
    }

    pub fn upload_request(&self) -> Result<(PathBuf, bool)> {
        let path = self.path.value.trim();
        if path.is_empty() {
            return Err(anyhow!("choose an image file"));
        }
        let path = PathBuf::from(path);
        if !path.is_file() {
            return Err(anyhow!("no such file: {}", path.display()));
        }
        Ok((path, self.fake))
    }

    pub fn delete_request(&self) -> Result<i64> {
        self.delete_id
            .value
            .trim()
            .parse()
            .map_err(|_| anyhow!("image id must be a number"))
    }
}

pub struct AdminView {
    pub tab: AdminTab,
    pub selection: usize,
    pub images: ImageTools,
    loads: TabLoads<AdminList, AdminData>,
}

impl AdminView {
    pub fn mount(api: &ApiClient, tasks: &TaskSender) -> Self {
        let api = api.clone();
        let loads = TabLoads::new(tasks.clone(), Box::new(move |list| fetch(&api, list)), action);
        loads.load_all(AdminList::all());
        Self {
            tab: AdminTab::Users,
            selection: 0,
            images: ImageTools::default(),
            loads,
        }
    }

    pub fn select_tab(&mut self, tab: AdminTab) {
        if tab != self.tab {
            self.tab = tab;
            self.selection = 0;
        }
        if let Some(list) = tab.list() {
            self.loads.load(list);
        }
    }

    pub fn retry(&self) {
        if let Some(list) = self.tab.list() {
            self.loads.retry(list);
        }
    }

    /// Refetch a list after an action changed it
    pub fn reload(&mut self, list: AdminList) {
        self.loads.reload(list);
        if self.tab.list() == Some(list) {
            self.selection = 0;
        }
    }

    pub fn tick(&mut self) {
        self.loads.flush_pending();
    }

    /// Load state of the current tab's list; `None` on the images tab
    pub fn state(&self) -> Option<LoadState<AdminData>> {
        self.tab.list().map(|list| self.loads.state(list))
    }

    pub fn move_selection(&mut self, down: bool) {
        let len = match self.state() {
            Some(LoadState::Ready(data)) => data.len(),
            _ => 0,
        };
        self.selection = step_selection(self.selection, len, down);
    }

    pub fn selected_user(&self) -> Option<UserSummary> {
        match self.loads.state(AdminList::Users) {
            LoadState::Ready(AdminData::Users(users)) if self.tab == AdminTab::Users => {
                users.into_iter().nth(self.selection)
            }
            _ => None,
        }
    }

    pub fn selected_report(&self) -> Option<Report> {
        match self.loads.state(AdminList::Reports) {
            LoadState::Ready(AdminData::Reports(reports)) if self.tab == AdminTab::Reports => {
                reports.into_iter().nth(self.selection)
            }
            _ => None,
        }
    }

    /// Whether a text field of the images tab has focus
    pub fn editing_text(&self) -> bool {
        self.tab == AdminTab::Images
            && matches!(self.images.focus, ImageFocus::Path | ImageFocus::DeleteId)
    }
}
