//! The signed-in player's stats, recent games and account settings.

use anyhow::{anyhow, Result};
use futures::future::{BoxFuture, FutureExt};

use canaiguess_core::models::{GameSummary, UpdateUserRequest, UserStats};
use canaiguess_core::{ApiClient, LoadState};

use crate::app::TaskSender;

use super::form::{Form, TextInput, MAX_EMAIL_LENGTH, MAX_PASSWORD_LENGTH};
use super::{step_selection, TabKey, TabLoads};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileTab {
    Stats,
    RecentGames,
}

impl TabKey for ProfileTab {
    fn all() -> &'static [Self] {
        &[ProfileTab::Stats, ProfileTab::RecentGames]
    }

    fn title(&self) -> &'static str {
        match self {
            ProfileTab::Stats => "Stats",
            ProfileTab::RecentGames => "Recent games",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ProfileData {
    Stats(UserStats),
    RecentGames(Vec<GameSummary>),
}

const EMAIL: usize = 0;
const PASSWORD: usize = 1;
const CONFIRM: usize = 2;

pub struct ProfileView {
    pub username: String,
    pub tab: ProfileTab,
    pub selection: usize,
    /// Account update form, when open
    pub edit: Option<Form>,
    loads: TabLoads<ProfileTab, ProfileData>,
    pub updating: bool,
}

impl ProfileView {
    pub fn mount(username: &str, api: &ApiClient, tasks: &TaskSender) -> Self {
        let fetcher = {
            let api = api.clone();
            let username = username.to_string();
            Box::new(move |tab| fetch(&api, &username, tab))
        };
        let loads = TabLoads::new(tasks.clone(), fetcher, action);
        let view = Self {
            username: username.to_string(),
            tab: ProfileTab::Stats,
            selection: 0,
            edit: None,
            loads,
            updating: false,
        };
        view.loads.load_all(ProfileTab::all());
        view
    }

    pub fn select_tab(&mut self, tab: ProfileTab) {
        if tab != self.tab {
            self.tab = tab;
            self.selection = 0;
        }
        self.loads.load(tab);
    }

    pub fn retry(&self) {
        self.loads.retry(self.tab);
    }

    pub fn state(&self) -> LoadState<ProfileData> {
        self.loads.state(self.tab)
    }

    pub fn move_selection(&mut self, down: bool) {
        let len = match self.state() {
            LoadState::Ready(ProfileData::RecentGames(games)) => games.len(),
            _ => 0,
        };
        self.selection = step_selection(self.selection, len, down);
    }

    pub fn open_edit(&mut self) {
        self.edit = Some(Form::new(vec![
            TextInput::new("New email", MAX_EMAIL_LENGTH),
            TextInput::masked("New password", MAX_PASSWORD_LENGTH),
            TextInput::masked("Confirm", MAX_PASSWORD_LENGTH),
        ]));
    }

    /// The update to send. Blank fields are left unchanged.
    pub fn update_request(&self) -> Result<UpdateUserRequest> {
        let form = self.edit.as_ref().ok_or_else(|| anyhow!("nothing to update"))?;
        validate_update(form)
    }
}

fn validate_update(form: &Form) -> Result<UpdateUserRequest> {
    let email = form.value(EMAIL).trim();
    let password = form.value(PASSWORD);

    if !email.is_empty() && !email.contains('@') {
        return Err(anyhow!("email address is not valid"));
    }
    if password != form.value(CONFIRM) {
        return Err(anyhow!("passwords do not match"));
    }

    let request = UpdateUserRequest {
        email: (!email.is_empty()).then(|| email.to_string()),
        password: (!password.is_empty()).then(|| password.to_string()),
    };
    if request.is_empty() {
        return Err(anyhow!("nothing to update"));
    }
    Ok(request)
}

fn fetch(api: &ApiClient, username: &str, tab: ProfileTab) -> BoxFuture<'static, anyhow::Result<ProfileData>> {
    let api = api.clone();
    let username = username.to_string();
    async move {
        match tab {
            ProfileTab::Stats => api.fetch_user_stats(&username).await.map(ProfileData::Stats),
            ProfileTab::RecentGames => api.fetch_last_games().await.map(ProfileData::RecentGames),
        }
    }
    .boxed()
}

fn action(tab: ProfileTab) -> &'static str {
    match tab {
        ProfileTab::Stats => "Load stats",
        ProfileTab::RecentGames => "Load recent games",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit_form(email: &str, password: &str, confirm: &str) -> Form {
        let mut form = Form::new(vec![
            TextInput::new("New email", MAX_EMAIL_LENGTH),
            TextInput::masked("New password", MAX_PASSWORD_LENGTH),
            TextInput::masked("Confirm", MAX_PASSWORD_LENGTH),
        ]);
        form.fields[EMAIL].value = email.to_string();
        form.fields[PASSWORD].value = password.to_string();
        form.fields[CONFIRM].value = confirm.to_string();
        form
    }

    fn request(form: Form) -> Result<UpdateUserRequest> {
        validate_update(&form)
    }

    #[test]
    fn test_update_email_only() {
        let req = request(edit_form("new@example.com", "", "")).unwrap();
        assert_eq!(req.email.as_deref(), Some("new@example.com"));
        assert!(req.password.is_none());
    }

    #[test]
    fn test_update_rejects_mismatched_passwords() {
        let err = request(edit_form("", "one", "two")).unwrap_err();
        assert_eq!(err.to_string(), "passwords do not match");
    }

    #[test]
    fn test_update_rejects_empty_form() {
        assert!(request(edit_form("", "", "")).is_err());
        assert!(request(edit_form("not-an-email", "", "")).is_err());
    }
}
