//! Application state management for CanAIGuess.
//!
//! This module contains the core `App` struct: configuration, the session,
//! the API client, the mounted view and the channel through which
//! background tasks report back to the UI loop.

use std::future::Future;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use canaiguess_core::api::user_message;
use canaiguess_core::auth::CredentialStore;
use canaiguess_core::guard::{self, Route, Viewer};
use canaiguess_core::models::{AuthResponse, Game, GameResults, GuessOutcome, ImageBatch, ImageInfo};
use canaiguess_core::{ApiClient, ApiError, Config, SessionStore};

use crate::views::admin::AdminList;
use crate::views::{
    AdminView, GameView, LandingView, LeaderboardView, LoginView, MenuView, ProfileView,
    RegisterView, ResultsView, View,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

// ============================================================================
// UI State Types
// ============================================================================

/// A destructive action waiting for a yes/no answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteAccount,
    DeleteUser(String),
    DeleteImage(i64),
}

impl PendingAction {
    pub fn prompt(&self) -> String {
        match self {
            PendingAction::DeleteAccount => "Delete your account? This cannot be undone.".to_string(),
            PendingAction::DeleteUser(name) => format!("Delete user {}?", name),
            PendingAction::DeleteImage(id) => format!("Delete image #{}?", id),
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Confirming(PendingAction),
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// The single notification shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from background tasks back to the UI loop.
pub enum TaskResult {
    /// Login (or registration followed by login) succeeded
    LoggedIn {
        auth: AuthResponse,
        password: String,
        remember: bool,
    },
    GameCreated(Game),
    /// Game state and first batch for the game view
    GameLoaded { game: Game, batch: ImageBatch },
    BatchLoaded(ImageBatch),
    GuessSubmitted(GuessOutcome),
    ResultsLoaded(GameResults),
    AccountUpdated,
    AccountDeleted,
    UserPromoted(String),
    UserDeleted(String),
    ReportResolved(i64),
    ImageUploaded(Option<ImageInfo>),
    ImageDeleted(i64),
    /// Any task that failed; shown through `App::notify_error`
    Failed {
        action: &'static str,
        error: anyhow::Error,
    },
}

struct TaskMessage {
    generation: u64,
    result: TaskResult,
}

/// Sends task results to the UI, tagged with the view they belong to.
///
/// Every navigation bumps the generation; results tagged with an older one
/// arrive after their view was dropped and are discarded.
#[derive(Clone)]
pub struct TaskSender {
    tx: mpsc::Sender<TaskMessage>,
    generation: u64,
}

impl TaskSender {
    /// Run `task` on the runtime and report its result. Errors become
    /// `TaskResult::Failed` for `action`.
    pub fn spawn<F>(&self, action: &'static str, task: F)
    where
        F: Future<Output = Result<TaskResult>> + Send + 'static,
    {
        let sender = self.clone();
        tokio::spawn(async move {
            let result = match task.await {
                Ok(result) => result,
                Err(error) => TaskResult::Failed { action, error },
            };
            sender.send(result).await;
        });
    }

    /// Wrap a tab load so that its failure also reaches the status bar.
    /// The load itself fails with the same user-facing message.
    pub fn reporting<T, Fut>(&self, action: &'static str, load: Fut) -> impl Future<Output = Result<T>> + Send + 'static
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let sender = self.clone();
        async move {
            match load.await {
                Ok(value) => Ok(value),
                Err(error) => {
                    let message = user_message(action, &error);
                    sender.send(TaskResult::Failed { action, error }).await;
                    Err(anyhow!(message))
                }
            }
        }
    }

    /// A sender whose results go nowhere
    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        let (tx, _rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        Self { tx, generation: 0 }
    }

    async fn send(&self, result: TaskResult) {
        let message = TaskMessage {
            generation: self.generation,
            result,
        };
        if self.tx.send(message).await.is_err() {
            debug!("UI loop gone, dropping task result");
        }
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: SessionStore,
    pub api: ApiClient,

    // UI State
    pub state: AppState,
    pub route: Route,
    pub viewer: Viewer,
    pub view: View,
    pub status: Option<StatusMessage>,

    // Background task channel
    tasks: TaskSender,
    task_tx: mpsc::Sender<TaskMessage>,
    task_rx: mpsc::Receiver<TaskMessage>,
    generation: u64,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let data_dir = Config::data_dir().unwrap_or_else(|_| PathBuf::from("./canaiguess-data"));
        debug!(?data_dir, "Data directory configured");

        let mut session = SessionStore::new(&data_dir);
        if let Err(e) = session.load() {
            warn!(error = %e, "Failed to load session, starting signed out");
        }

        let base_url = config.api_base_url();
        info!(%base_url, "Using API");
        let api = ApiClient::new(&base_url)?;

        Ok(Self::with_parts(config, session, api))
    }

    /// Assemble the app and show the start screen: the menu when a session
    /// exists, the landing page otherwise.
    pub fn with_parts(config: Config, session: SessionStore, mut api: ApiClient) -> Self {
        api.set_token(session.token().map(str::to_string));
        let (task_tx, task_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let start = if session.data().has_token() {
            Route::Menu
        } else {
            Route::Landing
        };

        let mut app = Self {
            config,
            session,
            api,
            state: AppState::Normal,
            route: Route::Landing,
            viewer: Viewer::Guest,
            view: View::Landing(LandingView::default()),
            status: None,
            tasks: TaskSender {
                tx: task_tx.clone(),
                generation: 0,
            },
            task_tx,
            task_rx,
            generation: 0,
        };
        app.navigate(start);
        app
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Show `route`, or wherever its guard redirects. The previous view is
    /// dropped along with any load still running for it.
    pub fn navigate(&mut self, route: Route) {
        let (shown, viewer) = guard::resolve(route, self.session.data());
        if shown != route {
            info!(requested = %route, shown = %shown, "Route guard redirected");
        }

        self.generation += 1;
        self.tasks = TaskSender {
            tx: self.task_tx.clone(),
            generation: self.generation,
        };
        self.route = shown;
        self.viewer = viewer;
        self.view = self.mount(shown);
        debug!(route = %shown, ?viewer, "View mounted");
    }

    fn mount(&self, route: Route) -> View {
        match route {
            Route::Landing => View::Landing(LandingView::default()),
            Route::Login => View::Login(LoginView::new(self.config.last_username.as_deref())),
            Route::Register => View::Register(RegisterView::default()),
            Route::Menu => View::Menu(MenuView::new(self.viewer, self.session.data())),
            Route::Game(id) => View::Game(GameView::mount(id, &self.api, &self.tasks)),
            Route::Results(id) => View::Results(ResultsView::mount(id, &self.api, &self.tasks)),
            Route::Leaderboard => View::Leaderboard(LeaderboardView::mount(&self.api, &self.tasks)),
            Route::Profile => View::Profile(ProfileView::mount(
                self.session.username().unwrap_or_default(),
                &self.api,
                &self.tasks,
            )),
            Route::Admin => View::Admin(AdminView::mount(&self.api, &self.tasks)),
        }
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Report a failed operation. Every user-facing failure ends up here.
    pub fn notify_error(&mut self, action: &str, err: &anyhow::Error) {
        error!(action, error = %format!("{:#}", err), "Operation failed");
        self.status = Some(StatusMessage {
            kind: StatusKind::Error,
            text: user_message(action, err),
        });
    }

    pub fn notify_info(&mut self, text: impl Into<String>) {
        let text = text.into();
        info!(message = %text, "Notice");
        self.status = Some(StatusMessage {
            kind: StatusKind::Info,
            text,
        });
    }

    // =========================================================================
    // Background Tasks
    // =========================================================================

    pub fn check_background_tasks(&mut self) {
        // Collect all pending results first to avoid borrow conflicts
        let mut messages = Vec::new();
        while let Ok(message) = self.task_rx.try_recv() {
            messages.push(message);
        }

        for message in messages {
            if message.generation != self.generation {
                debug!(generation = message.generation, "Discarding result for a closed view");
                continue;
            }
            self.process_task_result(message.result);
        }

        self.view.tick();
    }

    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::LoggedIn { auth, password, remember } => {
                self.complete_login(auth, &password, remember);
            }
            TaskResult::GameCreated(game) => {
                info!(game_id = game.id, "Game created");
                self.navigate(Route::Game(game.id));
            }
            TaskResult::GameLoaded { game, batch } => {
                if game.finished {
                    self.navigate(Route::Results(game.id));
                } else if let View::Game(view) = &mut self.view {
                    view.set_loaded(game, batch);
                }
            }
            TaskResult::BatchLoaded(batch) => {
                if let View::Game(view) = &mut self.view {
                    view.set_batch(batch);
                }
            }
            TaskResult::GuessSubmitted(outcome) => {
                let game_over = outcome.game_over;
                let verdict = if outcome.correct { "Correct!" } else { "Not quite." };
                let score = outcome.score;
                if let View::Game(view) = &mut self.view {
                    view.apply_outcome(outcome);
                }
                if game_over {
                    if let Route::Game(id) = self.route {
                        self.navigate(Route::Results(id));
                    }
                } else {
                    self.notify_info(format!("{} Score: {}", verdict, score));
                    self.fetch_next_batch();
                }
            }
            TaskResult::ResultsLoaded(results) => {
                if let View::Results(view) = &mut self.view {
                    view.results = Some(results);
                }
            }
            TaskResult::AccountUpdated => {
                if let View::Profile(view) = &mut self.view {
                    view.edit = None;
                    view.updating = false;
                }
                self.notify_info("Account updated");
            }
            TaskResult::AccountDeleted => {
                self.forget_account();
                self.navigate(Route::Landing);
                self.notify_info("Account deleted");
            }
            TaskResult::UserPromoted(username) => {
                if let View::Admin(view) = &mut self.view {
                    view.reload(AdminList::Users);
                }
                self.notify_info(format!("{} is now an admin", username));
            }
            TaskResult::UserDeleted(username) => {
                if self.session.username() == Some(username.as_str()) {
                    self.forget_account();
                    self.navigate(Route::Landing);
                } else if let View::Admin(view) = &mut self.view {
                    view.reload(AdminList::Users);
                }
                self.notify_info(format!("User {} deleted", username));
            }
            TaskResult::ReportResolved(report_id) => {
                if let View::Admin(view) = &mut self.view {
                    view.reload(AdminList::Reports);
                }
                self.notify_info(format!("Report #{} resolved", report_id));
            }
            TaskResult::ImageUploaded(image) => {
                if let View::Admin(view) = &mut self.view {
                    view.images.path.clear();
                }
                match image {
                    Some(image) => self.notify_info(format!("Uploaded image #{}", image.id)),
                    None => self.notify_info("Image uploaded"),
                }
            }
            TaskResult::ImageDeleted(image_id) => {
                if let View::Admin(view) = &mut self.view {
                    view.images.delete_id.clear();
                    view.reload(AdminList::Reports);
                }
                self.notify_info(format!("Image #{} deleted", image_id));
            }
            TaskResult::Failed { action, error } => {
                self.clear_busy();
                self.notify_error(action, &error);
            }
        }
    }

    /// Re-enable the current view after a failed request.
    fn clear_busy(&mut self) {
        match &mut self.view {
            View::Login(view) => view.pending = false,
            View::Register(view) => view.pending = false,
            View::Menu(view) => view.starting = false,
            View::Game(view) => view.busy = false,
            View::Results(view) => view.starting = false,
            View::Profile(view) => view.updating = false,
            _ => {}
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.session.data().has_token()
    }

    pub fn submit_login(&mut self) {
        let request = match &mut self.view {
            View::Login(view) if !view.pending => view.credentials().map(|credentials| {
                view.pending = true;
                (credentials, view.remember)
            }),
            _ => return,
        };

        match request {
            Ok(((username, password), remember)) => {
                let api = self.api.clone();
                self.tasks.spawn("Login", async move {
                    let auth = login(&api, &username, &password).await?;
                    Ok(TaskResult::LoggedIn { auth, password, remember })
                });
            }
            Err(e) => self.notify_error("Login", &e),
        }
    }

    /// Register, then log straight in with the same credentials.
    pub fn submit_register(&mut self) {
        let request = match &mut self.view {
            View::Register(view) if !view.pending => view.registration().map(|registration| {
                view.pending = true;
                registration
            }),
            _ => return,
        };

        match request {
            Ok(registration) => {
                let api = self.api.clone();
                self.tasks.spawn("Registration", async move {
                    api.register(&registration.username, &registration.email, &registration.password)
                        .await?;
                    info!(user = %registration.username, "Account registered");
                    let auth = login(&api, &registration.username, &registration.password).await?;
                    Ok(TaskResult::LoggedIn {
                        auth,
                        password: registration.password,
                        remember: false,
                    })
                });
            }
            Err(e) => self.notify_error("Registration", &e),
        }
    }

    fn complete_login(&mut self, auth: AuthResponse, password: &str, remember: bool) {
        let username = auth.username.clone();
        if let Err(e) = self.session.update(&auth) {
            warn!(error = %e, "Failed to save session");
        }
        self.api.set_token(Some(auth.token));

        if remember {
            if let Err(e) = CredentialStore::store(&username, password) {
                warn!(error = %e, "Failed to store credentials");
            }
        } else if let Err(e) = CredentialStore::delete(&username) {
            debug!(error = %e, "No stored credentials to remove");
        }

        self.config.last_username = Some(username.clone());
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        info!(user = %username, admin = self.session.data().is_admin(), "Login successful");
        self.navigate(Route::Menu);
        self.notify_info(format!("Welcome, {}", username));
    }

    pub fn logout(&mut self) {
        self.clear_session();
        self.navigate(Route::Landing);
        self.notify_info("Logged out");
    }

    fn clear_session(&mut self) {
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session");
        }
        self.api.set_token(None);
    }

    /// Drop every trace of an account that no longer exists.
    fn forget_account(&mut self) {
        if let Some(username) = self.session.username().map(str::to_string) {
            if let Err(e) = CredentialStore::delete(&username) {
                debug!(error = %e, "No stored credentials to remove");
            }
        }
        self.clear_session();
    }

    // =========================================================================
    // Game
    // =========================================================================

    pub fn start_game(&mut self) {
        match &mut self.view {
            View::Menu(view) if !view.starting => view.starting = true,
            View::Results(view) if !view.starting => view.starting = true,
            _ => return,
        }
        let api = self.api.clone();
        self.tasks.spawn("Start game", async move {
            Ok(TaskResult::GameCreated(api.create_game().await?))
        });
    }

    pub fn submit_guess(&mut self) {
        let request = match &mut self.view {
            View::Game(view) if !view.busy => view.guesses().map(|guesses| {
                view.busy = true;
                (view.game_id, guesses)
            }),
            _ => return,
        };

        match request {
            Ok((game_id, guesses)) => {
                debug!(game_id, count = guesses.len(), "Submitting guess");
                let api = self.api.clone();
                self.tasks.spawn("Submit guess", async move {
                    Ok(TaskResult::GuessSubmitted(api.submit_guess(game_id, &guesses).await?))
                });
            }
            Err(e) => self.notify_error("Submit guess", &e),
        }
    }

    /// Load again whatever the game view is missing after a failed request:
    /// the whole game if it never loaded, otherwise the current batch.
    pub fn retry_game_load(&mut self) {
        let View::Game(view) = &mut self.view else {
            return;
        };
        if !view.needs_reload() {
            return;
        }
        if view.game.is_none() {
            view.load(&self.api, &self.tasks);
        } else {
            self.fetch_next_batch();
        }
    }

    fn fetch_next_batch(&mut self) {
        if let View::Game(view) = &mut self.view {
            view.busy = true;
            let game_id = view.game_id;
            let api = self.api.clone();
            self.tasks.spawn("Load images", async move {
                Ok(TaskResult::BatchLoaded(api.fetch_batch(game_id).await?))
            });
        }
    }

    // =========================================================================
    // Profile
    // =========================================================================

    pub fn submit_profile_update(&mut self) {
        let request = match &mut self.view {
            View::Profile(view) if !view.updating => view.update_request().map(|update| {
                view.updating = true;
                (view.username.clone(), update)
            }),
            _ => return,
        };

        match request {
            Ok((username, update)) => {
                let api = self.api.clone();
                self.tasks.spawn("Update account", async move {
                    api.update_user(&username, &update).await?;
                    Ok(TaskResult::AccountUpdated)
                });
            }
            Err(e) => self.notify_error("Update account", &e),
        }
    }

    // =========================================================================
    // Admin
    // =========================================================================

    pub fn promote_selected_user(&mut self) {
        let Some(user) = self.selected_admin_user() else {
            return;
        };
        if user.role.as_deref() == Some(canaiguess_core::auth::ADMIN_ROLE) {
            self.notify_info(format!("{} is already an admin", user.username));
            return;
        }
        let api = self.api.clone();
        self.tasks.spawn("Promote user", async move {
            api.promote_user(&user.username).await?;
            Ok(TaskResult::UserPromoted(user.username))
        });
    }

    pub fn confirm_delete_selected_user(&mut self) {
        if let Some(user) = self.selected_admin_user() {
            self.state = AppState::Confirming(PendingAction::DeleteUser(user.username));
        }
    }

    pub fn resolve_selected_report(&mut self) {
        let report = match &self.view {
            View::Admin(view) => view.selected_report(),
            _ => None,
        };
        if let Some(report) = report {
            let api = self.api.clone();
            self.tasks.spawn("Resolve report", async move {
                api.resolve_report(report.id).await?;
                Ok(TaskResult::ReportResolved(report.id))
            });
        }
    }

    /// Ask before deleting the image behind the selected report
    pub fn confirm_delete_reported_image(&mut self) {
        let report = match &self.view {
            View::Admin(view) => view.selected_report(),
            _ => None,
        };
        if let Some(report) = report {
            self.state = AppState::Confirming(PendingAction::DeleteImage(report.image_id));
        }
    }

    pub fn confirm_delete_image_by_id(&mut self) {
        let request = match &self.view {
            View::Admin(view) => view.images.delete_request(),
            _ => return,
        };
        match request {
            Ok(image_id) => self.state = AppState::Confirming(PendingAction::DeleteImage(image_id)),
            Err(e) => self.notify_error("Delete image", &e),
        }
    }

    pub fn upload_image(&mut self) {
        let request = match &self.view {
            View::Admin(view) => view.images.upload_request(),
            _ => return,
        };
        match request {
            Ok((path, fake)) => {
                info!(path = %path.display(), fake, "Uploading image");
                let api = self.api.clone();
                self.tasks.spawn("Upload image", async move {
                    Ok(TaskResult::ImageUploaded(api.upload_image(&path, fake).await?))
                });
            }
            Err(e) => self.notify_error("Upload image", &e),
        }
    }

    fn selected_admin_user(&self) -> Option<canaiguess_core::models::UserSummary> {
        match &self.view {
            View::Admin(view) => view.selected_user(),
            _ => None,
        }
    }

    // =========================================================================
    // Confirmations
    // =========================================================================

    pub fn confirm_delete_account(&mut self) {
        self.state = AppState::Confirming(PendingAction::DeleteAccount);
    }

    /// Carry out an action the user just confirmed.
    pub fn run_confirmed(&mut self, action: PendingAction) {
        self.state = AppState::Normal;
        let api = self.api.clone();
        match action {
            PendingAction::DeleteAccount => {
                let Some(username) = self.session.username().map(str::to_string) else {
                    return;
                };
                self.tasks.spawn("Delete account", async move {
                    api.delete_user(&username).await?;
                    Ok(TaskResult::AccountDeleted)
                });
            }
            PendingAction::DeleteUser(username) => {
                self.tasks.spawn("Delete user", async move {
                    api.delete_user(&username).await?;
                    Ok(TaskResult::UserDeleted(username))
                });
            }
            PendingAction::DeleteImage(image_id) => {
                self.tasks.spawn("Delete image", async move {
                    api.delete_image(image_id).await?;
                    Ok(TaskResult::ImageDeleted(image_id))
                });
            }
        }
    }
}

/// Log in, reporting a rejected password as such rather than as an
/// expired session.
pub(crate) async fn login(api: &ApiClient, username: &str, password: &str) -> Result<AuthResponse> {
    api.login(username, password).await.map_err(|e| {
        if matches!(e.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized)) {
            anyhow!("invalid username or password")
        } else {
            e
        }
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Port 9 (discard) is closed on test machines; requests fail fast
    const UNREACHABLE: &str = "http://127.0.0.1:9";

    fn app_with_session(dir: &std::path::Path, role: Option<&str>, token: bool) -> App {
        let mut session = SessionStore::new(dir);
        if token {
            session
                .update(&AuthResponse {
                    token: "tok".into(),
                    username: "alice".into(),
                    role: role.map(str::to_string),
                })
                .unwrap();
        }
        App::with_parts(Config::default(), session, ApiClient::new(UNREACHABLE).unwrap())
    }

    #[test]
    fn test_start_route_follows_session() {
        let dir = tempfile::tempdir().unwrap();
        let guest = app_with_session(dir.path(), None, false);
        assert_eq!(guest.route, Route::Landing);
        assert!(!guest.api.has_token());

        let other = tempfile::tempdir().unwrap();
        let user = app_with_session(other.path(), Some("USER"), true);
        assert_eq!(user.route, Route::Menu);
        assert_eq!(user.viewer, Viewer::User);
        assert!(user.api.has_token());
    }

    #[test]
    fn test_lowercase_admin_role_lands_on_menu() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_session(dir.path(), Some("admin"), true);
        app.navigate(Route::Admin);
        assert_eq!(app.route, Route::Menu);
        assert_eq!(app.route.path(), "/menu");
        assert!(matches!(app.view, View::Menu(_)));
    }

    #[test]
    fn test_guest_cannot_open_profile() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_session(dir.path(), None, false);
        app.navigate(Route::Profile);
        assert_eq!(app.route, Route::Menu);
        assert_eq!(app.viewer, Viewer::Guest);
    }

    #[test]
    fn test_signed_in_user_skips_login() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_session(dir.path(), None, true);
        app.navigate(Route::Login);
        assert_eq!(app.route, Route::Menu);
    }

    #[tokio::test]
    async fn test_results_for_closed_view_are_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_session(dir.path(), None, false);
        let stale = app.tasks.clone();
        app.navigate(Route::Menu);

        stale
            .send(TaskResult::Failed {
                action: "Load leaderboard",
                error: anyhow!("late"),
            })
            .await;
        app.check_background_tasks();
        assert!(app.status.is_none());

        app.tasks
            .clone()
            .send(TaskResult::Failed {
                action: "Load leaderboard",
                error: anyhow!("boom"),
            })
            .await;
        app.check_background_tasks();
        let status = app.status.clone().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.text, "Load leaderboard failed: boom");
    }

    #[test]
    fn test_notify_error_uses_response_body() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_session(dir.path(), None, false);
        let err = anyhow::Error::new(ApiError::Conflict("Username already exists".into()))
            .context("Failed to send request: register");
        app.notify_error("Registration", &err);
        assert_eq!(
            app.status.as_ref().map(|s| s.text.as_str()),
            Some("Registration failed: Username already exists")
        );
    }

    #[test]
    fn test_logout_clears_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_session(dir.path(), Some("ADMIN"), true);
        app.logout();
        assert_eq!(app.route, Route::Landing);
        assert!(!app.is_authenticated());
        assert!(!app.api.has_token());
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn test_invalid_login_form_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_session(dir.path(), None, false);
        app.navigate(Route::Login);
        app.submit_login();
        let status = app.status.clone().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.starts_with("Login failed:"));
        match &app.view {
            View::Login(view) => assert!(!view.pending),
            _ => panic!("expected login view"),
        }
    }

    fn loaded_game_view(app: &mut App, ids: &[i64]) {
        use canaiguess_core::models::GameImage;

        let View::Game(view) = &mut app.view else {
            panic!("expected game view");
        };
        view.set_loaded(
            Game {
                id: 1,
                current_round: Some(1),
                ..Default::default()
            },
            ImageBatch {
                images: ids
                    .iter()
                    .map(|&id| GameImage {
                        id,
                        url: format!("https://img.example/{}.png", id),
                    })
                    .collect(),
                round: Some(1),
            },
        );
        for _ in ids {
            view.mark(true);
        }
    }

    #[tokio::test]
    async fn test_failed_batch_load_cannot_resubmit_old_guesses() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_session(dir.path(), None, false);
        app.navigate(Route::Game(1));
        loaded_game_view(&mut app, &[10]);

        app.process_task_result(TaskResult::GuessSubmitted(GuessOutcome {
            correct: true,
            score: 10,
            answers: Vec::new(),
            game_over: false,
        }));
        app.process_task_result(TaskResult::Failed {
            action: "Load images",
            error: anyhow!("connection refused"),
        });

        let View::Game(view) = &app.view else {
            panic!("expected game view");
        };
        assert!(!view.busy);
        assert!(view.guesses().is_err());
        assert!(view.needs_reload());

        // Enter does nothing; r fetches the batch again
        app.submit_guess();
        assert!(matches!(&app.view, View::Game(view) if !view.busy));
        app.retry_game_load();
        let View::Game(view) = &app.view else {
            panic!("expected game view");
        };
        assert!(view.busy);
        assert!(view.game.is_some());
    }

    #[tokio::test]
    async fn test_retry_reloads_game_that_never_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_session(dir.path(), None, false);
        app.navigate(Route::Game(3));
        app.process_task_result(TaskResult::Failed {
            action: "Load game",
            error: anyhow!("connection refused"),
        });
        assert!(matches!(&app.view, View::Game(view) if view.needs_reload()));

        app.retry_game_load();
        assert!(matches!(&app.view, View::Game(view) if view.busy && view.game.is_none()));
    }

    #[test]
    fn test_pending_action_prompts() {
        assert!(PendingAction::DeleteUser("bob".into()).prompt().contains("bob"));
        assert!(PendingAction::DeleteImage(7).prompt().contains("#7"));
    }
}
