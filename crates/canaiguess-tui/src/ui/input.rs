//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use canaiguess_core::Route;

use crate::app::{App, AppState};
use crate::views::admin::{AdminTab, ImageFocus};
use crate::views::form::Form;
use crate::views::menu::{LandingItem, MenuItem};
use crate::views::{TabKey, View};

/// What a key did to a form
#[derive(Debug, PartialEq, Eq)]
enum FormAction {
    Submit,
    Cancel,
    None,
}

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state.clone() {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return false;
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return true;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return false;
        }
        AppState::Confirming(action) => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => app.run_confirmed(action),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return false;
        }
        AppState::Quitting => return true,
        AppState::Normal => {}
    }

    if !app.view.captures_text() {
        match key.code {
            KeyCode::Char('q') => {
                app.state = AppState::ConfirmingQuit;
                return false;
            }
            KeyCode::Char('?') => {
                app.state = AppState::ShowingHelp;
                return false;
            }
            _ => {}
        }
    }

    match app.view {
        View::Landing(_) => handle_landing_input(app, key),
        View::Menu(_) => handle_menu_input(app, key),
        View::Login(_) => handle_login_input(app, key),
        View::Register(_) => handle_register_input(app, key),
        View::Game(_) => handle_game_input(app, key),
        View::Results(_) => handle_results_input(app, key),
        View::Leaderboard(_) => handle_leaderboard_input(app, key),
        View::Profile(_) => handle_profile_input(app, key),
        View::Admin(_) => handle_admin_input(app, key),
    }

    false
}

fn is_up(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Up | KeyCode::Char('k'))
}

fn is_down(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Down | KeyCode::Char('j'))
}

/// Edit a form: move focus, type into the focused field, submit or cancel.
fn handle_form_key(form: &mut Form, key: KeyEvent) -> FormAction {
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.next(),
        KeyCode::BackTab | KeyCode::Up => form.prev(),
        KeyCode::Enter => {
            // Enter on the last field submits, like the button
            if form.on_button() || form.focus + 1 == form.fields.len() {
                return FormAction::Submit;
            }
            form.next();
        }
        KeyCode::Esc => return FormAction::Cancel,
        KeyCode::Backspace => {
            if let Some(field) = form.focused_field() {
                field.pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(field) = form.focused_field() {
                field.push(c);
            }
        }
        _ => {}
    }
    FormAction::None
}

// ============================================================================
// Menus
// ============================================================================

fn handle_landing_input(app: &mut App, key: KeyEvent) {
    let View::Landing(view) = &mut app.view else {
        return;
    };
    if is_up(&key) {
        view.move_selection(false);
        return;
    }
    if is_down(&key) {
        view.move_selection(true);
        return;
    }
    if key.code != KeyCode::Enter {
        return;
    }

    match view.selected() {
        LandingItem::Login => app.navigate(Route::Login),
        LandingItem::Register => app.navigate(Route::Register),
        LandingItem::PlayAsGuest => app.navigate(Route::Menu),
        LandingItem::Quit => app.state = AppState::ConfirmingQuit,
    }
}

fn handle_menu_input(app: &mut App, key: KeyEvent) {
    let View::Menu(view) = &mut app.view else {
        return;
    };
    if is_up(&key) {
        view.move_selection(false);
        return;
    }
    if is_down(&key) {
        view.move_selection(true);
        return;
    }
    if key.code != KeyCode::Enter {
        return;
    }

    match view.selected() {
        Some(MenuItem::Play) => app.start_game(),
        Some(MenuItem::Leaderboard) => app.navigate(Route::Leaderboard),
        Some(MenuItem::Profile) => app.navigate(Route::Profile),
        Some(MenuItem::Admin) => app.navigate(Route::Admin),
        Some(MenuItem::Login) => app.navigate(Route::Login),
        Some(MenuItem::Register) => app.navigate(Route::Register),
        Some(MenuItem::Logout) => app.logout(),
        Some(MenuItem::Quit) => app.state = AppState::ConfirmingQuit,
        None => {}
    }
}

// ============================================================================
// Login / Register
// ============================================================================

fn handle_login_input(app: &mut App, key: KeyEvent) {
    let View::Login(view) = &mut app.view else {
        return;
    };

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('r') => view.remember = !view.remember,
            KeyCode::Char('n') => app.navigate(Route::Register),
            _ => {}
        }
        return;
    }

    if view.pending {
        return;
    }
    match handle_form_key(&mut view.form, key) {
        FormAction::Submit => app.submit_login(),
        FormAction::Cancel => app.navigate(Route::Landing),
        FormAction::None => {}
    }
}

fn handle_register_input(app: &mut App, key: KeyEvent) {
    let View::Register(view) = &mut app.view else {
        return;
    };

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('l') {
            app.navigate(Route::Login);
        }
        return;
    }

    if view.pending {
        return;
    }
    match handle_form_key(&mut view.form, key) {
        FormAction::Submit => app.submit_register(),
        FormAction::Cancel => app.navigate(Route::Landing),
        FormAction::None => {}
    }
}

// ============================================================================
// Game
// ============================================================================

fn handle_game_input(app: &mut App, key: KeyEvent) {
    let View::Game(view) = &mut app.view else {
        return;
    };

    match key.code {
        KeyCode::Esc => app.navigate(Route::Menu),
        KeyCode::Up | KeyCode::Char('k') => view.move_selection(false),
        KeyCode::Down | KeyCode::Char('j') => view.move_selection(true),
        KeyCode::Char('a') | KeyCode::Char('A') => view.mark(true),
        KeyCode::Char('h') | KeyCode::Char('H') => view.mark(false),
        KeyCode::Char(' ') => view.toggle(),
        KeyCode::Enter => app.submit_guess(),
        KeyCode::Char('r') => app.retry_game_load(),
        _ => {}
    }
}

fn handle_results_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('p') => app.start_game(),
        KeyCode::Char('l') => app.navigate(Route::Leaderboard),
        KeyCode::Char('m') | KeyCode::Esc => app.navigate(Route::Menu),
        _ => {}
    }
}

// ============================================================================
// Tabbed views
// ============================================================================

/// Tab to switch to for `key`, if it is a tab key
fn tab_switch<K: TabKey>(current: K, key: &KeyEvent) -> Option<K> {
    match key.code {
        KeyCode::Right | KeyCode::Tab => Some(current.next()),
        KeyCode::Left | KeyCode::BackTab => Some(current.prev()),
        _ => None,
    }
}

fn handle_leaderboard_input(app: &mut App, key: KeyEvent) {
    let View::Leaderboard(view) = &mut app.view else {
        return;
    };

    if let Some(tab) = tab_switch(view.tab, &key) {
        view.select_tab(tab);
        return;
    }
    match key.code {
        KeyCode::Esc => app.navigate(Route::Menu),
        KeyCode::Up | KeyCode::Char('k') => view.move_selection(false),
        KeyCode::Down | KeyCode::Char('j') => view.move_selection(true),
        KeyCode::Char('r') => view.retry(),
        _ => {}
    }
}

fn handle_profile_input(app: &mut App, key: KeyEvent) {
    let View::Profile(view) = &mut app.view else {
        return;
    };

    if let Some(form) = view.edit.as_mut() {
        if view.updating {
            return;
        }
        match handle_form_key(form, key) {
            FormAction::Submit => app.submit_profile_update(),
            FormAction::Cancel => view.edit = None,
            FormAction::None => {}
        }
        return;
    }

    if let Some(tab) = tab_switch(view.tab, &key) {
        view.select_tab(tab);
        return;
    }
    match key.code {
        KeyCode::Esc => app.navigate(Route::Menu),
        KeyCode::Up | KeyCode::Char('k') => view.move_selection(false),
        KeyCode::Down | KeyCode::Char('j') => view.move_selection(true),
        KeyCode::Char('r') => view.retry(),
        KeyCode::Char('e') => view.open_edit(),
        KeyCode::Char('D') => app.confirm_delete_account(),
        _ => {}
    }
}

fn handle_admin_input(app: &mut App, key: KeyEvent) {
    let View::Admin(view) = &mut app.view else {
        return;
    };

    if view.tab == AdminTab::Images {
        handle_images_input(app, key);
        return;
    }

    if let Some(tab) = tab_switch(view.tab, &key) {
        view.select_tab(tab);
        return;
    }
    match key.code {
        KeyCode::Esc => app.navigate(Route::Menu),
        KeyCode::Up | KeyCode::Char('k') => view.move_selection(false),
        KeyCode::Down | KeyCode::Char('j') => view.move_selection(true),
        KeyCode::Char('r') => view.retry(),
        KeyCode::Char('p') if view.tab == AdminTab::Users => app.promote_selected_user(),
        KeyCode::Char('d') if view.tab == AdminTab::Users => app.confirm_delete_selected_user(),
        KeyCode::Enter if view.tab == AdminTab::Reports => app.resolve_selected_report(),
        KeyCode::Char('x') if view.tab == AdminTab::Reports => app.confirm_delete_reported_image(),
        _ => {}
    }
}

/// The images tab is a small form: Tab moves between its controls, so only
/// Left/Right switch tabs here.
fn handle_images_input(app: &mut App, key: KeyEvent) {
    let View::Admin(view) = &mut app.view else {
        return;
    };
    let tools = &mut view.images;

    match key.code {
        KeyCode::Left => view.select_tab(view.tab.prev()),
        KeyCode::Right => view.select_tab(view.tab.next()),
        KeyCode::Esc => app.navigate(Route::Menu),
        KeyCode::Tab | KeyCode::Down => tools.focus = tools.focus.next(),
        KeyCode::BackTab | KeyCode::Up => tools.focus = tools.focus.prev(),
        KeyCode::Enter => {
            let focus = tools.focus;
            match focus {
                ImageFocus::Upload => app.upload_image(),
                ImageFocus::Delete | ImageFocus::DeleteId => app.confirm_delete_image_by_id(),
                ImageFocus::Path | ImageFocus::Label => tools.focus = focus.next(),
            }
        }
        KeyCode::Char(' ') if tools.focus == ImageFocus::Label => tools.fake = !tools.fake,
        KeyCode::Backspace => {
            if let Some(input) = tools.focused_input() {
                input.pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(input) = tools.focused_input() {
                input.push(c);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::form::TextInput;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn two_field_form() -> Form {
        Form::new(vec![TextInput::new("Username", 10), TextInput::masked("Password", 10)])
    }

    #[test]
    fn test_form_typing_goes_to_focused_field() {
        let mut form = two_field_form();
        for c in "bob".chars() {
            assert_eq!(handle_form_key(&mut form, press(KeyCode::Char(c))), FormAction::None);
        }
        handle_form_key(&mut form, press(KeyCode::Backspace));
        assert_eq!(form.value(0), "bo");

        handle_form_key(&mut form, press(KeyCode::Tab));
        handle_form_key(&mut form, press(KeyCode::Char('x')));
        assert_eq!(form.value(1), "x");
    }

    #[test]
    fn test_form_enter_moves_then_submits() {
        let mut form = two_field_form();
        assert_eq!(handle_form_key(&mut form, press(KeyCode::Enter)), FormAction::None);
        assert_eq!(form.focus, 1);
        assert_eq!(handle_form_key(&mut form, press(KeyCode::Enter)), FormAction::Submit);
        assert_eq!(handle_form_key(&mut form, press(KeyCode::Esc)), FormAction::Cancel);
    }

    #[test]
    fn test_form_ignores_control_chords() {
        let mut form = two_field_form();
        let chord = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        handle_form_key(&mut form, chord);
        assert_eq!(form.value(0), "");
    }

    #[test]
    fn test_tab_switch_keys() {
        assert_eq!(tab_switch(AdminTab::Users, &press(KeyCode::Right)), Some(AdminTab::Reports));
        assert_eq!(tab_switch(AdminTab::Users, &press(KeyCode::BackTab)), Some(AdminTab::Images));
        assert_eq!(tab_switch(AdminTab::Users, &press(KeyCode::Char('x'))), None);
    }
}
