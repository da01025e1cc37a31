//! Landing page and main menu.

use canaiguess_core::{SessionData, Viewer};

use super::step_selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingItem {
    Login,
    Register,
    PlayAsGuest,
    Quit,
}

impl LandingItem {
    pub const ALL: [LandingItem; 4] = [
        LandingItem::Login,
        LandingItem::Register,
        LandingItem::PlayAsGuest,
        LandingItem::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LandingItem::Login => "Log in",
            LandingItem::Register => "Create an account",
            LandingItem::PlayAsGuest => "Play as guest",
            LandingItem::Quit => "Quit",
        }
    }
}

#[derive(Debug, Default)]
pub struct LandingView {
    pub selection: usize,
}

impl LandingView {
    pub fn move_selection(&mut self, down: bool) {
        self.selection = step_selection(self.selection, LandingItem::ALL.len(), down);
    }

    pub fn selected(&self) -> LandingItem {
        LandingItem::ALL[self.selection.min(LandingItem::ALL.len() - 1)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Play,
    Leaderboard,
    Profile,
    Admin,
    Login,
    Register,
    Logout,
    Quit,
}

impl MenuItem {
    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Play => "Play",
            MenuItem::Leaderboard => "Leaderboard",
            MenuItem::Profile => "Profile",
            MenuItem::Admin => "Admin panel",
            MenuItem::Login => "Log in",
            MenuItem::Register => "Create an account",
            MenuItem::Logout => "Log out",
            MenuItem::Quit => "Quit",
        }
    }
}

#[derive(Debug)]
pub struct MenuView {
    pub items: Vec<MenuItem>,
    pub selection: usize,
    pub greeting: String,
    /// A new game is being created
    pub starting: bool,
}

impl MenuView {
    /// Entries depend on who is looking: guests are offered an account,
    /// admins get the admin panel.
    pub fn new(viewer: Viewer, session: &SessionData) -> Self {
        let mut items = vec![MenuItem::Play, MenuItem::Leaderboard];
        let greeting = match viewer {
            Viewer::User => {
                items.push(MenuItem::Profile);
                if session.is_admin() {
                    items.push(MenuItem::Admin);
                }
                items.push(MenuItem::Logout);
                format!("Signed in as {}", session.username().unwrap_or("player"))
            }
            Viewer::Guest => {
                items.push(MenuItem::Login);
                items.push(MenuItem::Register);
                "Playing as guest. Scores are not saved.".to_string()
            }
        };
        items.push(MenuItem::Quit);

        Self {
            items,
            selection: 0,
            greeting,
            starting: false,
        }
    }

    pub fn move_selection(&mut self, down: bool) {
        self.selection = step_selection(self.selection, self.items.len(), down);
    }

    pub fn selected(&self) -> Option<MenuItem> {
        self.items.get(self.selection).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Option<&str>) -> SessionData {
        SessionData {
            token: Some("tok".into()),
            username: Some("alice".into()),
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn test_guest_menu_offers_accounts() {
        let menu = MenuView::new(Viewer::Guest, &SessionData::default());
        assert!(menu.items.contains(&MenuItem::Login));
        assert!(menu.items.contains(&MenuItem::Register));
        assert!(!menu.items.contains(&MenuItem::Profile));
        assert!(!menu.items.contains(&MenuItem::Logout));
    }

    #[test]
    fn test_admin_entry_only_for_admin_role() {
        let user = MenuView::new(Viewer::User, &session(Some("USER")));
        assert!(!user.items.contains(&MenuItem::Admin));
        assert!(user.greeting.contains("alice"));

        let lowercase = MenuView::new(Viewer::User, &session(Some("admin")));
        assert!(!lowercase.items.contains(&MenuItem::Admin));

        let admin = MenuView::new(Viewer::User, &session(Some("ADMIN")));
        assert!(admin.items.contains(&MenuItem::Admin));
    }

    #[test]
    fn test_menu_selection_is_clamped() {
        let mut menu = MenuView::new(Viewer::Guest, &SessionData::default());
        for _ in 0..20 {
            menu.move_selection(true);
        }
        assert_eq!(menu.selected(), Some(MenuItem::Quit));
        menu.move_selection(false);
        assert_ne!(menu.selected(), Some(MenuItem::Quit));
    }

    #[test]
    fn test_landing_selection() {
        let mut landing = LandingView::default();
        assert_eq!(landing.selected(), LandingItem::Login);
        landing.move_selection(true);
        landing.move_selection(true);
        assert_eq!(landing.selected(), LandingItem::PlayAsGuest);
    }
}
