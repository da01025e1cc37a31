//! Client-side route guards.
//!
//! Every screen of the client is a [`Route`]. Before a route is shown its
//! [`Guard`] is checked against the stored session flags. A failed check
//! never errors; it redirects to the main menu. These guards only pick
//! screens: a forged local role passes the admin guard here, and the
//! backend remains responsible for rejecting the calls that follow.

use std::fmt;

use crate::auth::SessionData;

/// Screens of the client, addressed by path like the web client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Register,
    Menu,
    Game(i64),
    Results(i64),
    Leaderboard,
    Profile,
    Admin,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Menu => "/menu".to_string(),
            Route::Game(id) => format!("/game/{}", id),
            Route::Results(id) => format!("/results/{}", id),
            Route::Leaderboard => "/leaderboard".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Admin => "/admin".to_string(),
        }
    }

    /// Parse a path. Trailing slashes are ignored; unknown paths give `None`.
    pub fn parse(path: &str) -> Option<Self> {
        if !path.starts_with('/') {
            return None;
        }
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();
        match segments.as_slice() {
            [] => Some(Route::Landing),
            ["login"] => Some(Route::Login),
            ["register"] => Some(Route::Register),
            ["menu"] => Some(Route::Menu),
            ["game", id] => id.parse().ok().map(Route::Game),
            ["results", id] => id.parse().ok().map(Route::Results),
            ["leaderboard"] => Some(Route::Leaderboard),
            ["profile"] => Some(Route::Profile),
            ["admin"] => Some(Route::Admin),
            _ => None,
        }
    }

    pub fn guard(&self) -> Guard {
        match self {
            Route::Landing | Route::Login | Route::Register => Guard::PublicOnly,
            Route::Menu
            | Route::Game(_)
            | Route::Results(_)
            | Route::Leaderboard => Guard::GuestOrUser,
            Route::Profile => Guard::Authenticated,
            Route::Admin => Guard::AdminOnly,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Landing => "Welcome",
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Menu => "Main Menu",
            Route::Game(_) => "Game",
            Route::Results(_) => "Results",
            Route::Leaderboard => "Leaderboard",
            Route::Profile => "Profile",
            Route::Admin => "Admin",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Who is looking at a rendered screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Guest,
    User,
}

/// Result of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Render(Viewer),
    Redirect(Route),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Only without a token (login, register, landing).
    PublicOnly,
    /// Always; the viewer is reported for display logic.
    GuestOrUser,
    /// Only with a token.
    Authenticated,
    /// Only when the stored role is exactly `ADMIN`.
    AdminOnly,
}

impl Guard {
    pub fn check(&self, session: &SessionData) -> Access {
        let viewer = if session.has_token() { Viewer::User } else { Viewer::Guest };
        let allowed = match self {
            Guard::PublicOnly => viewer == Viewer::Guest,
            Guard::GuestOrUser => true,
            Guard::Authenticated => viewer == Viewer::User,
            Guard::AdminOnly => session.is_admin(),
        };
        if allowed {
            Access::Render(viewer)
        } else {
            Access::Redirect(Route::Menu)
        }
    }
}

/// Resolve the route that is actually shown for a navigation request.
///
/// Redirects are followed until a route renders. The menu always renders,
/// so this terminates after at most one redirect.
pub fn resolve(route: Route, session: &SessionData) -> (Route, Viewer) {
    let mut current = route;
    loop {
        match current.guard().check(session) {
            Access::Render(viewer) => return (current, viewer),
            Access::Redirect(target) => current = target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(token: Option<&str>, role: Option<&str>) -> SessionData {
        SessionData {
            token: token.map(str::to_string),
            username: token.map(|_| "alice".to_string()),
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn test_public_only_redirects_with_token() {
        let s = session(Some("tok"), None);
        assert_eq!(Guard::PublicOnly.check(&s), Access::Redirect(Route::Menu));
        assert_eq!(Route::Menu.path(), "/menu");
    }

    #[test]
    fn test_public_only_renders_without_token() {
        assert_eq!(Guard::PublicOnly.check(&session(None, None)), Access::Render(Viewer::Guest));
        // An empty stored token counts as absent
        assert_eq!(Guard::PublicOnly.check(&session(Some(""), None)), Access::Render(Viewer::Guest));
    }

    #[test]
    fn test_authenticated_is_inverse_of_public_only() {
        assert_eq!(Guard::Authenticated.check(&session(Some("tok"), None)), Access::Render(Viewer::User));
        assert_eq!(Guard::Authenticated.check(&session(None, None)), Access::Redirect(Route::Menu));
        assert_eq!(Guard::Authenticated.check(&session(Some(""), None)), Access::Redirect(Route::Menu));
    }

    #[test]
    fn test_guest_or_user_always_renders() {
        assert_eq!(Guard::GuestOrUser.check(&session(None, None)), Access::Render(Viewer::Guest));
        assert_eq!(Guard::GuestOrUser.check(&session(Some("t"), Some("ADMIN"))), Access::Render(Viewer::User));
    }

    #[test]
    fn test_admin_only_requires_exact_role() {
        assert_eq!(
            Guard::AdminOnly.check(&session(Some("t"), Some("ADMIN"))),
            Access::Render(Viewer::User)
        );
        for role in [None, Some(""), Some("admin"), Some("Admin"), Some("USER"), Some("superuser")] {
            assert_eq!(
                Guard::AdminOnly.check(&session(Some("t"), role)),
                Access::Redirect(Route::Menu),
                "role {:?} must redirect",
                role
            );
        }
    }

    #[test]
    fn test_lowercase_admin_role_resolves_to_menu() {
        let s = session(Some("tok"), Some("admin"));
        let (shown, viewer) = resolve(Route::parse("/admin").unwrap(), &s);
        assert_eq!(shown, Route::Menu);
        assert_eq!(viewer, Viewer::User);
        assert_eq!(shown.path(), "/menu");
    }

    #[test]
    fn test_resolve_passes_allowed_routes_through() {
        let guest = session(None, None);
        assert_eq!(resolve(Route::Login, &guest), (Route::Login, Viewer::Guest));
        assert_eq!(resolve(Route::Game(5), &guest), (Route::Game(5), Viewer::Guest));
        assert_eq!(resolve(Route::Profile, &guest), (Route::Menu, Viewer::Guest));
    }

    #[test]
    fn test_route_path_round_trip() {
        for route in [
            Route::Landing,
            Route::Login,
            Route::Register,
            Route::Menu,
            Route::Game(12),
            Route::Results(12),
            Route::Leaderboard,
            Route::Profile,
            Route::Admin,
        ] {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }

    #[test]
    fn test_route_parse_rejects_unknown() {
        assert_eq!(Route::parse("/game/abc"), None);
        assert_eq!(Route::parse("/nowhere"), None);
        assert_eq!(Route::parse("menu"), None);
        assert_eq!(Route::parse("/menu/"), Some(Route::Menu));
    }
}
