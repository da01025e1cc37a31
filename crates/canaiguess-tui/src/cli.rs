//! Commands that run on the plain terminal instead of the TUI.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, info};

use canaiguess_core::auth::CredentialStore;
use canaiguess_core::{ApiClient, Config, SessionData, SessionStore};

use crate::app;

pub const USAGE: &str = "\
Usage: canaiguess [COMMAND]

Without a command the terminal UI starts.

Commands:
  --login     Log in on the terminal and save the session
  --logout    Forget the saved session
  --whoami    Show who is logged in
  --help      Show this message";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Login,
    Logout,
    WhoAmI,
    Help,
}

impl Command {
    pub fn parse(arg: &str) -> Option<Self> {
        match arg {
            "--login" => Some(Command::Login),
            "--logout" => Some(Command::Logout),
            "--whoami" => Some(Command::WhoAmI),
            "--help" | "-h" => Some(Command::Help),
            _ => None,
        }
    }
}

pub async fn run(command: Command) -> Result<()> {
    match command {
        Command::Login => login().await,
        Command::Logout => logout(),
        Command::WhoAmI => {
            let session = open_session()?;
            println!("{}", whoami_line(session.data()));
            Ok(())
        }
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
    }
}

fn open_session() -> Result<SessionStore> {
    let data_dir = Config::data_dir().context("Failed to locate data directory")?;
    let mut session = SessionStore::new(&data_dir);
    session.load().context("Failed to read saved session")?;
    Ok(session)
}

fn whoami_line(session: &SessionData) -> String {
    match session.username() {
        Some(username) if session.has_token() => {
            format!("{} ({})", username, session.role.as_deref().unwrap_or("USER"))
        }
        _ => "Not logged in".to_string(),
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Pick the typed username, or the remembered one when nothing was typed
fn choose_username(typed: String, last: Option<&str>) -> Option<String> {
    if typed.is_empty() {
        last.map(str::to_string)
    } else {
        Some(typed)
    }
}

async fn login() -> Result<()> {
    let mut config = Config::load().unwrap_or_default();
    let mut session = open_session()?;

    let label = match config.last_username.as_deref() {
        Some(last) => format!("Username [{}]: ", last),
        None => "Username: ".to_string(),
    };
    let username = choose_username(prompt(&label)?, config.last_username.as_deref())
        .context("A username is required")?;
    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;
    let remember = prompt("Remember password in the system keychain? [y/N]: ")?
        .eq_ignore_ascii_case("y");

    let api = ApiClient::new(&config.api_base_url())?;
    let auth = app::login(&api, &username, &password).await?;
    session.update(&auth).context("Failed to save session")?;

    if remember {
        CredentialStore::store(&auth.username, &password)?;
    } else if let Err(e) = CredentialStore::delete(&auth.username) {
        debug!(error = %e, "No stored credentials to remove");
    }

    config.last_username = Some(auth.username.clone());
    config.save()?;

    info!(user = %auth.username, "Logged in from the command line");
    println!("{}", whoami_line(session.data()));
    Ok(())
}

fn logout() -> Result<()> {
    let mut session = open_session()?;
    if let Some(username) = session.username().map(str::to_string) {
        if let Err(e) = CredentialStore::delete(&username) {
            debug!(error = %e, "No stored credentials to remove");
        }
    }
    session.clear()?;
    println!("Logged out");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("--login"), Some(Command::Login));
        assert_eq!(Command::parse("--whoami"), Some(Command::WhoAmI));
        assert_eq!(Command::parse("-h"), Some(Command::Help));
        assert_eq!(Command::parse("--play"), None);
    }

    #[test]
    fn test_whoami_line() {
        assert_eq!(whoami_line(&SessionData::default()), "Not logged in");

        let session = SessionData {
            token: Some("tok".into()),
            username: Some("alice".into()),
            role: Some("ADMIN".into()),
        };
        assert_eq!(whoami_line(&session), "alice (ADMIN)");

        let no_role = SessionData {
            role: None,
            ..session.clone()
        };
        assert_eq!(whoami_line(&no_role), "alice (USER)");

        let no_token = SessionData { token: None, ..session };
        assert_eq!(whoami_line(&no_token), "Not logged in");
    }

    #[test]
    fn test_choose_username() {
        assert_eq!(choose_username(String::new(), Some("bob")), Some("bob".to_string()));
        assert_eq!(choose_username("amy".into(), Some("bob")), Some("amy".to_string()));
        assert_eq!(choose_username(String::new(), None), None);
    }
}
