//! Login and registration forms.

use anyhow::{anyhow, Result};
use tracing::debug;

use canaiguess_core::auth::CredentialStore;

use super::form::{
    Form, TextInput, MAX_EMAIL_LENGTH, MAX_PASSWORD_LENGTH, MAX_USERNAME_LENGTH,
};

const USERNAME: usize = 0;
const PASSWORD: usize = 1;

#[derive(Debug)]
pub struct LoginView {
    pub form: Form,
    /// Keep the password in the OS keychain after a successful login
    pub remember: bool,
    pub pending: bool,
}

impl LoginView {
    /// Prefill the last username and, if one is stored, its password.
    pub fn new(last_username: Option<&str>) -> Self {
        let username = last_username.unwrap_or_default();
        let stored = if username.is_empty() {
            None
        } else {
            match CredentialStore::get_password(username) {
                Ok(password) => Some(password),
                Err(e) => {
                    debug!(error = %e, "No stored password");
                    None
                }
            }
        };

        let remember = stored.is_some();
        let mut form = Form::new(vec![
            TextInput::new("Username", MAX_USERNAME_LENGTH).with_value(username),
            TextInput::masked("Password", MAX_PASSWORD_LENGTH).with_value(stored.unwrap_or_default()),
        ]);
        form.focus_first_empty();

        Self {
            form,
            remember,
            pending: false,
        }
    }

    /// Username and password, or why they cannot be submitted.
    pub fn credentials(&self) -> Result<(String, String)> {
        let username = self.form.value(USERNAME).trim();
        let password = self.form.value(PASSWORD);
        if username.is_empty() || password.is_empty() {
            return Err(anyhow!("username and password required"));
        }
        Ok((username.to_string(), password.to_string()))
    }
}

const REG_USERNAME: usize = 0;
const REG_EMAIL: usize = 1;
const REG_PASSWORD: usize = 2;
const REG_CONFIRM: usize = 3;

/// Validated registration input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct RegisterView {
    pub form: Form,
    pub pending: bool,
}

impl Default for RegisterView {
    fn default() -> Self {
        Self {
            form: Form::new(vec![
                TextInput::new("Username", MAX_USERNAME_LENGTH),
                TextInput::new("Email", MAX_EMAIL_LENGTH),
                TextInput::masked("Password", MAX_PASSWORD_LENGTH),
                TextInput::masked("Confirm", MAX_PASSWORD_LENGTH),
            ]),
            pending: false,
        }
    }
}

impl RegisterView {
    pub fn registration(&self) -> Result<Registration> {
        let username = self.form.value(REG_USERNAME).trim();
        let email = self.form.value(REG_EMAIL).trim();
        let password = self.form.value(REG_PASSWORD);

        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(anyhow!("all fields are required"));
        }
        if !email.contains('@') {
            return Err(anyhow!("email address is not valid"));
        }
        if password != self.form.value(REG_CONFIRM) {
            return Err(anyhow!("passwords do not match"));
        }

        Ok(Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(values: [&str; 4]) -> RegisterView {
        let mut view = RegisterView::default();
        for (field, value) in view.form.fields.iter_mut().zip(values) {
            field.value = value.to_string();
        }
        view
    }

    #[test]
    fn test_login_requires_both_fields() {
        let mut view = LoginView::new(None);
        assert_eq!(view.form.focus, USERNAME);
        assert!(view.credentials().is_err());

        view.form.fields[USERNAME].value = " alice ".into();
        view.form.fields[PASSWORD].value = "pw".into();
        assert_eq!(view.credentials().unwrap(), ("alice".to_string(), "pw".to_string()));
    }

    #[test]
    fn test_registration_valid() {
        let reg = filled(["bob", "bob@example.com", "pw", "pw"]).registration().unwrap();
        assert_eq!(reg.username, "bob");
        assert_eq!(reg.email, "bob@example.com");
    }

    #[test]
    fn test_registration_rejects_mismatch() {
        let err = filled(["bob", "bob@example.com", "pw", "wp"]).registration().unwrap_err();
        assert_eq!(err.to_string(), "passwords do not match");
    }

    #[test]
    fn test_registration_rejects_missing_and_bad_email() {
        assert!(filled(["", "bob@example.com", "pw", "pw"]).registration().is_err());
        let err = filled(["bob", "bob", "pw", "pw"]).registration().unwrap_err();
        assert!(err.to_string().contains("email"));
    }
}
