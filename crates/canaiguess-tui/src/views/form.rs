//! Text input fields shared by the login, register, profile and admin forms.

/// Maximum length for username input.
pub const MAX_USERNAME_LENGTH: usize = 32;

/// Maximum length for email input.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for a file path or numeric id.
pub const MAX_PATH_LENGTH: usize = 512;

/// A single-line text field
#[derive(Debug, Clone)]
pub struct TextInput {
    pub label: &'static str,
    pub value: String,
    pub masked: bool,
    max_len: usize,
}

impl TextInput {
    pub fn new(label: &'static str, max_len: usize) -> Self {
        Self {
            label,
            value: String::new(),
            masked: false,
            max_len,
        }
    }

    pub fn masked(label: &'static str, max_len: usize) -> Self {
        Self {
            masked: true,
            ..Self::new(label, max_len)
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Append a character, ignoring control characters and overflow.
    /// Returns whether the character was accepted.
    pub fn push(&mut self, c: char) -> bool {
        if can_add_char(self.value.chars().count(), self.max_len, c) {
            self.value.push(c);
            true
        } else {
            false
        }
    }

    pub fn pop(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// The text to draw: bullets for masked fields.
    pub fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// Fields followed by a submit button. Focus index `fields.len()` is the button.
#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<TextInput>,
    pub focus: usize,
}

impl Form {
    pub fn new(fields: Vec<TextInput>) -> Self {
        Self { fields, focus: 0 }
    }

    pub fn next(&mut self) {
        self.focus = (self.focus + 1) % (self.fields.len() + 1);
    }

    pub fn prev(&mut self) {
        let len = self.fields.len() + 1;
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn on_button(&self) -> bool {
        self.focus == self.fields.len()
    }

    pub fn focused_field(&mut self) -> Option<&mut TextInput> {
        self.fields.get_mut(self.focus)
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }

    /// Put the focus on the first empty field, or the button if all are filled
    pub fn focus_first_empty(&mut self) {
        self.focus = self
            .fields
            .iter()
            .position(TextInput::is_blank)
            .unwrap_or(self.fields.len());
    }
}

/// Check if a character should be accepted into a field
pub fn can_add_char(current_len: usize, max_len: usize, c: char) -> bool {
    current_len < max_len && !c.is_control()
}
