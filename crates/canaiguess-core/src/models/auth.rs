use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Body returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_auth_response() {
        let json = r#"{"token":"abc.def.ghi","username":"alice","role":"ADMIN"}"#;
        let auth: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(auth.token, "abc.def.ghi");
        assert_eq!(auth.username, "alice");
        assert_eq!(auth.role.as_deref(), Some("ADMIN"));
    }

    #[test]
    fn test_parse_auth_response_without_role() {
        let json = r#"{"token":"t","username":"bob"}"#;
        let auth: AuthResponse = serde_json::from_str(json).unwrap();
        assert!(auth.role.is_none());
    }
}
