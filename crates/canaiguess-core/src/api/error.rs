use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body.trim());
        match status.as_u16() {
            400 => ApiError::BadRequest(truncated),
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            409 => ApiError::Conflict(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

/// Build the one-line message shown to the user for a failed operation.
///
/// Every view reports failures through this function so the wording stays
/// uniform: `"<action> failed: <reason>"`.
pub fn user_message(action: &str, err: &anyhow::Error) -> String {
    let reason = match err.downcast_ref::<ApiError>() {
        Some(ApiError::Unauthorized) => "session expired, please log in again".to_string(),
        Some(ApiError::RateLimited) => "server is busy, try again in a moment".to_string(),
        Some(ApiError::NetworkError(e)) if e.is_timeout() => "connection timed out".to_string(),
        Some(ApiError::NetworkError(_)) => "unable to reach the server".to_string(),
        Some(ApiError::BadRequest(body))
        | Some(ApiError::AccessDenied(body))
        | Some(ApiError::NotFound(body))
        | Some(ApiError::Conflict(body))
        | Some(ApiError::ServerError(body))
            if !body.is_empty() =>
        {
            body.clone()
        }
        Some(api) => api.to_string(),
        None => err.root_cause().to_string(),
    };
    format!("{} failed: {}", action, reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_maps_codes() {
        assert!(matches!(ApiError::from_status(StatusCode::UNAUTHORIZED, ""), ApiError::Unauthorized));
        assert!(matches!(ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""), ApiError::RateLimited));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "nope"),
            ApiError::AccessDenied(ref b) if b == "nope"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::CONFLICT, "Username taken"),
            ApiError::Conflict(ref b) if b == "Username taken"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, "tea"),
            ApiError::InvalidResponse(ref m) if m.contains("418") && m.contains("tea")
        ));
    }

    #[test]
    fn test_body_truncation() {
        let body = "x".repeat(2000);
        match ApiError::from_status(StatusCode::BAD_REQUEST, &body) {
            ApiError::BadRequest(msg) => {
                assert!(msg.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
                assert!(msg.contains("2000 total bytes"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // 'é' is two bytes, so byte 500 falls in the middle of a character
        let body = format!("a{}", "é".repeat(400));
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.contains("truncated"));
    }

    #[test]
    fn test_user_message_uses_body_text() {
        let err: anyhow::Error = ApiError::Conflict("Username already exists".into()).into();
        assert_eq!(user_message("Register", &err), "Register failed: Username already exists");

        let err: anyhow::Error = ApiError::Unauthorized.into();
        assert_eq!(
            user_message("Load stats", &err),
            "Load stats failed: session expired, please log in again"
        );

        let err = anyhow::anyhow!("boom");
        assert_eq!(user_message("Upload", &err), "Upload failed: boom");
    }

    #[test]
    fn test_user_message_sees_through_context() {
        use anyhow::Context;
        let err = Err::<(), _>(ApiError::NotFound("Game 7 not found".into()))
            .context("Failed to fetch game")
            .unwrap_err();
        assert_eq!(user_message("Load game", &err), "Load game failed: Game 7 not found");
    }
}
