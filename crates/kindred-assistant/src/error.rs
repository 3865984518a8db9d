use thiserror::Error;

pub type AssistantResult<T> = Result<T, AssistantError>;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("empty reply")]
    EmptyReply,
}

/// Map a non-success HTTP status to an error.
pub fn parse_http_error(status: u16, body: &str) -> AssistantError {
    match status {
        401 | 403 => AssistantError::AuthenticationFailed(body.to_string()),
        429 => AssistantError::RateLimited(body.to_string()),
        400 | 404 | 413 => AssistantError::InvalidRequest(body.to_string()),
        _ => AssistantError::ServerError {
            status,
            message: body.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_statuses() {
        assert!(matches!(parse_http_error(401, "bad key"), AssistantError::AuthenticationFailed(_)));
        assert!(matches!(parse_http_error(429, ""), AssistantError::RateLimited(_)));
        assert!(matches!(parse_http_error(529, "overloaded"), AssistantError::ServerError { status: 529, .. }));
    }
}
