//! PostgREST error types.

use thiserror::Error;

/// Result type for data service operations.
pub type PostgrestResult<T> = Result<T, PostgrestError>;

/// Errors that can occur talking to the data service.
#[derive(Debug, Error)]
pub enum PostgrestError {
    #[error("Failed to configure data service client: {0}")]
    ConfigError(String),

    #[error("Row not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited, retry after {0}ms")]
    RateLimited(u64),

    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PostgrestError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PostgrestError::Network(_)
                | PostgrestError::RateLimited(_)
                | PostgrestError::Upstream { .. }
        )
    }

    /// Delay requested by the service on a 429, if any.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            PostgrestError::RateLimited(ms) => Some(*ms),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_and_rate_limit_are_retryable() {
        assert!(PostgrestError::RateLimited(500).is_retryable());
        assert!(PostgrestError::Upstream {
            status: 503,
            message: "unavailable".into()
        }
        .is_retryable());
        assert!(!PostgrestError::Conflict("dup".into()).is_retryable());
        assert!(!PostgrestError::NotFound("empresas/x".into()).is_retryable());
    }

    #[test]
    fn retry_after_only_for_rate_limits() {
        assert_eq!(PostgrestError::RateLimited(750).retry_after_ms(), Some(750));
        assert_eq!(PostgrestError::request_failed("x").retry_after_ms(), None);
    }
}
