use thiserror::Error;

/// Errors that can occur when interacting with the Groq API
#[derive(Error, Debug)]
pub enum GroqApiError {
    /// Invalid request parameters or malformed request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed due to invalid or missing API key
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Requested model does not exist or is not available to this key
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Rate limit exceeded, retry after waiting
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// API server encountered an internal error
    #[error("API server error: {0}")]
    ServerError(String),

    /// Completion arrived without any choices
    #[error("Empty completion: response contained no choices")]
    EmptyCompletion,

    /// Network error occurred during request
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON serialization or deserialization error
    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Unknown error occurred
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl GroqApiError {
    /// Returns true if this error is transient and should be retried
    ///
    /// Transient errors include:
    /// - Rate limit exceeded
    /// - Server errors (5xx)
    /// - Network timeouts and connection failures
    ///
    /// # Examples
    ///
    /// ```
    /// use medrag::infrastructure::groq::error::GroqApiError;
    ///
    /// let error = GroqApiError::RateLimitExceeded;
    /// assert!(error.is_transient());
    ///
    /// let error = GroqApiError::AuthenticationFailed("Invalid key".to_string());
    /// assert!(!error.is_transient());
    /// ```
    pub fn is_transient(&self) -> bool {
        match self {
            GroqApiError::RateLimitExceeded | GroqApiError::ServerError(_) => true,
            GroqApiError::NetworkError(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Create error from HTTP status code and response body
    ///
    /// Maps HTTP status codes to error variants following the
    /// OpenAI-compatible API conventions Groq uses:
    /// - 400: Invalid request
    /// - 401, 403: Authentication failed
    /// - 404: Model not found
    /// - 429: Rate limit exceeded
    /// - 5xx: Server error
    /// - Other: Unknown error
    ///
    /// # Examples
    ///
    /// ```
    /// use medrag::infrastructure::groq::error::GroqApiError;
    /// use reqwest::StatusCode;
    ///
    /// let error = GroqApiError::from_status(
    ///     StatusCode::TOO_MANY_REQUESTS,
    ///     "Rate limit exceeded".to_string()
    /// );
    /// assert!(matches!(error, GroqApiError::RateLimitExceeded));
    /// ```
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 => GroqApiError::InvalidRequest(body),
            401 | 403 => GroqApiError::AuthenticationFailed(body),
            404 => GroqApiError::ModelNotFound(body),
            429 => GroqApiError::RateLimitExceeded,
            500..=599 => GroqApiError::ServerError(body),
            _ => GroqApiError::Unknown(format!("HTTP {status}: {body}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_is_transient_rate_limit() {
        let error = GroqApiError::RateLimitExceeded;
        assert!(error.is_transient());
    }

    #[test]
    fn test_is_transient_server_error() {
        let error = GroqApiError::ServerError("Internal error".to_string());
        assert!(error.is_transient());
    }

    #[test]
    fn test_is_not_transient_invalid_request() {
        let error = GroqApiError::InvalidRequest("Bad params".to_string());
        assert!(!error.is_transient());
    }

    #[test]
    fn test_is_not_transient_authentication_failed() {
        let error = GroqApiError::AuthenticationFailed("Invalid key".to_string());
        assert!(!error.is_transient());
    }

    #[test]
    fn test_is_not_transient_model_not_found() {
        let error = GroqApiError::ModelNotFound("no-such-model".to_string());
        assert!(!error.is_transient());
    }

    #[test]
    fn test_is_not_transient_empty_completion() {
        let error = GroqApiError::EmptyCompletion;
        assert!(!error.is_transient());
    }

    #[test]
    fn test_from_status_400() {
        let error =
            GroqApiError::from_status(StatusCode::BAD_REQUEST, "Invalid parameters".to_string());
        assert!(matches!(error, GroqApiError::InvalidRequest(_)));
    }

    #[test]
    fn test_from_status_401() {
        let error =
            GroqApiError::from_status(StatusCode::UNAUTHORIZED, "Invalid API key".to_string());
        assert!(matches!(error, GroqApiError::AuthenticationFailed(_)));
    }

    #[test]
    fn test_from_status_403() {
        let error = GroqApiError::from_status(StatusCode::FORBIDDEN, "Access denied".to_string());
        assert!(matches!(error, GroqApiError::AuthenticationFailed(_)));
    }

    #[test]
    fn test_from_status_404() {
        let error = GroqApiError::from_status(
            StatusCode::NOT_FOUND,
            "The model `x` does not exist".to_string(),
        );
        assert!(matches!(error, GroqApiError::ModelNotFound(_)));
    }

    #[test]
    fn test_from_status_429() {
        let error = GroqApiError::from_status(
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded".to_string(),
        );
        assert!(matches!(error, GroqApiError::RateLimitExceeded));
    }

    #[test]
    fn test_from_status_500() {
        let error = GroqApiError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server error".to_string(),
        );
        assert!(matches!(error, GroqApiError::ServerError(_)));
    }

    #[test]
    fn test_from_status_503() {
        let error = GroqApiError::from_status(
            StatusCode::SERVICE_UNAVAILABLE,
            "Service unavailable".to_string(),
        );
        assert!(matches!(error, GroqApiError::ServerError(_)));
        assert!(error.is_transient());
    }

    #[test]
    fn test_from_status_unknown() {
        let error =
            GroqApiError::from_status(StatusCode::IM_A_TEAPOT, "I'm a teapot".to_string());
        assert!(matches!(error, GroqApiError::Unknown(_)));
        let error_msg = error.to_string();
        assert!(error_msg.starts_with("Unknown error: HTTP 418"));
        assert!(error_msg.contains("I'm a teapot"));
    }

    #[test]
    fn test_error_display() {
        let error = GroqApiError::InvalidRequest("Bad params".to_string());
        assert_eq!(error.to_string(), "Invalid request: Bad params");

        let error = GroqApiError::AuthenticationFailed("Invalid key".to_string());
        assert_eq!(error.to_string(), "Authentication failed: Invalid key");

        let error = GroqApiError::RateLimitExceeded;
        assert_eq!(error.to_string(), "Rate limit exceeded");

        let error = GroqApiError::EmptyCompletion;
        assert_eq!(
            error.to_string(),
            "Empty completion: response contained no choices"
        );
    }

    #[test]
    fn test_from_serde_error() {
        let json = r#"{"invalid": json}"#;
        let serde_error: serde_json::Error =
            serde_json::from_str::<serde_json::Value>(json).unwrap_err();
        let groq_error: GroqApiError = serde_error.into();
        assert!(matches!(groq_error, GroqApiError::SerializationError(_)));
    }
}
