//! Error types for RustMailer API calls.

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// API client error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    /// The server rejected the request.
    #[error("Server returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message reported by the server (or the raw body).
        message: String,
    },

    /// The access token is missing, invalid or expired.
    #[error("Unauthorized: the access token is missing or no longer valid")]
    Unauthorized,

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Creates an API error from a status code and message.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Returns true when the error means the session must be re-established.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Error body returned by the RustMailer server.
#[derive(Debug, Clone, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    /// Human-readable message.
    pub message: String,
    /// Numeric error code.
    #[serde(default)]
    pub code: Option<u32>,
}

impl ErrorResponse {
    /// Converts the body into an [`Error`], keeping the numeric code in the message.
    pub(crate) fn into_error(self, status: u16) -> Error {
        match self.code {
            Some(code) => Error::api(status, format!("{} (code {code})", self.message)),
            None => Error::api(status, self.message),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_with_code() {
        let body: ErrorResponse =
            serde_json::from_str(r#"{"message":"account not found","code":40400}"#).unwrap();
        let err = body.into_error(404);
        assert_eq!(
            err.to_string(),
            "Server returned 404: account not found (code 40400)"
        );
    }

    #[test]
    fn test_error_response_without_code() {
        let body: ErrorResponse = serde_json::from_str(r#"{"message":"bad request"}"#).unwrap();
        assert!(matches!(
            body.into_error(400),
            Error::Api { status: 400, ref message } if message == "bad request"
        ));
    }

    #[test]
    fn test_unauthorized_flag() {
        assert!(Error::Unauthorized.is_unauthorized());
        assert!(!Error::api(500, "boom").is_unauthorized());
    }
}
