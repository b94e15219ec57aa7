//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the image provider.
    #[error("Gemini API error (status {status}): {message}")]
    Api {
        status: u16,
        /// Symbolic status from the error envelope, e.g. `NOT_FOUND`.
        code: Option<String>,
        message: String,
    },

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Content blocked: {0}")]
    ContentBlocked(String),

    /// The credential was rejected by the remote service.
    #[error("Authentication rejected: {0}")]
    AuthRejected(String),

    #[error("No usable API credential is available")]
    CredentialUnavailable,

    #[error("No images were generated")]
    NoResults,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for errors that mean the user must (re)select a credential.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthRejected(_) | Self::CredentialUnavailable)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_auth() {
        assert!(Error::AuthRejected("gone".into()).is_auth());
        assert!(Error::CredentialUnavailable.is_auth());
        assert!(!Error::NoResults.is_auth());
        assert!(!Error::AiProvider("no image".into()).is_auth());
    }

    #[test]
    fn test_api_error_display() {
        let err = Error::Api {
            status: 404,
            code: Some("NOT_FOUND".into()),
            message: "Requested entity was not found.".into(),
        };
        assert_eq!(
            err.to_string(),
            "Gemini API error (status 404): Requested entity was not found."
        );
    }
}
