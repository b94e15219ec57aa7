//! Classification of per-call failures.
//!
//! The provider does not expose a dedicated "bad credential" error for image
//! models; an invalid or unselected key usually surfaces as the model not being
//! found. How that is recognised is a policy, so it sits behind a trait.

use crate::Error;

/// Outcome of a failed generation call after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallFailure {
    /// The credential was rejected; must reach the caller.
    Auth(String),
    /// Anything else; dropped from the batch.
    Generic(String),
}

pub trait AuthFailureClassifier: Send + Sync {
    fn is_auth_failure(&self, error: &Error) -> bool;

    fn classify(&self, error: &Error) -> CallFailure {
        if self.is_auth_failure(error) {
            CallFailure::Auth(error.to_string())
        } else {
            CallFailure::Generic(error.to_string())
        }
    }
}

const NOT_FOUND_MESSAGE: &str = "Requested entity was not found";
const INVALID_KEY_MESSAGE: &str = "API key not valid";

/// Default policy for the Gemini API.
///
/// Treats not-found, unauthenticated and permission-denied responses as
/// credential problems, matching on the structured status first and the
/// message wording second.
#[derive(Debug, Clone, Copy, Default)]
pub struct VendorAuthClassifier;

impl AuthFailureClassifier for VendorAuthClassifier {
    fn is_auth_failure(&self, error: &Error) -> bool {
        match error {
            Error::AuthRejected(_) | Error::CredentialUnavailable => true,
            Error::Api {
                status,
                code,
                message,
            } => {
                matches!(status, 401 | 403 | 404)
                    || matches!(
                        code.as_deref(),
                        Some("NOT_FOUND" | "UNAUTHENTICATED" | "PERMISSION_DENIED")
                    )
                    || message.contains(NOT_FOUND_MESSAGE)
                    || message.contains(INVALID_KEY_MESSAGE)
            }
            _ => false,
        }
    }
}

/// Matches error text against a configurable list of fragments.
#[derive(Debug, Clone)]
pub struct MessageAuthClassifier {
    needles: Vec<String>,
}

impl MessageAuthClassifier {
    pub fn new<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            needles: needles
                .into_iter()
                .map(|needle| needle.into().to_lowercase())
                .filter(|needle| !needle.is_empty())
                .collect(),
        }
    }
}

impl AuthFailureClassifier for MessageAuthClassifier {
    fn is_auth_failure(&self, error: &Error) -> bool {
        let text = error.to_string().to_lowercase();
        self.needles.iter().any(|needle| text.contains(needle))
    }
}
