//! Credential gate for the image provider
//!
//! Answers whether a usable API key is present and, when it is not, lets the
//! hosting environment offer an interactive way to pick one. Which backing
//! mechanism is used is decided when the app is composed.

pub mod interactive;
pub mod mock;
pub mod static_key;

pub use interactive::{CredentialHost, InteractiveCredentialProvider, TerminalKeyPicker};
pub use mock::MockCredentialProvider;
pub use static_key::StaticCredentialProvider;

use async_trait::async_trait;

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Whether a usable credential is available right now. Never cached.
    async fn has_credential(&self) -> bool;

    /// Ask the host to let the user select a credential.
    ///
    /// Completes silently when the host offers no picker or the selection
    /// fails; callers must re-check `has_credential` afterwards.
    async fn request_credential(&self);

    /// The key to send with the next request, read at call time.
    async fn api_key(&self) -> Option<String>;
}
