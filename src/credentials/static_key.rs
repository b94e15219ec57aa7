use super::CredentialProvider;
use async_trait::async_trait;

/// Credential baked in at deployment time (environment or `.env`).
pub struct StaticCredentialProvider {
    api_key: Option<String>,
}

impl StaticCredentialProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }

    fn usable_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn has_credential(&self) -> bool {
        self.usable_key().is_some()
    }

    async fn request_credential(&self) {
        tracing::warn!(
            "No interactive key picker available. Set GEMINI_API_KEY in the environment."
        );
    }

    async fn api_key(&self) -> Option<String> {
        self.usable_key().map(str::to_string)
    }
}
