use super::CredentialProvider;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::{Mutex, RwLock};

/// Key-selection hooks exposed by the hosting environment.
#[async_trait]
pub trait CredentialHost: Send + Sync {
    async fn has_selected_key(&self) -> bool;
    async fn open_select_key(&self) -> Result<()>;
    async fn selected_key(&self) -> Option<String>;
}

/// Credential chosen at runtime through a host-provided picker.
///
/// With no host attached this behaves as "no credential" and requesting one
/// only logs a diagnostic.
pub struct InteractiveCredentialProvider {
    host: Option<Arc<dyn CredentialHost>>,
}

impl InteractiveCredentialProvider {
    pub fn new(host: Arc<dyn CredentialHost>) -> Self {
        Self { host: Some(host) }
    }

    pub fn without_host() -> Self {
        Self { host: None }
    }
}

#[async_trait]
impl CredentialProvider for InteractiveCredentialProvider {
    async fn has_credential(&self) -> bool {
        match &self.host {
            Some(host) => host.has_selected_key().await,
            None => false,
        }
    }

    async fn request_credential(&self) {
        let Some(host) = &self.host else {
            tracing::warn!(
                "Key picker not found. Ensure GEMINI_API_KEY is set in the environment."
            );
            return;
        };

        if let Err(e) = host.open_select_key().await {
            tracing::warn!("Key selection did not complete: {}", e);
        }
    }

    async fn api_key(&self) -> Option<String> {
        match &self.host {
            Some(host) => host.selected_key().await,
            None => None,
        }
    }
}

/// Asks for an API key on the terminal and keeps it for the process lifetime.
pub struct TerminalKeyPicker<R> {
    input: Mutex<R>,
    selected: RwLock<Option<String>>,
}

impl TerminalKeyPicker<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> TerminalKeyPicker<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn from_reader(input: R) -> Self {
        Self {
            input: Mutex::new(input),
            selected: RwLock::new(None),
        }
    }
}

#[async_trait]
impl<R> CredentialHost for TerminalKeyPicker<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn has_selected_key(&self) -> bool {
        self.selected.read().await.is_some()
    }

    async fn open_select_key(&self) -> Result<()> {
        eprint!("Paste your Gemini API key and press Enter: ");

        let mut line = String::new();
        let read = self.input.lock().await.read_line(&mut line).await?;
        let key = line.trim();

        if read == 0 || key.is_empty() {
            tracing::warn!("No API key entered");
            return Ok(());
        }

        *self.selected.write().await = Some(key.to_string());
        tracing::info!("API key selected for this session");
        Ok(())
    }

    async fn selected_key(&self) -> Option<String> {
        self.selected.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn picker(input: &str) -> Arc<TerminalKeyPicker<Cursor<Vec<u8>>>> {
        Arc::new(TerminalKeyPicker::from_reader(Cursor::new(
            input.as_bytes().to_vec(),
        )))
    }

    #[tokio::test]
    async fn test_without_host_reports_no_credential() {
        let provider = InteractiveCredentialProvider::without_host();
        assert!(!provider.has_credential().await);
        provider.request_credential().await;
        assert!(!provider.has_credential().await);
        assert!(provider.api_key().await.is_none());
    }

    #[tokio::test]
    async fn test_picker_selection_is_visible_to_provider() {
        let provider = InteractiveCredentialProvider::new(picker("  picked-key \n"));
        assert!(!provider.has_credential().await);

        provider.request_credential().await;

        assert!(provider.has_credential().await);
        assert_eq!(provider.api_key().await.as_deref(), Some("picked-key"));
    }

    #[tokio::test]
    async fn test_empty_entry_leaves_credential_absent() {
        let provider = InteractiveCredentialProvider::new(picker("\n"));
        provider.request_credential().await;
        assert!(!provider.has_credential().await);
    }

    #[tokio::test]
    async fn test_closed_input_leaves_credential_absent() {
        let provider = InteractiveCredentialProvider::new(picker(""));
        provider.request_credential().await;
        assert!(!provider.has_credential().await);
    }

    #[tokio::test]
    async fn test_reselection_replaces_key() {
        let host = picker("first\nsecond\n");
        let provider = InteractiveCredentialProvider::new(host);

        provider.request_credential().await;
        assert_eq!(provider.api_key().await.as_deref(), Some("first"));

        provider.request_credential().await;
        assert_eq!(provider.api_key().await.as_deref(), Some("second"));
    }
}
