use super::CredentialProvider;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted credential provider for tests and local harnesses.
#[derive(Clone)]
pub struct MockCredentialProvider {
    key: Arc<Mutex<Option<String>>>,
    key_on_request: Arc<Mutex<Option<String>>>,
    check_count: Arc<Mutex<usize>>,
    request_count: Arc<Mutex<usize>>,
}

impl MockCredentialProvider {
    pub fn new() -> Self {
        Self {
            key: Arc::new(Mutex::new(None)),
            key_on_request: Arc::new(Mutex::new(None)),
            check_count: Arc::new(Mutex::new(0)),
            request_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_key(self, key: &str) -> Self {
        *self.key.lock().unwrap() = Some(key.to_string());
        self
    }

    /// Key that becomes available once `request_credential` is called.
    pub fn with_key_on_request(self, key: &str) -> Self {
        *self.key_on_request.lock().unwrap() = Some(key.to_string());
        self
    }

    pub fn get_check_count(&self) -> usize {
        *self.check_count.lock().unwrap()
    }

    pub fn get_request_count(&self) -> usize {
        *self.request_count.lock().unwrap()
    }
}

impl Default for MockCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialProvider for MockCredentialProvider {
    async fn has_credential(&self) -> bool {
        *self.check_count.lock().unwrap() += 1;
        self.key.lock().unwrap().is_some()
    }

    async fn request_credential(&self) {
        *self.request_count.lock().unwrap() += 1;
        if let Some(key) = self.key_on_request.lock().unwrap().clone() {
            *self.key.lock().unwrap() = Some(key);
        }
    }

    async fn api_key(&self) -> Option<String> {
        self.key.lock().unwrap().clone()
    }
}
