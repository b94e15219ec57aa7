use super::ImageGenerationService;
use crate::models::{AspectRatio, EncodedImage};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted result for one mock generation call.
#[derive(Debug, Clone)]
pub enum MockImageOutcome {
    Image(EncodedImage),
    /// Ordinary failure (missing image part, transport error, ...).
    Failure(String),
    /// The provider's not-found response for a rejected key.
    NotFound,
}

/// A call observed by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub api_key: String,
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
}

#[derive(Clone)]
pub struct MockImageGenerationClient {
    outcomes: Arc<Mutex<Vec<MockImageOutcome>>>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    in_flight: Arc<Mutex<usize>>,
    max_in_flight: Arc<Mutex<usize>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(Vec::new())),
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(Mutex::new(0)),
            max_in_flight: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_outcome(self, outcome: MockImageOutcome) -> Self {
        self.outcomes.lock().unwrap().push(outcome);
        self
    }

    pub fn with_image_response(self, data: Vec<u8>) -> Self {
        self.with_outcome(MockImageOutcome::Image(EncodedImage::new("image/png", data)))
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.with_outcome(MockImageOutcome::Failure(message.to_string()))
    }

    pub fn with_not_found(self) -> Self {
        self.with_outcome(MockImageOutcome::NotFound)
    }

    /// Simulated latency applied to every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn get_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Highest number of calls that were in progress at the same time.
    pub fn get_max_in_flight(&self) -> usize {
        *self.max_in_flight.lock().unwrap()
    }

    fn start_call(&self, api_key: &str, prompt: &str, aspect_ratio: AspectRatio) -> usize {
        let mut calls = self.calls.lock().unwrap();
        calls.push(RecordedCall {
            api_key: api_key.to_string(),
            prompt: prompt.to_string(),
            aspect_ratio,
        });

        let mut in_flight = self.in_flight.lock().unwrap();
        *in_flight += 1;
        let mut max_in_flight = self.max_in_flight.lock().unwrap();
        *max_in_flight = (*max_in_flight).max(*in_flight);

        calls.len() - 1
    }

    fn finish_call(&self, index: usize) -> Result<EncodedImage> {
        *self.in_flight.lock().unwrap() -= 1;

        let outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            return Ok(EncodedImage::new("image/png", default_png()));
        }

        match &outcomes[index % outcomes.len()] {
            MockImageOutcome::Image(image) => Ok(image.clone()),
            MockImageOutcome::Failure(message) => Err(Error::AiProvider(message.clone())),
            MockImageOutcome::NotFound => Err(Error::Api {
                status: 404,
                code: Some("NOT_FOUND".to_string()),
                message: "Requested entity was not found.".to_string(),
            }),
        }
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_image(
        &self,
        api_key: &str,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<EncodedImage> {
        let index = self.start_call(api_key, prompt, aspect_ratio);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.finish_call(index)
    }
}

/// A tiny valid 1x1 PNG.
fn default_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
        0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1 pixel
        0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49,
        0x44, 0x41, // IDAT chunk
        0x54, 0x08, 0x99, 0x63, 0xF8, 0xCF, 0xC0, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0xE2,
        0x25, 0x00, 0xBC, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, // IEND chunk
        0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_default_image() {
        let client = MockImageGenerationClient::new();
        let image = client
            .generate_image("key", "test", AspectRatio::Square)
            .await
            .unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(&image.data[..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[tokio::test]
    async fn test_mock_cycles_outcomes() {
        let client = MockImageGenerationClient::new()
            .with_image_response(vec![1])
            .with_failure("no image part")
            .with_not_found();

        assert!(client.generate_image("k", "p", AspectRatio::Square).await.is_ok());
        assert!(matches!(
            client.generate_image("k", "p", AspectRatio::Square).await,
            Err(Error::AiProvider(_))
        ));
        assert!(matches!(
            client.generate_image("k", "p", AspectRatio::Square).await,
            Err(Error::Api { status: 404, .. })
        ));
        assert_eq!(
            client
                .generate_image("k", "p", AspectRatio::Square)
                .await
                .unwrap()
                .data,
            vec![1]
        );
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let client = MockImageGenerationClient::new();
        client
            .generate_image("key-1", "a cat", AspectRatio::Landscape16x9)
            .await
            .unwrap();

        assert_eq!(
            client.get_calls(),
            vec![RecordedCall {
                api_key: "key-1".to_string(),
                prompt: "a cat".to_string(),
                aspect_ratio: AspectRatio::Landscape16x9,
            }]
        );
        assert_eq!(client.get_max_in_flight(), 1);
    }
}
