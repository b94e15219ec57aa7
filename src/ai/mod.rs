//! Image generation provider integration
//!
//! Wraps Gemini's `generateContent` image endpoint behind a trait so the batch
//! generator can be driven by the real client or by a scripted mock.

pub mod classify;
pub mod gemini;
pub mod mime;
pub mod mock;

pub use classify::{
    AuthFailureClassifier, CallFailure, MessageAuthClassifier, VendorAuthClassifier,
};
pub use gemini::GeminiImageClient;
pub use mock::{MockImageGenerationClient, MockImageOutcome, RecordedCall};

use crate::models::{AspectRatio, EncodedImage};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// One generation call. `api_key` is passed per call so a freshly selected
    /// key is picked up without rebuilding the client.
    async fn generate_image(
        &self,
        api_key: &str,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<EncodedImage>;
}
