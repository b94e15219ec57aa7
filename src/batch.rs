//! Concurrent batch generation.
//!
//! Fires `count` independent generation calls at once, waits for every one of
//! them to settle, then reduces the per-call outcomes into a single result:
//! a rejected credential anywhere in the batch wins over any successes, and
//! ordinary failures are dropped.

use crate::ai::{
    AuthFailureClassifier, CallFailure, ImageGenerationService, VendorAuthClassifier,
};
use crate::models::{AspectRatio, EncodedImage};
use crate::{Error, Result};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Base prompt (trimmed) followed by the style modifier, verbatim.
pub fn compose_prompt(prompt: &str, style_modifier: &str) -> String {
    format!("{}{}", prompt.trim(), style_modifier)
}

/// Collapse settled call outcomes into the batch result.
pub fn reduce_outcomes(
    outcomes: Vec<std::result::Result<EncodedImage, CallFailure>>,
) -> Result<Vec<EncodedImage>> {
    let mut images = Vec::with_capacity(outcomes.len());
    let mut auth_failure = None;

    for outcome in outcomes {
        match outcome {
            Ok(image) => images.push(image),
            Err(CallFailure::Auth(message)) => {
                if auth_failure.is_none() {
                    auth_failure = Some(message);
                }
            }
            Err(CallFailure::Generic(message)) => {
                warn!("Dropping failed generation from batch: {}", message);
            }
        }
    }

    match auth_failure {
        Some(message) => Err(Error::AuthRejected(message)),
        None => Ok(images),
    }
}

pub struct BatchGenerator {
    image_gen: Arc<dyn ImageGenerationService>,
    classifier: Arc<dyn AuthFailureClassifier>,
}

impl BatchGenerator {
    pub fn new(image_gen: Arc<dyn ImageGenerationService>) -> Self {
        Self::with_classifier(image_gen, Arc::new(VendorAuthClassifier))
    }

    pub fn with_classifier(
        image_gen: Arc<dyn ImageGenerationService>,
        classifier: Arc<dyn AuthFailureClassifier>,
    ) -> Self {
        Self {
            image_gen,
            classifier,
        }
    }

    /// Generate up to `count` images for one prompt.
    ///
    /// Returns fewer images than requested when some calls fail, and
    /// [`Error::AuthRejected`] when any call's credential was rejected.
    /// The order of the returned images carries no meaning.
    pub async fn generate_batch(
        &self,
        api_key: &str,
        prompt: &str,
        style_modifier: &str,
        aspect_ratio: AspectRatio,
        count: usize,
    ) -> Result<Vec<EncodedImage>> {
        let full_prompt = compose_prompt(prompt, style_modifier);
        info!(
            "Generating batch of {} ({}) for prompt ({} chars)",
            count,
            aspect_ratio,
            full_prompt.len()
        );

        let calls = (0..count).map(|slot| {
            let full_prompt = full_prompt.as_str();
            async move {
                let outcome = self
                    .image_gen
                    .generate_image(api_key, full_prompt, aspect_ratio)
                    .await
                    .map_err(|e| self.classifier.classify(&e));
                debug!("Batch slot {} settled (ok: {})", slot, outcome.is_ok());
                outcome
            }
        });

        let outcomes = join_all(calls).await;
        let result = reduce_outcomes(outcomes);

        match &result {
            Ok(images) => info!("Batch settled with {}/{} images", images.len(), count),
            Err(e) => warn!("Batch settled with credential failure: {}", e),
        }
        result
    }
}
