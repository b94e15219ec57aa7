//! Application orchestration for one generation attempt.
//!
//! `Idle -> CredentialCheck -> (CredentialPrompt) -> Generating -> outcome`:
//! make sure a key is available, run the batch, and turn whatever happened
//! into exactly one [`GenerationOutcome`].

use crate::ai::{
    AuthFailureClassifier, GeminiImageClient, ImageGenerationService, VendorAuthClassifier,
};
use crate::batch::BatchGenerator;
use crate::credentials::{
    CredentialProvider, InteractiveCredentialProvider, StaticCredentialProvider, TerminalKeyPicker,
};
use crate::gallery::Gallery;
use crate::models::{Config, GenerationOutcome, GenerationRequest, GenerationResult};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Coordinates the credential gate and the batch generator.
pub struct App {
    credentials: Arc<dyn CredentialProvider>,
    batch: BatchGenerator,
}

/// Outcome of one attempt plus whether re-selection produced a different key.
struct Attempt {
    outcome: GenerationOutcome,
    key_replaced: bool,
}

impl From<GenerationOutcome> for Attempt {
    fn from(outcome: GenerationOutcome) -> Self {
        Self {
            outcome,
            key_replaced: false,
        }
    }
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub credentials: Arc<dyn CredentialProvider>,
    pub image_gen: Arc<dyn ImageGenerationService>,
    pub classifier: Arc<dyn AuthFailureClassifier>,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices) -> Self {
        Self {
            credentials: services.credentials,
            batch: BatchGenerator::with_classifier(services.image_gen, services.classifier),
        }
    }

    /// Compose the app from configuration.
    ///
    /// A deployment-time key selects the static provider; without one the user
    /// is asked for a key on the terminal when it is first needed.
    pub fn from_config(config: &Config) -> Self {
        let credentials: Arc<dyn CredentialProvider> = match &config.api_key {
            Some(key) => {
                info!("Using API key from environment");
                Arc::new(StaticCredentialProvider::new(Some(key.clone())))
            }
            None => {
                info!("No API key in environment; will ask interactively");
                Arc::new(InteractiveCredentialProvider::new(Arc::new(
                    TerminalKeyPicker::stdin(),
                )))
            }
        };

        let mut image_client =
            GeminiImageClient::new_with_client(config.image_model.clone(), reqwest::Client::new())
                .with_image_size(config.image_size.clone())
                .with_timeout(config.request_timeout);
        if let Some(base_url) = &config.base_url {
            image_client = image_client.with_base_url(base_url.clone());
        }
        info!(
            "Image provider: Gemini (model: {}, size: {})",
            config.image_model, config.image_size
        );

        Self::with_services(AppServices {
            credentials,
            image_gen: Arc::new(image_client),
            classifier: Arc::new(VendorAuthClassifier),
        })
    }

    /// Run one generation attempt and classify its result.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationOutcome {
        self.attempt(request).await.outcome
    }

    /// Run a generation attempt and publish its outcome to `gallery`, unless a
    /// newer attempt has started in the meantime.
    ///
    /// A blank prompt is refused before the gallery is touched.
    pub async fn generate_into(
        &self,
        gallery: &Gallery,
        request: &GenerationRequest,
    ) -> GenerationOutcome {
        self.attempt_into(gallery, request).await.outcome
    }

    /// Like [`App::generate_into`], but when the provider rejects the key and
    /// the user selects a different one, the request is run once more with it.
    pub async fn generate_with_reselect(
        &self,
        gallery: &Gallery,
        request: &GenerationRequest,
    ) -> GenerationOutcome {
        let attempt = self.attempt_into(gallery, request).await;
        if !attempt.key_replaced {
            return attempt.outcome;
        }

        info!("A new API key was selected; retrying generation");
        self.generate_into(gallery, request).await
    }

    async fn attempt_into(&self, gallery: &Gallery, request: &GenerationRequest) -> Attempt {
        if request.prompt.trim().is_empty() {
            warn!("Ignoring generation request with an empty prompt");
            return Attempt::from(GenerationOutcome::EmptyPrompt);
        }

        let ticket = gallery.begin_batch().await;
        let attempt = self.attempt(request).await;
        if !gallery.settle(ticket, &attempt.outcome).await {
            info!("A newer generation started; discarding this result");
        }
        attempt
    }

    async fn attempt(&self, request: &GenerationRequest) -> Attempt {
        match self.run(request).await {
            Ok(results) => Attempt::from(GenerationOutcome::Success(results)),
            Err(Error::NoResults) => {
                warn!("Batch produced no images");
                Attempt::from(GenerationOutcome::NoResults)
            }
            Err(Error::AuthRejected(message)) => {
                error!("Credential rejected by provider: {}", message);
                let rejected = self.credentials.api_key().await;
                self.credentials.request_credential().await;
                let selected = self.credentials.api_key().await;
                Attempt {
                    outcome: GenerationOutcome::AuthError,
                    key_replaced: selected.is_some() && selected != rejected,
                }
            }
            Err(Error::CredentialUnavailable) => {
                error!("No API key available after prompting");
                Attempt::from(GenerationOutcome::AuthError)
            }
            Err(Error::InvalidRequest(message)) => {
                warn!("Invalid generation request: {}", message);
                Attempt::from(GenerationOutcome::EmptyPrompt)
            }
            Err(e) => {
                error!("Generation failed: {}", e);
                Attempt::from(GenerationOutcome::GenericError(e.to_string()))
            }
        }
    }

    async fn run(&self, request: &GenerationRequest) -> Result<Vec<GenerationResult>> {
        if request.prompt.trim().is_empty() {
            return Err(Error::InvalidRequest("Prompt must not be empty".to_string()));
        }

        let api_key = self.ensure_credential().await?;

        let images = self
            .batch
            .generate_batch(
                &api_key,
                &request.prompt,
                &request.style_modifier,
                request.aspect_ratio,
                request.count,
            )
            .await?;

        if images.is_empty() {
            return Err(Error::NoResults);
        }

        Ok(images
            .into_iter()
            .map(|image| {
                GenerationResult::new(image, request.prompt.clone(), request.aspect_ratio)
            })
            .collect())
    }

    async fn ensure_credential(&self) -> Result<String> {
        if !self.credentials.has_credential().await {
            info!("No API key selected; opening key selection");
            self.credentials.request_credential().await;
        }

        self.credentials
            .api_key()
            .await
            .ok_or(Error::CredentialUnavailable)
    }
}
