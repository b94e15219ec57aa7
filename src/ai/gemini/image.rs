use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentResponse, Part};
use crate::ai::mime::detect_image_mime;
use crate::ai::ImageGenerationService;
use crate::models::{AspectRatio, EncodedImage, DEFAULT_IMAGE_SIZE};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ImageRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: ImageGenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageGenerationConfig {
    response_modalities: Vec<String>,
    image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
    image_size: String,
}

pub struct GeminiImageClient {
    http: GeminiHttpClient,
    image_size: String,
}

impl GeminiImageClient {
    pub fn new(model: String) -> Self {
        Self::new_with_client(model, reqwest::Client::new())
    }

    pub fn new_with_client(model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(model, Duration::from_secs(120), client),
            image_size: DEFAULT_IMAGE_SIZE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    /// Resolution tier, e.g. `1K`.
    pub fn with_image_size(mut self, image_size: String) -> Self {
        self.image_size = image_size;
        self
    }

    fn build_request(&self, prompt: &str, aspect_ratio: AspectRatio) -> ImageRequest {
        ImageRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part::Text {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: ImageGenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
                image_config: ImageConfig {
                    aspect_ratio: aspect_ratio.as_str().to_string(),
                    image_size: self.image_size.clone(),
                },
            },
        }
    }

    fn extract_image(response: GenerateContentResponse) -> Result<EncodedImage> {
        if let Some(reason) = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
        {
            return Err(Error::ContentBlocked(format!("Prompt blocked: {}", reason)));
        }

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::AiProvider("No candidates in Gemini response".to_string()))?;

        let inline_data = candidate
            .content
            .into_iter()
            .flat_map(|content| content.parts)
            .find_map(|part| match part {
                Part::InlineData { inline_data } if !inline_data.data.is_empty() => {
                    Some(inline_data)
                }
                _ => None,
            })
            .ok_or_else(|| match &candidate.finish_reason {
                Some(reason) => Error::AiProvider(format!(
                    "No image data in Gemini response (finish reason: {})",
                    reason
                )),
                None => Error::AiProvider("No image data in Gemini response".to_string()),
            })?;

        use base64::Engine as _;
        let data = base64::engine::general_purpose::STANDARD
            .decode(&inline_data.data)
            .map_err(|e| {
                Error::AiProvider(format!("Failed to decode Gemini base64 image: {}", e))
            })?;

        let mime_type = inline_data
            .mime_type
            .filter(|mime| !mime.is_empty())
            .unwrap_or_else(|| detect_image_mime(&data).to_string());

        tracing::debug!("Gemini returned image with mime_type: {}", mime_type);
        Ok(EncodedImage::new(mime_type, data))
    }
}

#[async_trait]
impl ImageGenerationService for GeminiImageClient {
    async fn generate_image(
        &self,
        api_key: &str,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<EncodedImage> {
        let request = self.build_request(prompt, aspect_ratio);
        let response: GenerateContentResponse =
            self.http.generate_content(api_key, &request).await?;
        Self::extract_image(response)
    }
}
