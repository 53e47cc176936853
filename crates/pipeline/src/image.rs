//! Illustration of a finished scenario.
//!
//! Image generation is best-effort: [`ImageGenerator::generate`] logs any
//! failure and returns `None` so a successful scenario is always
//! deliverable on its own.

use std::sync::Arc;

use premortem_core::prompt::build_image_prompt;
use premortem_core::scenario::{png_data_uri, DoomScenario};
use premortem_gemini::api::GeminiApiError;
use premortem_gemini::messages::ImageConfig;
use premortem_gemini::service::{ImageGenerationRequest, ImageGenerationService};

/// Why no image was produced. Never surfaced to the user.
#[derive(Debug, thiserror::Error)]
pub enum ImageFailure {
    #[error("Image request failed: {0}")]
    Service(#[from] GeminiApiError),

    #[error("Response contained no inline image data (finish reason: {finish_reason:?})")]
    NoImageData { finish_reason: Option<String> },
}

/// Calls the image model once per scenario.
pub struct ImageGenerator {
    service: Arc<dyn ImageGenerationService>,
    model: String,
    image_config: ImageConfig,
}

impl ImageGenerator {
    pub fn new(
        service: Arc<dyn ImageGenerationService>,
        model: impl Into<String>,
        image_config: ImageConfig,
    ) -> Self {
        Self {
            service,
            model: model.into(),
            image_config,
        }
    }

    /// Generate an illustration, returning a PNG data URI or `None`.
    pub async fn generate(&self, scenario: &DoomScenario, project_name: &str) -> Option<String> {
        match self.try_generate(scenario, project_name).await {
            Ok(uri) => Some(uri),
            Err(e) => {
                tracing::warn!(
                    model = %self.model,
                    error = %e,
                    "Image generation failed, continuing without image"
                );
                None
            }
        }
    }

    /// Like [`generate`](Self::generate) but exposes the failure reason.
    pub async fn try_generate(
        &self,
        scenario: &DoomScenario,
        project_name: &str,
    ) -> Result<String, ImageFailure> {
        let request = ImageGenerationRequest {
            model: self.model.clone(),
            prompt: build_image_prompt(scenario, project_name),
            image_config: self.image_config.clone(),
        };

        let response = self.service.generate_image(&request).await?;

        match response.first_inline_data() {
            Some(inline) => {
                tracing::debug!(
                    model = %self.model,
                    mime_type = %inline.mime_type,
                    bytes_b64 = inline.data.len(),
                    "Image received",
                );
                Ok(png_data_uri(&inline.data))
            }
            None => Err(ImageFailure::NoImageData {
                finish_reason: response.finish_reason().map(str::to_string),
            }),
        }
    }
}
