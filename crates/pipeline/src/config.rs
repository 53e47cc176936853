use premortem_core::prompt::{DEFAULT_HORIZON_YEAR, DEFAULT_OUTPUT_LANGUAGE};
use premortem_gemini::messages::ImageConfig;

/// Default model for structured scenario generation.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-pro-preview";

/// Default model for image generation.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-3-pro-image-preview";

/// Model selection and prompt parameters for a simulation pipeline.
///
/// Populated by the hosting binary; this crate never reads the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub text_model: String,
    pub image_model: String,
    pub image_config: ImageConfig,
    pub horizon_year: i32,
    pub language: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            image_config: ImageConfig::default(),
            horizon_year: DEFAULT_HORIZON_YEAR,
            language: DEFAULT_OUTPUT_LANGUAGE.to_string(),
        }
    }
}
