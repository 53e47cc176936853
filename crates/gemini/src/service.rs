//! Service boundaries consumed by the generation pipeline.
//!
//! [`GeminiApi`](crate::api::GeminiApi) implements both traits against the
//! real API. Tests substitute deterministic fakes.

use async_trait::async_trait;

use crate::api::GeminiApiError;
use crate::messages::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig,
};

/// MIME type requesting schema-conformant JSON output.
pub const JSON_MIME_TYPE: &str = "application/json";

/// A structured-output text generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct TextGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub system_instruction: String,
    pub response_schema: serde_json::Value,
    pub response_mime_type: String,
}

/// An image generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub image_config: ImageConfig,
}

impl From<&TextGenerationRequest> for GenerateContentRequest {
    fn from(request: &TextGenerationRequest) -> Self {
        Self {
            contents: vec![Content::user_text(request.prompt.clone())],
            system_instruction: Some(Content::text(request.system_instruction.clone())),
            generation_config: Some(GenerationConfig {
                response_mime_type: Some(request.response_mime_type.clone()),
                response_schema: Some(request.response_schema.clone()),
                image_config: None,
            }),
        }
    }
}

impl From<&ImageGenerationRequest> for GenerateContentRequest {
    fn from(request: &ImageGenerationRequest) -> Self {
        Self {
            contents: vec![Content::user_text(request.prompt.clone())],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                image_config: Some(request.image_config.clone()),
                ..Default::default()
            }),
        }
    }
}

#[async_trait]
pub trait TextGenerationService: Send + Sync {
    async fn generate_text(
        &self,
        request: &TextGenerationRequest,
    ) -> Result<GenerateContentResponse, GeminiApiError>;
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_image(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<GenerateContentResponse, GeminiApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_request_carries_schema_and_system_instruction() {
        let request = TextGenerationRequest {
            model: "m".into(),
            prompt: "p".into(),
            system_instruction: "s".into(),
            response_schema: serde_json::json!({"type": "OBJECT"}),
            response_mime_type: JSON_MIME_TYPE.into(),
        };
        let body = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "p");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "s");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!(body["generationConfig"].get("imageConfig").is_none());
    }

    #[test]
    fn image_request_carries_image_config_only() {
        let request = ImageGenerationRequest {
            model: "m".into(),
            prompt: "draw".into(),
            image_config: ImageConfig {
                aspect_ratio: "1:1".into(),
                image_size: "1K".into(),
            },
        };
        let body = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();
        assert!(body.get("systemInstruction").is_none());
        assert_eq!(body["generationConfig"]["imageConfig"]["aspectRatio"], "1:1");
        assert!(body["generationConfig"].get("responseMimeType").is_none());
    }
}
