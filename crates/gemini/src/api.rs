//! REST client for the Gemini `generateContent` endpoint.
//!
//! Wraps `POST {base_url}/models/{model}:generateContent` using
//! [`reqwest`]. The API key is resolved per call from the injected
//! [`CredentialGate`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::credentials::CredentialGate;
use crate::messages::{GenerateContentRequest, GenerateContentResponse};
use crate::service::{
    ImageGenerationRequest, ImageGenerationService, TextGenerationRequest, TextGenerationService,
};

/// Public Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client for the Gemini API.
pub struct GeminiApi {
    client: reqwest::Client,
    credentials: Arc<dyn CredentialGate>,
    base_url: String,
}

/// Errors from the Gemini REST layer.
#[derive(Debug, thiserror::Error)]
pub enum GeminiApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gemini returned a non-2xx status code.
    #[error("Gemini API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The credential gate had no key to offer.
    #[error("No API key has been selected")]
    MissingApiKey,
}

impl GeminiApi {
    /// Create a client with a default [`reqwest::Client`] using `timeout`
    /// for every request.
    ///
    /// * `base_url` - e.g. [`DEFAULT_BASE_URL`], or a mock server URI in tests.
    pub fn new(
        credentials: Arc<dyn CredentialGate>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GeminiApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, credentials, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        credentials: Arc<dyn CredentialGate>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            credentials,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one `generateContent` call for `model`.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiApiError> {
        let api_key = self
            .credentials
            .api_key()
            .await
            .ok_or(GeminiApiError::MissingApiKey)?;

        tracing::debug!(model, "Sending generateContent request");

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, model))
            .header(API_KEY_HEADER, api_key)
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, turning anything
    /// else into [`GeminiApiError::ApiError`] with the body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GeminiApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GeminiApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GeminiApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl TextGenerationService for GeminiApi {
    async fn generate_text(
        &self,
        request: &TextGenerationRequest,
    ) -> Result<GenerateContentResponse, GeminiApiError> {
        self.generate_content(&request.model, &GenerateContentRequest::from(request))
            .await
    }
}

#[async_trait]
impl ImageGenerationService for GeminiApi {
    async fn generate_image(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<GenerateContentResponse, GeminiApiError> {
        self.generate_content(&request.model, &GenerateContentRequest::from(request))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredentialGate;
    use crate::messages::ImageConfig;
    use crate::service::JSON_MIME_TYPE;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api(server: &MockServer, key: Option<&str>) -> GeminiApi {
        let gate = Arc::new(StaticCredentialGate::new(key.map(str::to_string)));
        GeminiApi::new(gate, server.uri(), Duration::from_secs(10)).unwrap()
    }

    fn text_request() -> TextGenerationRequest {
        TextGenerationRequest {
            model: "test-text".into(),
            prompt: "pre-mortem please".into(),
            system_instruction: "be cynical".into(),
            response_schema: serde_json::json!({"type": "OBJECT"}),
            response_mime_type: JSON_MIME_TYPE.into(),
        }
    }

    #[tokio::test]
    async fn generate_text_posts_to_model_endpoint_with_key() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/test-text:generateContent"))
            .and(header("x-goog-api-key", "secret"))
            .and(body_partial_json(serde_json::json!({
                "systemInstruction": {"parts": [{"text": "be cynical"}]},
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "{}"}]}, "finishReason": "STOP"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = api(&server, Some("secret"))
            .generate_text(&text_request())
            .await
            .unwrap();
        assert_eq!(response.text().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn generate_image_returns_inline_data() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/test-image:generateContent"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": {"imageConfig": {"aspectRatio": "16:9", "imageSize": "2K"}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [
                    {"inlineData": {"mimeType": "image/png", "data": "QUJD"}}
                ]}}]
            })))
            .mount(&server)
            .await;

        let request = ImageGenerationRequest {
            model: "test-image".into(),
            prompt: "collapse".into(),
            image_config: ImageConfig::default(),
        };
        let response = api(&server, Some("secret"))
            .generate_image(&request)
            .await
            .unwrap();
        assert_eq!(response.first_inline_data().unwrap().data, "QUJD");
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exhausted"))
            .mount(&server)
            .await;

        let err = api(&server, Some("secret"))
            .generate_text(&text_request())
            .await
            .unwrap_err();
        match err {
            GeminiApiError::ApiError { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exhausted");
            }
            other => panic!("Expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = api(&server, None)
            .generate_text(&text_request())
            .await
            .unwrap_err();
        assert!(matches!(err, GeminiApiError::MissingApiKey));
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let gate = Arc::new(StaticCredentialGate::default());
        let api = GeminiApi::with_client(reqwest::Client::new(), gate, "http://host/v1beta/");
        assert_eq!(api.base_url(), "http://host/v1beta");
    }
}
