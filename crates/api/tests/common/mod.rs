#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use premortem_api::config::{GeminiConfig, ServerConfig};
use premortem_api::router::build_app_router;
use premortem_api::state::AppState;
use premortem_core::scenario::{DoomScenario, FailureCategory};
use premortem_gemini::api::GeminiApiError;
use premortem_gemini::credentials::StaticCredentialGate;
use premortem_gemini::messages::{Candidate, Content, GenerateContentResponse, InlineData, Part};
use premortem_gemini::service::{
    ImageGenerationRequest, ImageGenerationService, TextGenerationRequest, TextGenerationService,
};
use premortem_pipeline::config::GenerationSettings;
use premortem_pipeline::orchestrator::SimulationOrchestrator;
use tokio::sync::Notify;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        gemini: GeminiConfig {
            api_key: Some("test-key".to_string()),
            base_url: "http://localhost:0".to_string(),
            http_timeout: Duration::from_secs(5),
            generation: GenerationSettings::default(),
        },
    }
}

pub fn fixture_scenario() -> DoomScenario {
    DoomScenario {
        headline: "「猫のUber」、2027年に全面停止".into(),
        date: "2027年3月14日".into(),
        article_body: "ペット配車サービスは崩壊した。".into(),
        failure_analysis: vec![FailureCategory {
            category_name: "市場要因".into(),
            reasons: vec!["猫は移動を望まない".into()],
        }],
        survival_tips: vec!["今すぐ顧客インタビューを行え".into()],
    }
}

fn response_with(part: Part) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: Some(Content {
                role: Some("model".into()),
                parts: vec![part],
            }),
            finish_reason: Some("STOP".into()),
        }],
    }
}

/// Text fake: returns `payload` (or an empty response when `None`),
/// optionally holding each call until released.
pub struct FakeText {
    payload: Option<String>,
    gate: Option<Notify>,
    pub entered: Notify,
}

impl FakeText {
    pub fn returning(payload: Option<String>) -> Arc<Self> {
        Arc::new(Self {
            payload,
            gate: None,
            entered: Notify::new(),
        })
    }

    pub fn fixture() -> Arc<Self> {
        Self::returning(Some(serde_json::to_string(&fixture_scenario()).unwrap()))
    }

    pub fn gated_fixture() -> Arc<Self> {
        Arc::new(Self {
            payload: Some(serde_json::to_string(&fixture_scenario()).unwrap()),
            gate: Some(Notify::new()),
            entered: Notify::new(),
        })
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }
}

#[async_trait]
impl TextGenerationService for FakeText {
    async fn generate_text(
        &self,
        _request: &TextGenerationRequest,
    ) -> Result<GenerateContentResponse, GeminiApiError> {
        self.entered.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Ok(match &self.payload {
            Some(text) => response_with(Part::text(text.clone())),
            None => GenerateContentResponse::default(),
        })
    }
}

/// Image fake: returns inline `data`, or fails when `None`.
pub struct FakeImage {
    data: Option<String>,
}

impl FakeImage {
    pub fn returning(data: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            data: data.map(str::to_string),
        })
    }
}

#[async_trait]
impl ImageGenerationService for FakeImage {
    async fn generate_image(
        &self,
        _request: &ImageGenerationRequest,
    ) -> Result<GenerateContentResponse, GeminiApiError> {
        match &self.data {
            Some(data) => Ok(response_with(Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: "image/png".into(),
                    data: data.clone(),
                }),
            })),
            None => Err(GeminiApiError::ApiError {
                status: 503,
                body: "overloaded".into(),
            }),
        }
    }
}

/// Build the full application router over the given fakes.
pub fn build_test_app(
    text: Arc<FakeText>,
    image: Arc<FakeImage>,
    api_key: Option<&str>,
) -> Router {
    let config = test_config();
    let orchestrator = Arc::new(SimulationOrchestrator::from_settings(
        text,
        image,
        &config.gemini.generation,
    ));
    let state = AppState {
        config: Arc::new(config),
        orchestrator,
        credentials: Arc::new(StaticCredentialGate::new(api_key.map(str::to_string))),
    };
    build_app_router(state)
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
