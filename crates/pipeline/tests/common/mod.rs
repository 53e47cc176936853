//! Deterministic service fakes shared by the pipeline integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use premortem_core::scenario::{DoomScenario, FailureCategory};
use premortem_gemini::api::GeminiApiError;
use premortem_gemini::messages::{Candidate, Content, GenerateContentResponse, InlineData, Part};
use premortem_gemini::service::{
    ImageGenerationRequest, ImageGenerationService, TextGenerationRequest, TextGenerationService,
};
use premortem_pipeline::config::GenerationSettings;
use premortem_pipeline::orchestrator::SimulationOrchestrator;
use tokio::sync::Notify;

/// Fixture scenario used for round-trip checks.
pub fn fixture_scenario() -> DoomScenario {
    DoomScenario {
        headline: "「猫のUber」、2027年に全面停止".into(),
        date: "2027年3月14日".into(),
        article_body: "ペット配車サービスは、乗車を拒否する猫たちによって崩壊した。".into(),
        failure_analysis: vec![
            FailureCategory {
                category_name: "市場要因".into(),
                reasons: vec!["猫は移動を望まない".into(), "需要の過大評価".into()],
            },
            FailureCategory {
                category_name: "法的トラブル".into(),
                reasons: vec!["動物愛護法違反".into()],
            },
        ],
        survival_tips: vec!["今すぐ顧客インタビューを行え".into()],
    }
}

/// A response whose first candidate carries `text`.
pub fn text_response(text: &str) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: Some(Content {
                role: Some("model".into()),
                parts: vec![Part::text(text)],
            }),
            finish_reason: Some("STOP".into()),
        }],
    }
}

/// A response whose first candidate carries one inline PNG.
pub fn image_response(data: &str) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: Some(Content {
                role: Some("model".into()),
                parts: vec![Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: "image/png".into(),
                        data: data.into(),
                    }),
                }],
            }),
            finish_reason: Some("STOP".into()),
        }],
    }
}

/// What a fake returns on each call.
#[derive(Clone)]
pub enum Reply {
    Ok(GenerateContentResponse),
    Err(u16),
}

impl Reply {
    fn produce(&self) -> Result<GenerateContentResponse, GeminiApiError> {
        match self {
            Reply::Ok(response) => Ok(response.clone()),
            Reply::Err(status) => Err(GeminiApiError::ApiError {
                status: *status,
                body: "scripted failure".into(),
            }),
        }
    }
}

/// Text service fake with call/in-flight counters and an optional gate
/// that holds each call until [`release`](Self::release) is called.
pub struct ScriptedText {
    reply: Reply,
    pub calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    gate: Option<Notify>,
    pub entered: Notify,
}

impl ScriptedText {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            gate: None,
            entered: Notify::new(),
        })
    }

    pub fn gated(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            gate: Some(Notify::new()),
            entered: Notify::new(),
        })
    }

    pub fn scenario(scenario: &DoomScenario) -> Arc<Self> {
        Self::new(Reply::Ok(text_response(
            &serde_json::to_string(scenario).unwrap(),
        )))
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerationService for ScriptedText {
    async fn generate_text(
        &self,
        _request: &TextGenerationRequest,
    ) -> Result<GenerateContentResponse, GeminiApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.entered.notify_one();

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.reply.produce()
    }
}

/// Image service fake returning a fixed reply.
pub struct ScriptedImage {
    reply: Reply,
    pub calls: AtomicUsize,
}

impl ScriptedImage {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerationService for ScriptedImage {
    async fn generate_image(
        &self,
        _request: &ImageGenerationRequest,
    ) -> Result<GenerateContentResponse, GeminiApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.produce()
    }
}

pub fn orchestrator(
    text: Arc<ScriptedText>,
    image: Arc<ScriptedImage>,
) -> SimulationOrchestrator {
    SimulationOrchestrator::from_settings(text, image, &GenerationSettings::default())
}
