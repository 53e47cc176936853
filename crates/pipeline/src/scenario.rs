//! Structured scenario generation.

use std::sync::Arc;

use premortem_core::error::CoreError;
use premortem_core::project::ProjectInput;
use premortem_core::prompt::ScenarioRequestBuilder;
use premortem_core::scenario::DoomScenario;
use premortem_gemini::api::GeminiApiError;
use premortem_gemini::service::{TextGenerationRequest, TextGenerationService, JSON_MIME_TYPE};

/// Why the scenario stage failed. Any of these aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum GenerationFailure {
    /// The text service call itself failed.
    #[error("Scenario request failed: {0}")]
    Service(#[from] GeminiApiError),

    /// The service answered without a textual payload.
    #[error("Failed to generate scenario")]
    EmptyResponse,

    /// The payload did not match the declared schema.
    #[error("Malformed scenario response: {0}")]
    MalformedResponse(#[source] CoreError),
}

/// Calls the text model once per input and parses its structured output.
pub struct ScenarioGenerator {
    service: Arc<dyn TextGenerationService>,
    model: String,
    builder: ScenarioRequestBuilder,
}

impl ScenarioGenerator {
    pub fn new(
        service: Arc<dyn TextGenerationService>,
        model: impl Into<String>,
        builder: ScenarioRequestBuilder,
    ) -> Self {
        Self {
            service,
            model: model.into(),
            builder,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate a [`DoomScenario`] for `input`. Single attempt, no retries.
    pub async fn generate(&self, input: &ProjectInput) -> Result<DoomScenario, GenerationFailure> {
        let built = self.builder.build(input);
        let request = TextGenerationRequest {
            model: self.model.clone(),
            prompt: built.prompt,
            system_instruction: built.system_instruction,
            response_schema: built.schema,
            response_mime_type: JSON_MIME_TYPE.to_string(),
        };

        let response = self.service.generate_text(&request).await?;

        let Some(text) = response.text() else {
            tracing::warn!(
                model = %self.model,
                finish_reason = response.finish_reason().unwrap_or("none"),
                "Text model returned no payload",
            );
            return Err(GenerationFailure::EmptyResponse);
        };

        let scenario =
            DoomScenario::from_json(&text).map_err(GenerationFailure::MalformedResponse)?;

        tracing::debug!(
            model = %self.model,
            categories = scenario.failure_analysis.len(),
            tips = scenario.survival_tips.len(),
            "Scenario parsed",
        );

        Ok(scenario)
    }
}
