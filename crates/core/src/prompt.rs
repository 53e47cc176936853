//! Prompt and response-schema construction.
//!
//! [`ScenarioRequestBuilder`] turns a [`ProjectInput`] into the prompt,
//! system instruction and structured-output schema sent to the text model.
//! [`build_image_prompt`] derives the image prompt from a finished
//! [`DoomScenario`]. Both are pure.

use serde_json::json;

use crate::project::ProjectInput;
use crate::scenario::DoomScenario;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// The year the failure retrospective is set in (three years out).
pub const DEFAULT_HORIZON_YEAR: i32 = 2027;

/// Output language written into the prompt and schema descriptions.
pub const DEFAULT_OUTPUT_LANGUAGE: &str = "JAPANESE";

// ---------------------------------------------------------------------------
// Scenario request
// ---------------------------------------------------------------------------

/// Everything the text model needs for one scenario generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRequest {
    pub prompt: String,
    pub system_instruction: String,
    /// Gemini structured-output schema (OpenAPI subset).
    pub schema: serde_json::Value,
}

/// Builds [`ScenarioRequest`]s for a fixed horizon year and output language.
#[derive(Debug, Clone)]
pub struct ScenarioRequestBuilder {
    horizon_year: i32,
    language: String,
}

impl Default for ScenarioRequestBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_HORIZON_YEAR, DEFAULT_OUTPUT_LANGUAGE)
    }
}

impl ScenarioRequestBuilder {
    pub fn new(horizon_year: i32, language: impl Into<String>) -> Self {
        Self {
            horizon_year,
            language: language.into(),
        }
    }

    pub fn horizon_year(&self) -> i32 {
        self.horizon_year
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Build the prompt, system instruction and schema for `input`.
    pub fn build(&self, input: &ProjectInput) -> ScenarioRequest {
        ScenarioRequest {
            prompt: self.prompt(input),
            system_instruction: self.system_instruction(),
            schema: self.schema(),
        }
    }

    fn prompt(&self, input: &ProjectInput) -> String {
        let year = self.horizon_year;
        let lang = self.lang_label();
        format!(
            r#"
    Conduct a "Pre-Mortem" for the following startup project.
    Imagine it is the year {year}, and this project has failed catastrophically.

    Project Name: {name}
    Description: {description}
    Target Audience: {target}
    Monetization: {monetization}
    Current Challenges: {challenges}
    Tech Stack: {tech_stack}

    Your persona is a cynical, dark-humored business analyst and historian.
    Be creative, slightly mean, but logically grounded in the weaknesses of the input provided.

    OUTPUT LANGUAGE: {language}

    1. Create a shocking news article about the failure (in {lang}).
    2. List specific reasons for death (Market, Financial, Legal, Org) (in {lang}).
    3. Provide a time-leap survival guide to fix it now (in {lang}).
  "#,
            name = input.name,
            description = input.description,
            target = input.target,
            monetization = input.monetization,
            challenges = input.challenges,
            tech_stack = input.tech_stack,
            language = self.language,
        )
    }

    fn system_instruction(&self) -> String {
        format!(
            "You are an AI simulating a future where the user's business has failed. \
             You are witty, dark, and brutally honest. \
             You must output strictly valid JSON in {}.",
            self.lang_label()
        )
    }

    fn schema(&self) -> serde_json::Value {
        let lang = self.lang_label();
        let year = self.horizon_year;
        json!({
            "type": "OBJECT",
            "properties": {
                "headline": {
                    "type": "STRING",
                    "description": format!("A sensational, tabloid-style news headline announcing the project's failure (in {lang})."),
                },
                "date": {
                    "type": "STRING",
                    "description": format!("A specific date in {year} (e.g., {year}年X月Y日)."),
                },
                "articleBody": {
                    "type": "STRING",
                    "description": format!("A 300-word dystopian news article describing the collapse in {lang}. Use cynical, dramatic tone. Mention debt, lawsuits, or public embarrassment."),
                },
                "failureAnalysis": {
                    "type": "ARRAY",
                    "description": format!("Detailed analysis of why it failed, categorized (in {lang})."),
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "categoryName": {
                                "type": "STRING",
                                "description": "e.g., 市場要因, 財務要因, 法的トラブル, 組織崩壊",
                            },
                            "reasons": {
                                "type": "ARRAY",
                                "items": { "type": "STRING" },
                                "description": format!("Specific, biting reasons for failure based on user input (in {lang})."),
                            },
                        },
                        "required": ["categoryName", "reasons"],
                    },
                },
                "survivalTips": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": format!("Actionable, serious advice to prevent this specific future (in {lang}). Constructive feedback."),
                },
            },
            "required": ["headline", "date", "articleBody", "failureAnalysis", "survivalTips"],
        })
    }

    /// `JAPANESE` -> `Japanese`, for use inside sentences.
    fn lang_label(&self) -> String {
        let lower = self.language.to_lowercase();
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => lower,
        }
    }
}

// ---------------------------------------------------------------------------
// Image prompt
// ---------------------------------------------------------------------------

/// Build the image-generation prompt for a finished scenario.
pub fn build_image_prompt(scenario: &DoomScenario, project_name: &str) -> String {
    format!(
        r#"
      A hyper-realistic, dramatic, cinematic wide shot or a high-quality 3D conceptual infographic representing the collapse of a company named "{project_name}".

      Context of the image: {headline}.

      The mood should be ominous, corporate dystopian, or chaotic.
      Lighting: Low key, dramatic shadows, neon glitches or cold office lighting.
      No text overlays unless it's environmental (like a broken sign).
      Style: Editorial photography for a business magazine covering a scandal.
    "#,
        headline = scenario.headline,
    )
}
