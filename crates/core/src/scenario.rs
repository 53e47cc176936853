//! The structured failure report produced by the text model, and the
//! combined result handed to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// MIME type used for the image data URI.
pub const IMAGE_DATA_URI_MIME: &str = "image/png";

/// One category of failure reasons (market, financial, legal, org, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureCategory {
    pub category_name: String,
    pub reasons: Vec<String>,
}

/// The satirical news report describing the project's future collapse.
///
/// Field names match the response schema declared to the model, so the
/// model's JSON payload deserializes directly into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoomScenario {
    pub headline: String,
    pub date: String,
    pub article_body: String,
    pub failure_analysis: Vec<FailureCategory>,
    pub survival_tips: Vec<String>,
}

impl DoomScenario {
    /// Parse and validate a model payload.
    ///
    /// Missing fields, wrong types and blank required strings are all
    /// reported as [`CoreError::MalformedScenario`]. Nothing is partially
    /// accepted.
    pub fn from_json(payload: &str) -> Result<Self, CoreError> {
        let scenario: Self = serde_json::from_str(payload)
            .map_err(|e| CoreError::MalformedScenario(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Check that every required field carries content.
    ///
    /// Both lists must be non-empty and every string in them non-blank. A
    /// named category may list no reasons.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("headline", &self.headline),
            ("date", &self.date),
            ("articleBody", &self.article_body),
        ] {
            if value.trim().is_empty() {
                return Err(malformed(format!("field `{field}` must not be empty")));
            }
        }

        if self.failure_analysis.is_empty() {
            return Err(malformed("field `failureAnalysis` must not be empty".into()));
        }
        for (i, category) in self.failure_analysis.iter().enumerate() {
            if category.category_name.trim().is_empty() {
                return Err(malformed(format!("failureAnalysis[{i}] has no name")));
            }
            if category.reasons.iter().any(|r| r.trim().is_empty()) {
                return Err(malformed(format!(
                    "failureAnalysis[{i}] `{}` has a blank reason",
                    category.category_name
                )));
            }
        }

        if self.survival_tips.is_empty() {
            return Err(malformed("field `survivalTips` must not be empty".into()));
        }
        if let Some(i) = self.survival_tips.iter().position(|t| t.trim().is_empty()) {
            return Err(malformed(format!("survivalTips[{i}] is blank")));
        }
        Ok(())
    }
}

fn malformed(msg: String) -> CoreError {
    CoreError::MalformedScenario(msg)
}
