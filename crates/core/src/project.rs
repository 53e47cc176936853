//! The project description submitted through the form.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;

/// Project details captured from the input form.
///
/// Only `name` and `description` are mandatory. The remaining fields are
/// passed to the model verbatim and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub monetization: String,
    #[serde(default)]
    pub challenges: String,
    #[serde(default)]
    pub tech_stack: String,
}

impl ProjectInput {
    /// Shorthand for the common case of only the mandatory fields.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Validate a submitted [`ProjectInput`], flattening field errors into a
/// single [`CoreError::Validation`] message.
pub fn validate_project_input(input: &ProjectInput) -> Result<(), CoreError> {
    input.validate().map_err(|errors| {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let reasons: Vec<&str> = errs.iter().map(|e| e.code.as_ref()).collect();
                format!("{field} ({})", reasons.join(", "))
            })
            .collect();
        fields.sort();
        CoreError::Validation(format!("Invalid project input: {}", fields.join("; ")))
    })
}
