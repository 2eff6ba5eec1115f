//! Pre-flight checks on [`GenerateOptions`] against the known catalog.
use serde::Serialize;

use crate::catalog::{self, COMBINER_APP, COMBINER_MODELS, FIGURE_APP, GENERATOR_MODELS, STYLES};
use crate::error::FashError;
use crate::types::{GenerateOptions, ImageSource};

/// A single validation error or warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Accepted values, when the field is an enumeration.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub valid: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl ValidationReport {
    /// All error messages joined into one line.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn to_error(&self) -> FashError {
        FashError::Validation(self.error_summary())
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn enum_error(field: &str, value: &str, valid: &[&str]) -> Issue {
    Issue {
        field: field.to_string(),
        value: Some(value.to_string()),
        valid: valid.iter().map(|s| s.to_string()).collect(),
        message: format!("Invalid {}. Use: {}", field, valid.join(", ")),
    }
}

fn mismatch_warning(model: &str, app: &str, suggested: &[&str]) -> Issue {
    Issue {
        field: "model".to_string(),
        value: None,
        valid: Vec::new(),
        message: format!(
            "Model '{}' may not work with '{}'. Try: {}",
            model,
            app,
            suggested.join(", ")
        ),
    }
}

/// Checks the options without touching the network.
///
/// `valid` is true iff no errors were recorded; warnings never block.
pub fn validate(options: &GenerateOptions) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let app = present(&options.app);
    let model = present(&options.model);

    if let Some(app) = app {
        if !catalog::APPS.contains(&app) {
            errors.push(enum_error("app", app, &catalog::APPS));
        }
    }

    if let Some(model) = model {
        let all = catalog::all_models();
        if !all.contains(&model) {
            errors.push(enum_error("model", model, &all));
        }
    }

    if let Some(style) = present(&options.style) {
        if !STYLES.contains(&style) {
            errors.push(enum_error("style", style, &STYLES));
        }
    }

    if let (Some(app), Some(model)) = (app, model) {
        if app == COMBINER_APP && !COMBINER_MODELS.contains(&model) {
            warnings.push(mismatch_warning(model, app, &COMBINER_MODELS));
        }
        if app == FIGURE_APP && !GENERATOR_MODELS.contains(&model) {
            warnings.push(mismatch_warning(model, app, &GENERATOR_MODELS));
        }
    }

    let has_image = options.images.iter().any(|image| !image.is_empty());
    if !has_image && present(&options.prompt).is_none() {
        errors.push(Issue {
            field: "input".to_string(),
            value: None,
            valid: Vec::new(),
            message: "Provide image or prompt".to_string(),
        });
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}
