use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::prompt::StyleRequest;
use crate::types::GenerationOutcome;

/// Body of `POST /api/fash-ai`.
#[derive(Debug, Deserialize)]
pub struct FashAiRequest {
    /// Base64 payload, optionally wrapped in a `data:` URL.
    pub image_b64: String,
    #[serde(flatten)]
    pub style: StyleRequest,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FashAiResponse {
    pub success: bool,
    pub error: Option<String>,
    pub creation_id: Option<String>,
    pub result: Option<Vec<Value>>,
    pub app: Option<String>,
    pub model: Option<String>,
}

impl FashAiResponse {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            error: Some(message),
            creation_id: None,
            result: None,
            app: None,
            model: None,
        }
    }
}

impl From<GenerationOutcome> for FashAiResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        match outcome {
            GenerationOutcome::Completed(generation) => Self {
                success: true,
                error: None,
                creation_id: Some(generation.creation_id),
                result: Some(generation.result),
                app: Some(generation.app),
                model: Some(generation.model),
            },
            GenerationOutcome::Rejected(report) => Self::failure(report.error_summary()),
            GenerationOutcome::Failed(failure) => Self::failure(failure.message),
        }
    }
}
