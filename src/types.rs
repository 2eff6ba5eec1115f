use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::ErrorCode;
use crate::validation::{Issue, ValidationReport};

/// An image handed to the upload step.
///
/// `Text` holding an `http://` or `https://` URL is downloaded first; any other
/// text is treated as the raw file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Bytes(Vec<u8>),
    Text(String),
}

impl ImageSource {
    /// Empty bytes or empty text carry no image and are skipped.
    pub fn is_empty(&self) -> bool {
        match self {
            ImageSource::Bytes(bytes) => bytes.is_empty(),
            ImageSource::Text(text) => text.is_empty(),
        }
    }

    /// Returns the remote location when this source is an HTTP(S) URL.
    pub fn remote_url(&self) -> Option<&str> {
        match self {
            ImageSource::Text(s) if s.starts_with("http://") || s.starts_with("https://") => {
                Some(s.as_str())
            }
            _ => None,
        }
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

impl From<&[u8]> for ImageSource {
    fn from(bytes: &[u8]) -> Self {
        ImageSource::Bytes(bytes.to_vec())
    }
}

impl From<String> for ImageSource {
    fn from(text: String) -> Self {
        ImageSource::Text(text)
    }
}

impl From<&str> for ImageSource {
    fn from(text: &str) -> Self {
        ImageSource::Text(text.to_string())
    }
}

/// Options accepted by [`FashClient::generate`](crate::FashClient::generate).
///
/// All fields are optional; `app` and `model` fall back to the combiner app
/// and its first model when unset.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub app: Option<String>,
    pub model: Option<String>,
    pub style: Option<String>,
    /// Images in the order the task should receive them.
    pub images: Vec<ImageSource>,
    pub prompt: Option<String>,
    /// Aspect ratio such as `"4:5"`.
    pub ratio: Option<String>,
}

/// (Internal) A generic wrapper for API responses where the content is nested under a "data" field.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    #[serde(default)]
    pub(crate) data: Option<T>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct ChallengeData {
    pub(crate) challenge_token: Option<String>,
}

/// A one-time pair of URLs for transferring a single asset.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct UploadSlot {
    /// Write target, consumed by a raw `PUT`.
    pub put: String,
    /// Read URL handed to the generation task.
    pub get: String,
}

/// (Internal) Body of the task creation call.
#[derive(Debug, Serialize)]
pub(crate) struct CreateTaskRequest<'a> {
    pub(crate) app_code: &'a str,
    pub(crate) model_code: &'a str,
    pub(crate) media_urls: &'a [String],
    pub(crate) extra_params: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) user_prompt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) style: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) aspect_ratio: Option<&'a str>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct CreateTaskData {
    pub(crate) creation_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct TaskResultData {
    pub(crate) status: Option<i64>,
    /// Absent or `null` while the task is still running.
    #[serde(default)]
    pub(crate) list: Option<Vec<Value>>,
}

/// Represents the lifecycle state of a generation task as reported by the service.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TaskState {
    /// Anything that is not a terminal code.
    Pending,
    Succeeded,
    Failed,
}

impl TaskState {
    /// Maps the numeric status code (`2` done, `3` failed).
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(2) => TaskState::Succeeded,
            Some(3) => TaskState::Failed,
            _ => TaskState::Pending,
        }
    }
}

/// A finished generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generation {
    pub creation_id: String,
    /// Result objects exactly as the service returned them.
    pub result: Vec<Value>,
    pub app: String,
    pub model: String,
    pub style: Option<String>,
    pub warnings: Vec<Issue>,
}

/// A workflow fault converted into a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub code: ErrorCode,
    pub message: String,
}

/// The result of [`FashClient::generate`](crate::FashClient::generate).
///
/// The workflow never returns an `Err`; every fault ends up in one of these variants.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Completed(Generation),
    /// Validation failed and no request was sent.
    Rejected(ValidationReport),
    Failed(Failure),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Completed(_))
    }

    /// Flat `{success, ...}` JSON form.
    pub fn to_json(&self) -> Value {
        match self {
            GenerationOutcome::Completed(g) => json!({
                "success": true,
                "result": g.result,
                "creation_id": g.creation_id,
                "app": g.app,
                "model": g.model,
                "style": g.style,
                "warnings": g.warnings,
            }),
            GenerationOutcome::Rejected(report) => {
                let err = report.to_error();
                json!({
                    "success": false,
                    "code": err.code(),
                    "error": err.to_string(),
                    "errors": report.errors,
                    "warnings": report.warnings,
                })
            }
            GenerationOutcome::Failed(f) => json!({
                "success": false,
                "code": f.code,
                "error": f.message,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_states() {
        assert_eq!(TaskState::from_code(Some(2)), TaskState::Succeeded);
        assert_eq!(TaskState::from_code(Some(3)), TaskState::Failed);
        assert_eq!(TaskState::from_code(Some(1)), TaskState::Pending);
        assert_eq!(TaskState::from_code(None), TaskState::Pending);
    }

    #[test]
    fn only_http_text_is_remote() {
        assert_eq!(
            ImageSource::from("https://example.com/a.png").remote_url(),
            Some("https://example.com/a.png")
        );
        assert_eq!(ImageSource::from("raw bytes").remote_url(), None);
        assert_eq!(ImageSource::from(vec![1u8, 2, 3]).remote_url(), None);
    }

    #[test]
    fn create_task_body_omits_unset_fields() {
        let urls = vec!["https://cdn.example.com/1.png".to_string()];
        let body = CreateTaskRequest {
            app_code: "image_combiner",
            model_code: "nano_banana",
            media_urls: &urls,
            extra_params: Map::new(),
            user_prompt: Some("hello"),
            style: None,
            aspect_ratio: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "app_code": "image_combiner",
                "model_code": "nano_banana",
                "media_urls": ["https://cdn.example.com/1.png"],
                "extra_params": {},
                "user_prompt": "hello"
            })
        );
    }

    #[test]
    fn empty_sources_carry_no_image() {
        assert!(ImageSource::Bytes(Vec::new()).is_empty());
        assert!(ImageSource::from("").is_empty());
        assert!(!ImageSource::from("x").is_empty());
    }

    #[test]
    fn null_result_list_is_accepted() {
        let data: TaskResultData =
            serde_json::from_value(json!({ "status": 1, "list": null })).unwrap();
        assert_eq!(data.status, Some(1));
        assert_eq!(data.list, None);
    }

    #[test]
    fn rejected_outcome_carries_validation_code() {
        let report = crate::validation::validate(&GenerateOptions::default());
        let value = GenerationOutcome::Rejected(report).to_json();
        assert_eq!(value["success"], false);
        assert_eq!(value["code"], "validation_error");
        assert_eq!(value["error"], "Invalid request: Provide image or prompt");
        assert_eq!(value["errors"][0]["field"], "input");
    }

    #[test]
    fn failed_outcome_serialises_flat() {
        let outcome = GenerationOutcome::Failed(Failure {
            code: ErrorCode::TaskFailedError,
            message: "Task c1 failed".into(),
        });
        let value = outcome.to_json();
        assert_eq!(value["success"], false);
        assert_eq!(value["code"], "task_failed_error");
        assert_eq!(value["error"], "Task c1 failed");
    }
}
