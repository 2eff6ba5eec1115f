use serde::Serialize;
use std::time::Duration;

/// Represents the possible errors that can occur while talking to the upstream service.
#[derive(Debug, thiserror::Error)]
pub enum FashError {
    /// The request options did not pass validation.
    #[error("Invalid request: {0}")]
    Validation(String),
    /// The challenge endpoint did not hand out a token.
    #[error("Authentication failed: {0}")]
    Authentication(String),
    /// Upload slot negotiation or a binary transfer failed.
    #[error("Upload failed: {0}")]
    Upload(String),
    /// The task creation response carried no creation id.
    #[error("No creation_id received")]
    TaskCreation,
    /// The upstream service marked the task as failed.
    #[error("Task {creation_id} failed")]
    TaskFailed { creation_id: String },
    /// The task did not reach a terminal state before the deadline.
    #[error("Polling timeout exceeded for task {creation_id} after {timeout:?}")]
    PollTimeout {
        creation_id: String,
        timeout: Duration,
    },
    /// The API returned a non-successful status code.
    #[error("[API_ERR] {endpoint}: {message}")]
    Api { endpoint: String, message: String },
    #[error("Network request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Failed to parse API response: {0}")]
    ResponseParseFailed(#[from] serde_json::Error),
    #[error("URL parsing failed: {0}")]
    UrlParseFailed(#[from] url::ParseError),
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    /// The caller supplied an image that is not valid base64.
    #[error("Invalid base64 image: {0}")]
    ImageDecode(#[from] base64::DecodeError),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Stable, machine-readable classification of a [`FashError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ValidationError,
    AuthenticationError,
    UploadError,
    TaskCreationError,
    TaskFailedError,
    PollTimeoutError,
    ApiError,
    TransportError,
    InvalidInput,
    ConfigError,
}

impl FashError {
    pub fn code(&self) -> ErrorCode {
        match self {
            FashError::Validation(_) => ErrorCode::ValidationError,
            FashError::Authentication(_) => ErrorCode::AuthenticationError,
            FashError::Upload(_) => ErrorCode::UploadError,
            FashError::TaskCreation => ErrorCode::TaskCreationError,
            FashError::TaskFailed { .. } => ErrorCode::TaskFailedError,
            FashError::PollTimeout { .. } => ErrorCode::PollTimeoutError,
            FashError::Api { .. } => ErrorCode::ApiError,
            FashError::RequestFailed(_) | FashError::ResponseParseFailed(_) => {
                ErrorCode::TransportError
            }
            FashError::UrlParseFailed(_)
            | FashError::InvalidHeader(_)
            | FashError::ImageDecode(_) => ErrorCode::InvalidInput,
            FashError::Config(_) => ErrorCode::ConfigError,
        }
    }
}

pub type Result<T> = std::result::Result<T, FashError>;
