//! Backend proxy for a virtual fashion try-on flow.
//!
//! A web frontend posts a portrait photo and styling preferences; this crate
//! forwards them to the HeadshotMaster image-generation API and relays the
//! generated result back.
//!
//! ## Features
//! - [`FashClient`]: authenticate, upload, create task and poll against the upstream service.
//! - Option validation against the known apps, models and styles.
//! - A prompt template for fashion styling requests ([`StyleRequest`]).
//! - An axum HTTP facade exposing `POST /api/fash-ai` ([`server`]).
//! - An injectable [`Clock`] so polling can be tested without waiting.

pub mod catalog;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod prompt;
pub mod server;
pub mod session;
pub mod types;
pub mod validation;

pub use client::{FashClient, PollSettings};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{ErrorCode, FashError, Result};
pub use prompt::StyleRequest;
pub use session::{Session, SessionState, TokenPolicy};
pub use types::{
    Failure, GenerateOptions, Generation, GenerationOutcome, ImageSource, TaskState, UploadSlot,
};
pub use validation::{validate, Issue, ValidationReport};
