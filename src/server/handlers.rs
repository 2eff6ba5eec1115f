//! Axum request handlers for the HTTP API.
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::{engine::general_purpose, Engine as _};

use crate::client::FashClient;
use crate::error::FashError;
use crate::server::protocol::{FashAiRequest, FashAiResponse};
use crate::server::AppState;

const FAVICON_SVG: &str = r#"<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 64 64'>
    <rect fill='#111827' width='64' height='64' rx='12'/>
    <g transform='translate(8,8) scale(0.9)'>
        <text x='50%' y='50%' font-size='36' fill='#FDE68A' text-anchor='middle' dominant-baseline='central'>🧥</text>
    </g>
</svg>"#;

/// Any fault reaching the handler becomes a 500 with the message as body.
#[derive(Debug)]
pub struct AppError(FashError);

impl From<FashError> for AppError {
    fn from(err: FashError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

/// Decodes a plain base64 string or a `data:<mime>;base64,<payload>` URL.
pub fn decode_image(image_b64: &str) -> Result<Vec<u8>, FashError> {
    let trimmed = image_b64.trim();
    let payload = trimmed
        .split_once(',')
        .map(|(_, data)| data)
        .unwrap_or(trimmed);
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(general_purpose::STANDARD.decode(compact)?)
}

#[tracing::instrument(
    name = "fash_ai",
    skip_all,
    fields(outfit = %body.style.outfit, ratio = %body.style.ratio)
)]
pub async fn fash_ai(
    State(state): State<AppState>,
    Json(body): Json<FashAiRequest>,
) -> Result<Json<FashAiResponse>, AppError> {
    let image = decode_image(&body.image_b64).map_err(|e| {
        tracing::error!(error = %e, "failed to decode uploaded image");
        e
    })?;

    // One client per request keeps identities and tokens apart.
    let mut client = FashClient::new_with_url(&state.config.api_url)?
        .with_clock(state.clock.clone())
        .with_poll_settings(state.config.poll)
        .with_token_policy(state.config.token_policy);

    let outcome = client.fash_ai(image, &body.style).await;
    tracing::info!(success = outcome.is_success(), "generation finished");

    Ok(Json(FashAiResponse::from(outcome)))
}

pub async fn favicon() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/svg+xml")], FAVICON_SVG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_base64() {
        assert_eq!(decode_image("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn strips_data_url_prefix_and_whitespace() {
        assert_eq!(
            decode_image("  data:image/png;base64,aGVs\nbG8=  ").unwrap(),
            b"hello"
        );
    }

    #[test]
    fn rejects_garbage() {
        let err = decode_image("data:image/png;base64,@@not-base64@@").unwrap_err();
        assert!(matches!(err, FashError::ImageDecode(_)));
    }

    #[test]
    fn errors_render_as_500_text() {
        let response = AppError(FashError::TaskCreation).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
