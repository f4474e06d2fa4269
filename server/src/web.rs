//! HTTP surface: the upload page, the analyze endpoint, and a health probe.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use log::info;
use tower_http::cors::{Any, CorsLayer};

use crate::clients::{TranscriptionProvider, MAX_FILE_SIZE_BYTES};
use crate::insights::{analyze_audio, AudioInsights};

/// Upload types accepted by the web form.
const ALLOWED_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a"];

/// Request body cap: the audio size limit plus multipart framing overhead.
const BODY_LIMIT_BYTES: usize = MAX_FILE_SIZE_BYTES as usize + 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    provider: Arc<dyn TranscriptionProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn TranscriptionProvider>) -> Self {
        Self { provider }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

/// Upload page: form, spinner, and the three result tabs.
async fn index() -> Html<&'static str> {
    const INDEX: &str = include_str!("../static/index.html");
    Html(INDEX)
}

async fn health() -> &'static str {
    "OK"
}

/// POST /api/analyze: multipart upload in, insights JSON out.
///
/// 4xx covers malformed uploads only; analysis failures come back as 200 with
/// the `error` field set, which the page renders as a flat banner.
async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AudioInsights>, (StatusCode, String)> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid multipart body: {}", e),
        )
    })? {
        if field.name() != Some("audio") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let extension = audio_extension(&file_name).ok_or((
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Unsupported file type. Upload a wav, mp3, or m4a file.".to_string(),
        ))?;

        let data = field.bytes().await.map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("Failed to read upload: {}", e),
            )
        })?;

        if data.is_empty() {
            return Err((StatusCode::BAD_REQUEST, "Uploaded file is empty".to_string()));
        }
        if data.len() as u64 > MAX_FILE_SIZE_BYTES {
            return Err((
                StatusCode::PAYLOAD_TOO_LARGE,
                "Audio file too large. Maximum is 25MB.".to_string(),
            ));
        }

        info!("Analyzing upload {} ({} bytes)", file_name, data.len());
        let insights = analyze_audio(state.provider.as_ref(), &data, &extension).await;
        return Ok(Json(insights));
    }

    Err((
        StatusCode::BAD_REQUEST,
        "Missing multipart field 'audio'".to_string(),
    ))
}

/// Extract the lowercase extension if it is an accepted audio type.
fn audio_extension(file_name: &str) -> Option<String> {
    let extension = std::path::Path::new(file_name)
        .extension()?
        .to_str()?
        .to_lowercase();
    ALLOWED_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}
