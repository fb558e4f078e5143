//! REST handlers for the campaign form, generation, and artifacts.

use crate::content::parse_campaign_text;
use crate::progress::{
    ProgressReporter, CHECKPOINT_ANALYZING, CHECKPOINT_DONE, CHECKPOINT_FINALIZING,
    CHECKPOINT_GENERATED, CHECKPOINT_GENERATING, CLEAR_DELAY, STAGE_DELAY, STATUS_ANALYZING,
    STATUS_FINALIZING, STATUS_GENERATING,
};
use crate::views;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::Json;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use studio_core::prompt::build_prompt;
use studio_core::types::{CampaignRequest, GeneratedImage, GenerationResult, ParsedContent, Sentiment};
use studio_core::{CampaignError, CampaignResult};
use studio_generator::ContentGenerator;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ContentGenerator>,
    pub progress: Arc<dyn ProgressReporter>,
    pub sessions: Arc<DashMap<Uuid, CampaignSession>>,
    /// Sessions older than this are swept when a new one is stored.
    pub session_ttl: chrono::Duration,
    pub node_id: String,
    pub start_time: Instant,
}

/// Output of one generation cycle, kept in memory only as long as the
/// results page, image, and download need it.
pub struct CampaignSession {
    pub brand: String,
    pub raw_text: String,
    pub png: Vec<u8>,
    pub parsed: ParsedContent,
    pub sentiment: Sentiment,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CampaignResponse {
    pub id: Uuid,
    pub slogans: Vec<String>,
    pub hashtags: Vec<String>,
    pub sentiment_label: String,
    pub sentiment_confidence: String,
    pub results_url: String,
    pub image_url: String,
    pub download_url: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// GET / — campaign brief form.
pub async fn index() -> Html<String> {
    Html(views::form_page())
}

/// POST /v1/campaign — run one generation cycle for a brief.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<CampaignRequest>,
) -> Result<Json<CampaignResponse>, (StatusCode, Json<ErrorResponse>)> {
    // Validate input at the API boundary; nothing below runs on failure.
    if let Err(e) = request.validate() {
        warn!(brand = %request.brand, error = %e, "Campaign request validation failed");
        metrics::counter!("api.validation_errors").increment(1);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "invalid_campaign_request".to_string(),
                message: e.to_string(),
            }),
        ));
    }

    let prompt = build_prompt(&request);
    debug!(brand = %request.brand, prompt_chars = prompt.len(), "Prompt built");

    state.progress.status(STATUS_ANALYZING);
    state.progress.progress(CHECKPOINT_ANALYZING);
    tokio::time::sleep(STAGE_DELAY).await;

    state.progress.status(STATUS_GENERATING);
    state.progress.progress(CHECKPOINT_GENERATING);

    let outcome = generate_and_parse(&state, &prompt).await;

    // The bar reaches 100 and is cleared on every path.
    state.progress.progress(CHECKPOINT_DONE);
    tokio::time::sleep(CLEAR_DELAY).await;
    state.progress.clear();

    let (result, parsed, png) = outcome.map_err(|e| {
        error!(error = %e, "Campaign generation failed");
        metrics::counter!("api.generation_errors").increment(1);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "campaign_generation_failed".to_string(),
                message: e.into_generation().to_string(),
            }),
        )
    })?;

    let id = Uuid::new_v4();
    let response = CampaignResponse {
        id,
        slogans: parsed.slogans.clone(),
        hashtags: parsed.hashtags.clone(),
        sentiment_label: result.sentiment.label.title().to_string(),
        sentiment_confidence: views::format_confidence(result.sentiment.score),
        results_url: format!("/campaign/{id}"),
        image_url: format!("/v1/campaign/{id}/image.png"),
        download_url: format!("/v1/campaign/{id}/package"),
    };
    // Sessions outlive the request only long enough to serve the results
    // page and its artifacts; expired ones are dropped here so the map
    // never grows without bound.
    let cutoff = Utc::now() - state.session_ttl;
    state.sessions.retain(|_, session| session.created_at > cutoff);

    state.sessions.insert(
        id,
        CampaignSession {
            brand: request.brand,
            raw_text: result.text,
            png,
            parsed,
            sentiment: result.sentiment,
            created_at: Utc::now(),
        },
    );
    metrics::counter!("api.campaigns_generated").increment(1);

    Ok(Json(response))
}

/// The fallible middle of the cycle: generate, parse, encode. Progress
/// checkpoints 70 and 90 fire between the steps they follow.
async fn generate_and_parse(
    state: &AppState,
    prompt: &str,
) -> CampaignResult<(GenerationResult, ParsedContent, Vec<u8>)> {
    let result = state.generator.generate(prompt).await?;
    state.progress.progress(CHECKPOINT_GENERATED);

    let parsed = parse_campaign_text(&result.text)
        .map_err(|e| CampaignError::Generation(e.to_string()))?;

    state.progress.status(STATUS_FINALIZING);
    state.progress.progress(CHECKPOINT_FINALIZING);
    tokio::time::sleep(STAGE_DELAY).await;

    let png = encode_png(&result.image).map_err(CampaignError::Generation)?;
    Ok((result, parsed, png))
}

fn encode_png(image: &GeneratedImage) -> Result<Vec<u8>, String> {
    let buf = image::RgbImage::from_raw(image.width, image.height, image.pixels.clone())
        .ok_or_else(|| "pixel buffer does not match image dimensions".to_string())?;
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(buf)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|e| e.to_string())?;
    Ok(bytes)
}

/// GET /campaign/{id} — rendered results page.
pub async fn results_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, StatusCode> {
    let session = state.sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Html(views::results_page(id, session.value())))
}

/// GET /v1/campaign/{id}/image.png — campaign visual.
pub async fn campaign_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, StatusCode> {
    let session = state.sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok((
        [(header::CONTENT_TYPE, "image/png".to_string())],
        session.png.clone(),
    ))
}

/// GET /v1/campaign/{id}/package — raw generated text as a download.
/// The package is the full model output, not the parsed extracts.
pub async fn download_package(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, StatusCode> {
    let session = state.sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"{}\"",
                    views::package_filename(&session.brand)
                ),
            ),
        ],
        session.raw_text.clone(),
    ))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
}

/// GET /health — health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready — readiness probe.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.start_time.elapsed().as_secs() > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /live — liveness probe.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}
