use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use engine::{AudioSourceCollection, VideoInfo};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::session::SessionStore;
use crate::{ttsfx, vision};

#[derive(Deserialize)]
pub struct DescribeRequest {
    #[serde(default)]
    instruction: String,
    api_key: String,
}

#[derive(Deserialize)]
pub struct GenerateRequest {
    /// A user-edited collection to use instead of describing the video
    /// again. Ignored when it does not have the expected structure.
    sources: Option<Value>,
    #[serde(default)]
    instruction: String,
    vision_api_key: String,
    ttsfx_api_key: String,
}

#[derive(Deserialize)]
pub struct ClipRequest {
    prompt: String,
    api_key: String,
}

#[derive(Serialize)]
pub struct ClipResponse {
    audio_path: Option<String>,
}

pub fn router(store: Arc<SessionStore>) -> Router {
    Router::new()
        .route("/:id/describe", post(describe))
        .route("/:id/generate", post(generate))
        .route("/:id/sources/:slug/audio", post(generate_clip))
        .with_state(store)
}

fn session_video(store: &SessionStore, id: &str) -> Result<VideoInfo, (StatusCode, String)> {
    store
        .with_session(id, |session| session.video.clone())
        .ok_or((StatusCode::NOT_FOUND, "unknown session".to_string()))?
        .ok_or((
            StatusCode::BAD_REQUEST,
            "Upload a video first.".to_string(),
        ))
}

async fn describe(
    State(store): State<Arc<SessionStore>>,
    Path(id): Path<String>,
    Json(req): Json<DescribeRequest>,
) -> Result<Json<AudioSourceCollection>, (StatusCode, String)> {
    let video = session_video(&store, &id)?;

    // The session is only touched after the collaborator succeeds, so a
    // failure leaves the previous collection intact.
    let collection = vision::describe_video(&video, &req.instruction, &req.api_key)
        .await
        .map_err(|e| {
            error!("description failed: {:#}", e);
            (StatusCode::BAD_GATEWAY, format!("Error: {}", e))
        })?;

    info!(session = %id, "described video into {} sources", collection.len());
    store.with_session(&id, |session| {
        session.adopt_generation(collection.clone());
    });
    Ok(Json(collection))
}

/// The one-button flow: take the user-edited collection if it is usable,
/// otherwise describe the video, then synthesize audio for every source
/// and adopt the result wholesale.
async fn generate(
    State(store): State<Arc<SessionStore>>,
    Path(id): Path<String>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<AudioSourceCollection>, (StatusCode, String)> {
    let video = session_video(&store, &id)?;

    let provided = req.sources.and_then(|value| {
        vision::parse_collection(value)
            .map_err(|e| warn!("ignoring user-edited sources: {}", e))
            .ok()
    });
    let mut collection = match provided {
        Some(collection) => collection,
        None => vision::describe_video(&video, &req.instruction, &req.vision_api_key)
            .await
            .map_err(|e| {
                error!("description failed: {:#}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    format!("Could not generate audio: {}", e),
                )
            })?,
    };

    let clips_dir = store.session_dir(&id).join("clips");
    ttsfx::generate_all_audio(&mut collection, &req.ttsfx_api_key, &clips_dir)
        .await
        .map_err(|e| {
            error!("audio synthesis failed: {:#}", e);
            (
                StatusCode::BAD_GATEWAY,
                format!("Could not generate audio: {}", e),
            )
        })?;

    store.with_session(&id, |session| {
        session.adopt_generation(collection.clone());
    });
    Ok(Json(collection))
}

/// Regenerate a single clip from a prompt. The source itself is not
/// mutated; the edit form saves the returned path explicitly.
async fn generate_clip(
    State(store): State<Arc<SessionStore>>,
    Path((id, slug)): Path<(String, String)>,
    Json(req): Json<ClipRequest>,
) -> Result<Json<ClipResponse>, StatusCode> {
    let source = store
        .with_session(&id, |session| session.sources.find_by_slug(&slug).cloned())
        .ok_or(StatusCode::NOT_FOUND)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let clips_dir = store.session_dir(&id).join("clips");
    match ttsfx::generate_audio(&req.prompt, source.duration, &req.api_key, &clips_dir).await {
        Ok(Some(path)) => Ok(Json(ClipResponse {
            audio_path: Some(path.to_string_lossy().to_string()),
        })),
        // No new clip: hand back the previous one unchanged.
        Ok(None) => Ok(Json(ClipResponse {
            audio_path: source.audio_path,
        })),
        Err(e) => {
            warn!("clip synthesis failed, keeping previous audio: {:#}", e);
            Ok(Json(ClipResponse {
                audio_path: source.audio_path,
            }))
        }
    }
}
