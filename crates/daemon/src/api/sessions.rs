use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, patch, post},
    Router,
};
use engine::VideoInfo;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use crate::media::{compute_file_checksum, downscale_dimensions, ffmpeg::FFmpegWrapper};
use crate::session::SessionStore;

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    video_path: String,
}

#[derive(Serialize)]
pub struct CreateSessionResponse {
    id: String,
    video: VideoInfo,
}

#[derive(Serialize)]
pub struct SessionResponse {
    video: Option<VideoInfo>,
    source_count: usize,
    ambient_source_count: usize,
    selected_slug: Option<String>,
}

#[derive(Deserialize)]
pub struct VideoConfigRequest {
    frame_interval: i64,
    downscale: bool,
    /// Longest-side target when downscaling, e.g. 512.
    max_side: Option<i64>,
}

#[derive(Serialize)]
pub struct VideoConfigResponse {
    video: VideoInfo,
    samples_count: i64,
    samples_per_second: f64,
}

pub fn router(store: Arc<SessionStore>) -> Router {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session))
        .route("/:id", delete(delete_session))
        .route("/:id/video-config", patch(update_video_config))
        .with_state(store)
}

async fn create_session(
    State(store): State<Arc<SessionStore>>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, (StatusCode, String)> {
    let upload = PathBuf::from(&req.video_path);
    if !upload.is_file() {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("no video file at {}", req.video_path),
        ));
    }

    let id = store.create();

    // Copy the upload into the session before probing, so the session never
    // depends on the original path staying around.
    match copy_and_probe(&store, &id, &upload).await {
        Ok(video) => {
            store.with_session(&id, |session| session.adopt_video(video.clone()));
            info!(session = %id, "session created for {}", req.video_path);
            Ok(Json(CreateSessionResponse { id, video }))
        }
        Err(e) => {
            // No half-initialized sessions: drop it again on failure.
            store.remove(&id);
            error!("session setup failed: {:#}", e);
            Err((StatusCode::BAD_REQUEST, format!("Error: {}", e)))
        }
    }
}

async fn copy_and_probe(
    store: &SessionStore,
    id: &str,
    upload: &std::path::Path,
) -> anyhow::Result<VideoInfo> {
    let checksum = compute_file_checksum(upload).await?;
    let extension = upload
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("mp4");
    let session_dir = store.session_dir(id);
    tokio::fs::create_dir_all(&session_dir).await?;
    let copy_path = session_dir.join(format!("{}.{}", &checksum[..16], extension));
    tokio::fs::copy(upload, &copy_path).await?;

    let mut video = FFmpegWrapper::probe(&copy_path).await?;
    video.video_path = Some(copy_path.to_string_lossy().to_string());
    Ok(video)
}

async fn get_session(
    State(store): State<Arc<SessionStore>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, StatusCode> {
    store
        .with_session(&id, |session| SessionResponse {
            video: session.video.clone(),
            source_count: session.sources.audio_sources.len(),
            ambient_source_count: session.sources.ambient_audio_sources.len(),
            selected_slug: session.selected_slug.clone(),
        })
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn delete_session(
    State(store): State<Arc<SessionStore>>,
    Path(id): Path<String>,
) -> StatusCode {
    if store.remove(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn update_video_config(
    State(store): State<Arc<SessionStore>>,
    Path(id): Path<String>,
    Json(req): Json<VideoConfigRequest>,
) -> Result<Json<VideoConfigResponse>, (StatusCode, String)> {
    let updated = store
        .with_session(&id, |session| {
            let video = session.video.as_mut()?;
            video.frame_interval = req.frame_interval.max(1);
            if req.downscale {
                let max_side = req.max_side.unwrap_or(512);
                let (w, h) = downscale_dimensions(video.width, video.height, max_side);
                video.downscaled_width = w;
                video.downscaled_height = h;
            } else {
                video.downscaled_width = video.width;
                video.downscaled_height = video.height;
            }
            Some(video.clone())
        })
        .ok_or((StatusCode::NOT_FOUND, "unknown session".to_string()))?;

    let video = updated.ok_or((
        StatusCode::BAD_REQUEST,
        "Upload a video first.".to_string(),
    ))?;

    if !video.conversions_available() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Video information not available.".to_string(),
        ));
    }

    let samples_count = video.frame_count / video.frame_interval + 2;
    let samples_per_second = video.frame_rate / video.frame_interval as f64;
    Ok(Json(VideoConfigResponse {
        video,
        samples_count,
        samples_per_second,
    }))
}
