use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use engine::render::generate_render_command;
use futures::StreamExt;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::codec::{BytesCodec, FramedRead};
use tracing::{error, info};

use crate::media::ffmpeg::FFmpegWrapper;
use crate::session::SessionStore;

#[derive(Serialize)]
pub struct RenderResponse {
    output_path: String,
}

pub fn router(store: Arc<SessionStore>) -> Router {
    Router::new()
        .route("/:id/render", post(render))
        .route("/:id/render/output", get(get_output))
        .with_state(store)
}

/// Combine all audio and render the composed video. The output directory
/// is cleared completely first, so only the latest render is ever kept.
async fn render(
    State(store): State<Arc<SessionStore>>,
    Path(id): Path<String>,
) -> Result<Json<RenderResponse>, (StatusCode, String)> {
    let (sources, video) = store
        .with_session(&id, |session| {
            (session.sources.clone(), session.video.clone())
        })
        .ok_or((StatusCode::NOT_FOUND, "unknown session".to_string()))?;

    let video = video.ok_or((
        StatusCode::BAD_REQUEST,
        "Upload a video first.".to_string(),
    ))?;
    let input_path = video.video_path.clone().ok_or((
        StatusCode::BAD_REQUEST,
        "session has no video copy".to_string(),
    ))?;

    let output_dir = store.output_dir(&id);
    let output_path = prepare_output_path(&output_dir, &input_path)
        .await
        .map_err(|e| {
            error!("could not prepare output directory: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to add the audio to the video: {}", e),
            )
        })?;

    let command =
        generate_render_command(&sources, &video, PathBuf::from(&input_path), output_path);
    let rendered = FFmpegWrapper::run_render(&command).await.map_err(|e| {
        error!("render failed: {:#}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to add the audio to the video: {}", e),
        )
    })?;

    info!(session = %id, "rendered {}", rendered.display());
    Ok(Json(RenderResponse {
        output_path: rendered.to_string_lossy().to_string(),
    }))
}

/// Empty the output directory and derive `{stem}_output{ext}` from the
/// input video name.
async fn prepare_output_path(output_dir: &PathBuf, input_path: &str) -> anyhow::Result<PathBuf> {
    if output_dir.exists() {
        tokio::fs::remove_dir_all(output_dir).await?;
    }
    tokio::fs::create_dir_all(output_dir).await?;

    let input = PathBuf::from(input_path);
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("video");
    let extension = input.extension().and_then(|e| e.to_str()).unwrap_or("mp4");
    Ok(output_dir.join(format!("{}_output.{}", stem, extension)))
}

/// Stream the latest rendered video back to the client.
async fn get_output(
    State(store): State<Arc<SessionStore>>,
    Path(id): Path<String>,
) -> Result<Response, StatusCode> {
    store
        .with_session(&id, |_| ())
        .ok_or(StatusCode::NOT_FOUND)?;

    let output_dir = store.output_dir(&id);
    let mut entries = tokio::fs::read_dir(&output_dir)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;
    let rendered = entries
        .next_entry()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?
        .path();

    let file = tokio::fs::File::open(&rendered)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;
    let size = file
        .metadata()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .len();

    let stream = FramedRead::new(file, BytesCodec::new())
        .map(|chunk| chunk.map(|bytes| Bytes::from(bytes.freeze())));
    let body = Body::from_stream(stream);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "video/mp4")
        .header(header::CONTENT_LENGTH, size.to_string())
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
