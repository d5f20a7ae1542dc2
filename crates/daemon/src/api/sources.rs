use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, patch, post},
    Router,
};
use engine::ops::SourceEdit;
use engine::AudioSource;
use serde::Deserialize;
use std::sync::Arc;

use crate::session::SessionStore;

#[derive(Deserialize)]
pub struct UpdateSourceRequest {
    sound_description: String,
    audio_path: Option<String>,
    volume: f64,
}

pub fn router(store: Arc<SessionStore>) -> Router {
    Router::new()
        .route("/:id/sources", post(add_source))
        .route("/:id/sources/:slug", delete(delete_source))
        .route("/:id/sources/:slug", patch(update_source))
        .with_state(store)
}

async fn add_source(
    State(store): State<Arc<SessionStore>>,
    Path(id): Path<String>,
) -> Result<Json<AudioSource>, StatusCode> {
    store
        .with_session(&id, |session| session.add_source().clone())
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn delete_source(
    State(store): State<Arc<SessionStore>>,
    Path((id, slug)): Path<(String, String)>,
) -> StatusCode {
    // Deleting a slug no partition holds is still a successful no-op.
    match store.with_session(&id, |session| session.delete_source(&slug)) {
        Some(()) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

async fn update_source(
    State(store): State<Arc<SessionStore>>,
    Path((id, slug)): Path<(String, String)>,
    Json(req): Json<UpdateSourceRequest>,
) -> Result<Json<AudioSource>, StatusCode> {
    let updated = store
        .with_session(&id, |session| {
            let edit = SourceEdit {
                sound_description: req.sound_description,
                audio_path: req.audio_path,
                volume: req.volume,
            };
            if session.update_source(&slug, edit) {
                session.sources.find_by_slug(&slug).cloned()
            } else {
                None
            }
        })
        .ok_or(StatusCode::NOT_FOUND)?;

    updated.map(Json).ok_or(StatusCode::NOT_FOUND)
}
