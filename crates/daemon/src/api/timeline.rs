use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use engine::{AudioSource, TimelineData};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::session::SessionStore;

#[derive(Deserialize)]
pub struct SelectRequest {
    /// Selected item ids as reported by the widget; items are created with
    /// their id set to the source slug.
    ids: Vec<String>,
}

pub fn router(store: Arc<SessionStore>) -> Router {
    Router::new()
        .route("/:id/timeline", get(get_timeline))
        .route("/:id/timeline", put(apply_timeline))
        .route("/:id/timeline/select", post(select))
        .with_state(store)
}

async fn get_timeline(
    State(store): State<Arc<SessionStore>>,
    Path(id): Path<String>,
) -> Result<Json<TimelineData>, StatusCode> {
    store
        .with_session(&id, |session| session.timeline())
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Widget edit event: ingest the edited representation, then answer with
/// the re-projection so the widget converges on the clamped state.
async fn apply_timeline(
    State(store): State<Arc<SessionStore>>,
    Path(id): Path<String>,
    Json(data): Json<TimelineData>,
) -> Result<Json<TimelineData>, StatusCode> {
    store
        .with_session(&id, |session| {
            session.apply_timeline_edit(&data);
            for source in session.sources.iter_all() {
                if source.duration <= 0.0 {
                    warn!(
                        slug = %source.source_slug_id,
                        duration = source.duration,
                        "edit produced a non-positive duration"
                    );
                }
            }
            session.timeline()
        })
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn select(
    State(store): State<Arc<SessionStore>>,
    Path(id): Path<String>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<Option<AudioSource>>, StatusCode> {
    store
        .with_session(&id, |session| session.select(&req.ids).cloned())
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
