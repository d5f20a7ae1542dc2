use axum::Router;
use std::sync::Arc;

use crate::session::SessionStore;

pub mod generate;
pub mod render;
pub mod sessions;
pub mod sources;
pub mod timeline;

pub fn router(store: Arc<SessionStore>) -> Router {
    Router::new().nest("/sessions", {
        Router::new()
            .merge(sessions::router(store.clone()))
            .merge(sources::router(store.clone()))
            .merge(timeline::router(store.clone()))
            .merge(generate::router(store.clone()))
            .merge(render::router(store))
    })
}
