//! Route definitions for the `/tasks` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::task;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// POST   /                   -> create
/// GET    /{id}               -> get_by_id
/// GET    /{id}/children      -> list_children
/// GET    /{id}/progress      -> list_progress
/// POST   /{id}/progress      -> create_progress
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(task::create))
        .route("/{id}", get(task::get_by_id))
        .route("/{id}/children", get(task::list_children))
        .route(
            "/{id}/progress",
            get(task::list_progress).post(task::create_progress),
        )
}
