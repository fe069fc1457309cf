//! Route definitions for the `/progress` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

/// Routes mounted at `/progress`.
///
/// ```text
/// GET    /{id}               -> get_by_id
/// PUT    /{id}/work          -> update_work
/// POST   /{id}/advance       -> advance
/// POST   /{id}/start         -> start
/// POST   /{id}/success       -> succeed
/// POST   /{id}/failed        -> fail
/// POST   /{id}/reset         -> reset
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(progress::get_by_id))
        .route("/{id}/work", put(progress::update_work))
        .route("/{id}/advance", post(progress::advance))
        .route("/{id}/start", post(progress::start))
        .route("/{id}/success", post(progress::succeed))
        .route("/{id}/failed", post(progress::fail))
        .route("/{id}/reset", post(progress::reset))
}
