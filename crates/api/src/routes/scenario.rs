//! Route definitions for the `/scenarios` resource.
//!
//! Also nests the scenario item collections under `/scenarios/{id}/...`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{items, scenario};
use crate::state::AppState;

/// Routes mounted at `/scenarios`.
///
/// ```text
/// GET    /                   -> list
/// POST   /                   -> create
/// GET    /{id}               -> get_by_id
/// DELETE /{id}               -> delete
/// POST   /{id}/duplicate     -> duplicate
///
/// GET    /{id}/areas         -> list_areas
/// POST   /{id}/areas         -> create_area
/// GET    /{id}/solar         -> list_solar
/// POST   /{id}/solar         -> create_solar
/// GET    /{id}/settings      -> list_settings
/// POST   /{id}/settings      -> create_settings
/// GET    /{id}/files         -> list_files
/// POST   /{id}/files         -> upload_file
/// GET    /{id}/tasks         -> list_tasks
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(scenario::list).post(scenario::create))
        .route("/{id}", get(scenario::get_by_id).delete(scenario::delete))
        .route("/{id}/duplicate", post(scenario::duplicate))
        .route("/{id}/areas", get(items::list_areas).post(items::create_area))
        .route("/{id}/solar", get(items::list_solar).post(items::create_solar))
        .route(
            "/{id}/settings",
            get(items::list_settings).post(items::create_settings),
        )
        .route("/{id}/files", get(items::list_files).post(items::upload_file))
        .route("/{id}/tasks", get(scenario::list_tasks))
}
