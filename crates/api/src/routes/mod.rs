pub mod health;
pub mod progress;
pub mod scenario;
pub mod simulate;
pub mod task;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /scenarios                              list, create
/// /scenarios/{id}                         get, delete (teardown)
/// /scenarios/{id}/duplicate               copy into a new scenario (POST)
/// /scenarios/{id}/areas                   list, create
/// /scenarios/{id}/solar                   list, create
/// /scenarios/{id}/settings                list, create
/// /scenarios/{id}/files                   list, upload (multipart)
/// /scenarios/{id}/tasks                   tasks owned by the scenario
///
/// /tasks                                  create
/// /tasks/{id}                             get
/// /tasks/{id}/children                    child tasks
/// /tasks/{id}/progress                    list, create
///
/// /progress/{id}                          get (with percent and ETA)
/// /progress/{id}/work                     set work counters (PUT)
/// /progress/{id}/advance                  add finished work units (POST)
/// /progress/{id}/start                    start (POST)
/// /progress/{id}/success                  finish successfully (POST)
/// /progress/{id}/failed                   finish with failure (POST)
/// /progress/{id}/reset                    back to waiting (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/scenarios", scenario::router())
        .nest("/tasks", task::router())
        .nest("/progress", progress::router())
}
