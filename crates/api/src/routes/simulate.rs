use axum::routing::get;
use axum::Router;

use crate::handlers::simulate;
use crate::state::AppState;

/// Mount the simulation trigger at root level.
///
/// ```text
/// GET /simulate/?scenario={uuid}    -> simulate
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/simulate/", get(simulate::simulate))
}
