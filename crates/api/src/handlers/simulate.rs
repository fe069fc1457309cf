//! Handler for `GET /simulate/`.

use axum::extract::{Query, State};
use axum::Json;
use ports_core::owner::TaskOwner;
use ports_core::simulation::{
    merge_settings, SimulationEngine, SimulationError, SimulationResults,
};
use ports_core::task::TaskType;
use ports_db::models::task::CreateTask;
use ports_db::repositories::{ProgressRepo, SettingsRepo, TaskRepo};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::scenario::ensure_scenario;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters of `GET /simulate/`.
#[derive(Debug, Deserialize)]
pub struct SimulateQuery {
    /// Scenario whose settings parameterize the run.
    pub scenario: Option<Uuid>,
}

/// Normalized inputs and outputs of a run.
#[derive(Debug, Serialize)]
pub struct SimulationPayload {
    pub inputs: Value,
    pub outputs: Value,
}

/// Response body: `{"result": {"inputs": ..., "outputs": ...}}`.
#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub result: SimulationPayload,
}

impl From<SimulationResults> for SimulateResponse {
    fn from(results: SimulationResults) -> Self {
        Self {
            result: SimulationPayload {
                inputs: results.inputs.to_json(),
                outputs: results.outputs.to_json(),
            },
        }
    }
}

/// Trigger a run and load back the results of that same run.
async fn run(
    engine: &dyn SimulationEngine,
    datapackage: &str,
    parameters: &Value,
) -> Result<SimulationResults, SimulationError> {
    let simulation_id = engine.simulate_scenario(datapackage, parameters).await?;
    engine.restore_results(simulation_id).await
}

/// GET /simulate/
///
/// Without a scenario the datapackage runs with empty parameters. With a
/// scenario, its settings are merged into the parameters and the run is
/// tracked as a `Simulation` task with a progress record.
pub async fn simulate(
    State(state): State<AppState>,
    Query(query): Query<SimulateQuery>,
) -> AppResult<Json<SimulateResponse>> {
    let datapackage = state.config.simulation_datapackage.as_str();

    let Some(scenario_id) = query.scenario else {
        let results = run(state.engine.as_ref(), datapackage, &json!({})).await?;
        return Ok(Json(results.into()));
    };

    ensure_scenario(&state, scenario_id).await?;
    let settings = SettingsRepo::list_by_scenario(&state.pool, scenario_id).await?;
    let parameters = merge_settings(settings.iter().map(|s| &s.settings));

    let task = TaskRepo::create(
        &state.pool,
        &CreateTask {
            parent_task_id: None,
            task_type: TaskType::RunSimulation.as_str().to_string(),
            owner: TaskOwner::Scenario(scenario_id),
        },
    )
    .await?;
    let progress = ProgressRepo::create(&state.pool, task.id).await?;

    let mut tracker = progress.state()?;
    tracker.start();
    ProgressRepo::save_state(&state.pool, progress.id, &tracker).await?;

    let outcome = run(state.engine.as_ref(), datapackage, &parameters).await;
    match &outcome {
        Ok(_) => tracker.set_success(),
        Err(e) => {
            tracker.push_error(json!({ "message": e.to_string() }));
            tracker.set_failed();
        }
    }
    ProgressRepo::save_state(&state.pool, progress.id, &tracker).await?;

    tracing::info!(
        scenario_id = %scenario_id,
        task_id = task.id,
        status = tracker.status.label(),
        "Simulation run recorded",
    );

    let results = outcome.map_err(AppError::Simulation)?;
    Ok(Json(results.into()))
}
