//! Seam to the external simulation engine.
//!
//! The engine runs the energy-system optimization and stores a result
//! dataset; this backend only triggers runs and reads the dataset back.

use async_trait::async_trait;

use crate::results::ResultValue;

/// Identifier the engine assigns to a simulation run.
pub type SimulationId = i64;

/// Datapackage simulated when none is configured.
pub const DEFAULT_DATAPACKAGE: &str = "dispatch";

/// Errors reported by a [`SimulationEngine`].
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The engine could not be reached.
    #[error("Simulation engine unavailable: {0}")]
    Unavailable(String),

    /// The engine answered with an error.
    #[error("Simulation engine error ({status}): {body}")]
    Engine { status: u16, body: String },

    /// The engine answered with something that is not a result dataset.
    #[error("Malformed simulation response: {0}")]
    Malformed(String),
}

/// Inputs and outputs restored from a result dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResults {
    pub inputs: ResultValue,
    pub outputs: ResultValue,
}

/// Client side of the simulation engine.
#[async_trait]
pub trait SimulationEngine: Send + Sync {
    /// Run `datapackage` with `parameters` and return the new run id.
    async fn simulate_scenario(
        &self,
        datapackage: &str,
        parameters: &serde_json::Value,
    ) -> Result<SimulationId, SimulationError>;

    /// Load the stored inputs and outputs of run `simulation_id`.
    async fn restore_results(
        &self,
        simulation_id: SimulationId,
    ) -> Result<SimulationResults, SimulationError>;
}

/// Merge scenario settings objects into one parameter object.
///
/// `settings` must be ordered by internal id; later objects override keys of
/// earlier ones. Non-object entries are skipped.
pub fn merge_settings<'a>(
    settings: impl IntoIterator<Item = &'a serde_json::Value>,
) -> serde_json::Value {
    let mut merged = serde_json::Map::new();
    for entry in settings {
        if let Some(obj) = entry.as_object() {
            for (key, value) in obj {
                merged.insert(key.clone(), value.clone());
            }
        } else {
            tracing::debug!(?entry, "Skipping non-object settings entry");
        }
    }
    serde_json::Value::Object(merged)
}
