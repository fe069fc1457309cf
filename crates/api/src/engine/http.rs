//! HTTP client for the external simulation service.
//!
//! ```text
//! POST {base}/simulations                 {"scenario", "parameters"} -> {"simulation_id"}
//! GET  {base}/simulations/{id}/results    -> {"inputs", "outputs"}
//! ```

use async_trait::async_trait;
use ports_core::results::ResultValue;
use ports_core::simulation::{
    SimulationEngine, SimulationError, SimulationId, SimulationResults,
};
use serde::Deserialize;

/// [`SimulationEngine`] backed by the simulation service's REST API.
pub struct HttpSimulationEngine {
    client: reqwest::Client,
    base_url: String,
}

/// Response of `POST /simulations`.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    simulation_id: SimulationId,
}

/// Response of `GET /simulations/{id}/results`.
#[derive(Debug, Deserialize)]
struct ResultsResponse {
    inputs: serde_json::Value,
    outputs: serde_json::Value,
}

impl HttpSimulationEngine {
    /// Create a client for the service at `base_url`, e.g. `http://host:8000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    // ---- private helpers ----

    /// Turn a non-2xx response into [`SimulationError::Engine`].
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, SimulationError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SimulationError::Engine {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, SimulationError> {
        let response = Self::ensure_success(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| SimulationError::Malformed(e.to_string()))
    }
}

fn unavailable(err: reqwest::Error) -> SimulationError {
    SimulationError::Unavailable(err.to_string())
}

#[async_trait]
impl SimulationEngine for HttpSimulationEngine {
    async fn simulate_scenario(
        &self,
        datapackage: &str,
        parameters: &serde_json::Value,
    ) -> Result<SimulationId, SimulationError> {
        let body = serde_json::json!({
            "scenario": datapackage,
            "parameters": parameters,
        });

        let response = self
            .client
            .post(format!("{}/simulations", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(unavailable)?;

        let submitted: SubmitResponse = Self::parse_response(response).await?;
        tracing::info!(
            simulation_id = submitted.simulation_id,
            datapackage,
            "Simulation finished",
        );
        Ok(submitted.simulation_id)
    }

    async fn restore_results(
        &self,
        simulation_id: SimulationId,
    ) -> Result<SimulationResults, SimulationError> {
        let response = self
            .client
            .get(format!(
                "{}/simulations/{simulation_id}/results",
                self.base_url
            ))
            .send()
            .await
            .map_err(unavailable)?;

        let results: ResultsResponse = Self::parse_response(response).await?;
        Ok(SimulationResults {
            inputs: ResultValue::from_wire(results.inputs),
            outputs: ResultValue::from_wire(results.outputs),
        })
    }
}
