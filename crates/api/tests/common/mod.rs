#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use ports_core::results::{ResultKey, ResultValue};
use ports_core::simulation::{
    SimulationEngine, SimulationError, SimulationId, SimulationResults,
};
use sqlx::PgPool;
use tower::ServiceExt;

use ports_api::config::ServerConfig;
use ports_api::router::build_app_router;
use ports_api::state::AppState;

// ---------------------------------------------------------------------------
// Fake simulation service
// ---------------------------------------------------------------------------

/// In-process [`SimulationEngine`] recording every call.
pub struct FakeEngine {
    /// Id returned by `simulate_scenario`.
    pub simulation_id: SimulationId,
    /// Fail `simulate_scenario` with an engine error when set.
    pub fail: bool,
    /// `(datapackage, parameters)` of every run.
    pub runs: Mutex<Vec<(String, serde_json::Value)>>,
    /// Ids passed to `restore_results`.
    pub restored: Mutex<Vec<SimulationId>>,
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self {
            simulation_id: 42,
            fail: false,
            runs: Mutex::new(Vec::new()),
            restored: Mutex::new(Vec::new()),
        }
    }
}

impl FakeEngine {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl SimulationEngine for FakeEngine {
    async fn simulate_scenario(
        &self,
        datapackage: &str,
        parameters: &serde_json::Value,
    ) -> Result<SimulationId, SimulationError> {
        self.runs
            .lock()
            .unwrap()
            .push((datapackage.to_string(), parameters.clone()));
        if self.fail {
            return Err(SimulationError::Engine {
                status: 500,
                body: "solver diverged".to_string(),
            });
        }
        Ok(self.simulation_id)
    }

    async fn restore_results(
        &self,
        simulation_id: SimulationId,
    ) -> Result<SimulationResults, SimulationError> {
        self.restored.lock().unwrap().push(simulation_id);
        Ok(SimulationResults {
            inputs: ResultValue::Map(vec![(
                ResultKey::Text("demand".into()),
                ResultValue::Series(vec![1.0, f64::NAN]),
            )]),
            outputs: ResultValue::Map(vec![
                (
                    ResultKey::Tuple(vec![
                        ResultKey::Text("pv".into()),
                        ResultKey::Text("bus".into()),
                    ]),
                    ResultValue::Series(vec![0.5, f64::INFINITY]),
                ),
                (ResultKey::Int(7), ResultValue::Float(f64::NAN)),
            ]),
        })
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(upload_path: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        upload_path: upload_path.to_path_buf(),
        simulation_url: "http://127.0.0.1:9".to_string(),
        simulation_datapackage: "dispatch".to_string(),
        max_upload_bytes: 1024 * 1024,
    }
}

/// Build the full application router with the given engine and upload root.
///
/// Uses [`build_app_router`] so integration tests exercise the same
/// middleware stack as production.
pub fn build_test_app_with(pool: PgPool, engine: Arc<FakeEngine>, upload_path: &Path) -> Router {
    let config = test_config(upload_path);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        engine,
    };
    build_app_router(state, &config)
}

/// Build the application with a succeeding fake engine and a throwaway
/// upload root.
pub fn build_test_app(pool: PgPool) -> Router {
    let upload_path = std::env::temp_dir().join("ports-api-tests");
    build_test_app_with(pool, Arc::new(FakeEngine::default()), &upload_path)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PUT, uri, body).await
}

/// POST a multipart form with text `fields` and one file part named `file`.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    fields: &[(&str, &str)],
    file_name: &str,
    content: &[u8],
) -> Response {
    let boundary = "ports-test-boundary";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a scenario through the API and return its id.
pub async fn create_scenario(app: Router, name: &str) -> uuid::Uuid {
    let response = post_json(app, "/api/v1/scenarios", serde_json::json!({ "name": name })).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_str().unwrap().parse().unwrap()
}
