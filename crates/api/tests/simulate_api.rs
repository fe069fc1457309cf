//! HTTP-level integration tests for `GET /simulate/`.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, create_scenario, get, post_json, FakeEngine};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_results_are_json_safe(pool: PgPool) {
    let uploads = tempfile::tempdir().unwrap();
    let engine = Arc::new(FakeEngine::default());
    let app = common::build_test_app_with(pool, Arc::clone(&engine), uploads.path());

    let response = get(app, "/simulate/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({
            "result": {
                "inputs": {"demand": [1.0, "NaN"]},
                "outputs": {
                    "('pv', 'bus')": [0.5, "infinity"],
                    "7": "NaN"
                }
            }
        })
    );

    // Results are restored for the run that was just triggered.
    assert_eq!(*engine.restored.lock().unwrap(), vec![42]);
    let runs = engine.runs.lock().unwrap();
    assert_eq!(runs[0], ("dispatch".to_string(), json!({})));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_scenario_settings_become_parameters(pool: PgPool) {
    let uploads = tempfile::tempdir().unwrap();
    let engine = Arc::new(FakeEngine::default());
    let app = common::build_test_app_with(pool, Arc::clone(&engine), uploads.path());
    let scenario = create_scenario(app.clone(), "parameterized").await;

    let uri = format!("/api/v1/scenarios/{scenario}/settings");
    post_json(
        app.clone(),
        &uri,
        json!({"internal_id": 2, "settings": {"co2_price": 120}}),
    )
    .await;
    post_json(
        app.clone(),
        &uri,
        json!({"internal_id": 1, "settings": {"year": 2030, "co2_price": 80}}),
    )
    .await;

    let response = get(app.clone(), &format!("/simulate/?scenario={scenario}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    {
        let runs = engine.runs.lock().unwrap();
        assert_eq!(runs[0].1, json!({"year": 2030, "co2_price": 120}));
    }

    // The run is tracked as a finished Simulation task.
    let response = get(app.clone(), &format!("/api/v1/scenarios/{scenario}/tasks")).await;
    let json = body_json(response).await;
    let tasks = json["data"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["task_type"], "Simulation");
    let task_id = tasks[0]["id"].as_i64().unwrap();

    let response = get(app, &format!("/api/v1/tasks/{task_id}/progress")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["status"], "Finished");
    assert_eq!(json["data"][0]["success"], true);
    assert_eq!(json["data"][0]["percent"], 100.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_engine_failure_returns_502_and_fails_progress(pool: PgPool) {
    let uploads = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with(pool, Arc::new(FakeEngine::failing()), uploads.path());
    let scenario = create_scenario(app.clone(), "diverging").await;

    let response = get(app.clone(), &format!("/simulate/?scenario={scenario}")).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "SIMULATION_ERROR");

    let response = get(app.clone(), &format!("/api/v1/scenarios/{scenario}/tasks")).await;
    let task_id = body_json(response).await["data"][0]["id"].as_i64().unwrap();

    let response = get(app, &format!("/api/v1/tasks/{task_id}/progress")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["status"], "Failed");
    assert_eq!(json["data"][0]["running"], false);
    assert_eq!(json["data"][0]["errors"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_scenario_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, &format!("/simulate/?scenario={}", Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_scenario_is_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/simulate/?scenario=not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
