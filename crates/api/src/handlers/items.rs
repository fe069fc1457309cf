//! Handlers for the scenario item collections under `/scenarios/{id}`.
//!
//! Every item is stored under the id derived from its scenario and internal
//! id. A client may send the id it computed itself; it must match.

use std::path::{Path as StdPath, PathBuf};

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use ports_core::error::CoreError;
use ports_core::geometry::validate_polygon;
use ports_core::owner::{OwnerKind, TaskOwner};
use ports_core::scenario_id::ItemKey;
use ports_core::storage::upload_relative_path;
use ports_db::models::area::{Area, CreateArea};
use ports_db::models::settings::{CreateSettings, Settings};
use ports_db::models::solar::{CreateSolar, Solar};
use ports_db::models::uploaded_file::{CreateUploadedFile, UploadedFile};
use ports_db::repositories::{
    AreaRepo, OwnerRepo, SettingsRepo, SolarRepo, UploadedFileRepo,
};
use uuid::Uuid;

use super::scenario::ensure_scenario;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ── Areas ────────────────────────────────────────────────────────────

/// GET /api/v1/scenarios/{id}/areas
pub async fn list_areas(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
) -> AppResult<Json<DataResponse<Vec<Area>>>> {
    ensure_scenario(&state, scenario_id).await?;
    let areas = AreaRepo::list_by_scenario(&state.pool, scenario_id).await?;
    Ok(Json(DataResponse { data: areas }))
}

/// POST /api/v1/scenarios/{id}/areas
pub async fn create_area(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
    Json(input): Json<CreateArea>,
) -> AppResult<(StatusCode, Json<DataResponse<Area>>)> {
    ensure_scenario(&state, scenario_id).await?;
    validate_polygon(&input.geom)?;
    let key = ItemKey::derive(scenario_id, input.internal_id, input.id)?;

    let area = AreaRepo::create(&state.pool, &key, &input.geom).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: area })))
}

// ── Solar ────────────────────────────────────────────────────────────

/// GET /api/v1/scenarios/{id}/solar
pub async fn list_solar(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
) -> AppResult<Json<DataResponse<Vec<Solar>>>> {
    ensure_scenario(&state, scenario_id).await?;
    let solar = SolarRepo::list_by_scenario(&state.pool, scenario_id).await?;
    Ok(Json(DataResponse { data: solar }))
}

/// POST /api/v1/scenarios/{id}/solar
pub async fn create_solar(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
    Json(input): Json<CreateSolar>,
) -> AppResult<(StatusCode, Json<DataResponse<Solar>>)> {
    ensure_scenario(&state, scenario_id).await?;
    let key = ItemKey::derive(scenario_id, input.internal_id, input.id)?;

    match AreaRepo::find_by_id(&state.pool, input.area_id).await? {
        Some(area) if area.scenario_id == scenario_id => {}
        _ => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Area {} does not belong to scenario {scenario_id}",
                input.area_id
            ))));
        }
    }

    let solar = SolarRepo::create(&state.pool, &key, input.area_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: solar })))
}

// ── Settings ─────────────────────────────────────────────────────────

/// GET /api/v1/scenarios/{id}/settings
pub async fn list_settings(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
) -> AppResult<Json<DataResponse<Vec<Settings>>>> {
    ensure_scenario(&state, scenario_id).await?;
    let settings = SettingsRepo::list_by_scenario(&state.pool, scenario_id).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// POST /api/v1/scenarios/{id}/settings
pub async fn create_settings(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
    Json(input): Json<CreateSettings>,
) -> AppResult<(StatusCode, Json<DataResponse<Settings>>)> {
    ensure_scenario(&state, scenario_id).await?;
    let settings = input
        .settings
        .unwrap_or_else(|| serde_json::Value::Object(Default::default()));
    if !settings.is_object() {
        return Err(AppError::Core(CoreError::Validation(
            "settings must be a JSON object".into(),
        )));
    }
    let key = ItemKey::derive(scenario_id, input.internal_id, input.id)?;

    let row = SettingsRepo::create(&state.pool, &key, &settings).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

// ── Uploaded files ───────────────────────────────────────────────────

/// GET /api/v1/scenarios/{id}/files
pub async fn list_files(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
) -> AppResult<Json<DataResponse<Vec<UploadedFile>>>> {
    ensure_scenario(&state, scenario_id).await?;
    let files = UploadedFileRepo::list_by_scenario(&state.pool, scenario_id).await?;
    Ok(Json(DataResponse { data: files }))
}

/// Fields collected from a file upload form.
#[derive(Default)]
struct UploadForm {
    internal_id: Option<i32>,
    id: Option<Uuid>,
    owner_kind: Option<OwnerKind>,
    owner_id: Option<Uuid>,
    file: Option<(String, axum::body::Bytes)>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.file = Some((file_name, data));
                continue;
            }

            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            let text = text.trim();
            match name.as_str() {
                "internal_id" => form.internal_id = Some(parse_field(&name, text)?),
                "id" => form.id = Some(parse_field(&name, text)?),
                "owner_kind" => form.owner_kind = Some(text.parse()?),
                "owner_id" => form.owner_id = Some(parse_field(&name, text)?),
                other => tracing::debug!(field = other, "Ignoring unknown upload field"),
            }
        }
        Ok(form)
    }
}

fn parse_field<T: std::str::FromStr>(name: &str, value: &str) -> AppResult<T> {
    value
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid value for '{name}': {value}")))
}

/// POST /api/v1/scenarios/{id}/files
///
/// Multipart form with the fields `internal_id`, `file` and optionally `id`,
/// `owner_kind` and `owner_id`. The owner defaults to the scenario and must
/// belong to it.
pub async fn upload_file(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadedFile>>)> {
    ensure_scenario(&state, scenario_id).await?;
    let form = UploadForm::read(multipart).await?;

    let internal_id = form
        .internal_id
        .ok_or_else(|| AppError::BadRequest("Missing field 'internal_id'".into()))?;
    let (file_name, data) = form
        .file
        .ok_or_else(|| AppError::BadRequest("Missing field 'file'".into()))?;
    let key = ItemKey::derive(scenario_id, internal_id, form.id)?;

    let owner = TaskOwner::new(
        form.owner_kind.unwrap_or(OwnerKind::Scenario),
        form.owner_id.unwrap_or(scenario_id),
    );
    if OwnerRepo::scenario_of(&state.pool, &owner).await? != Some(scenario_id) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Owner {} {} does not belong to scenario {scenario_id}",
            owner.kind(),
            owner.id()
        ))));
    }

    // The blob path is derived from the item id, so an existing row owns it.
    if UploadedFileRepo::find_by_id(&state.pool, key.id()).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "File with internal_id {internal_id} already exists in scenario {scenario_id}"
        ))));
    }

    let relative = upload_relative_path(scenario_id, key.id(), &file_name);
    let dest = state.config.upload_path.join(&relative);
    let staged = staging_path(&dest);
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;
    }
    tokio::fs::write(&staged, &data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;

    let input = CreateUploadedFile {
        name: (!file_name.is_empty()).then_some(file_name),
        file_path: relative.to_string_lossy().into_owned(),
        owner,
    };
    let row = match commit_upload(&state, &key, &input, &staged, &dest).await {
        Ok(row) => row,
        Err(e) => {
            discard(&staged).await;
            return Err(e);
        }
    };

    tracing::info!(
        scenario_id = %scenario_id,
        file_id = %row.id,
        bytes = data.len(),
        "Stored uploaded file",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

/// Insert the row and move the staged blob into place within one transaction.
/// A failed insert never touches `dest`.
async fn commit_upload(
    state: &AppState,
    key: &ItemKey,
    input: &CreateUploadedFile,
    staged: &StdPath,
    dest: &StdPath,
) -> AppResult<UploadedFile> {
    let mut tx = state.pool.begin().await?;
    let row = UploadedFileRepo::create(&mut *tx, key, input).await?;
    tokio::fs::rename(staged, dest)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;
    if let Err(e) = tx.commit().await {
        discard(dest).await;
        return Err(e.into());
    }
    Ok(row)
}

/// Sibling of `dest` that is unique to this request.
fn staging_path(dest: &StdPath) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.part", Uuid::new_v4().simple()));
    dest.with_file_name(name)
}

async fn discard(path: &StdPath) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove staged upload");
        }
    }
}
