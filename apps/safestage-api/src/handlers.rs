//! HTTP handlers for the SafeStage API

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use chrono::Utc;
use compliance_engine::{
    canton_or_defaults, extractors::numeric::parse_int_prefix, respond, CantonCode, EngineError,
    Resolution,
};
use serde::Serialize;
use shared_types::{
    CalculationParameter, CalculationType, Canton, ComputeRequest, ComputeResponse,
};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}

/// All cantons in sort order
pub async fn list_cantons(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Canton>>, ApiError> {
    Ok(Json(load_cantons(&state.db).await?))
}

/// Canton by code, case-insensitive
pub async fn get_canton(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<Canton>, ApiError> {
    let canton = find_canton(&state.db, &code)
        .await?
        .ok_or_else(|| EngineError::canton_not_found(&code.to_uppercase()))?;
    Ok(Json(canton))
}

/// Calculation types in sort order
pub async fn list_calculation_types(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CalculationType>>, ApiError> {
    Ok(Json(load_calculation_types(&state.db).await?))
}

/// Effective parameters of a calculation type, optionally for a canton
pub async fn get_parameters(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ParametersQuery>,
) -> Result<Json<ParametersResponse>, ApiError> {
    let slug = query
        .calculation_type
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::InvalidRequest("Parameter \"type\" is required".to_string()))?;

    let resolution = resolve_parameters(&state.db, &slug, query.canton_code.as_deref()).await?;

    Ok(Json(ParametersResponse {
        calculation_type: resolution.calculation_type,
        parameters: resolution.parameters.into_rows(),
    }))
}

/// Resolve parameters and run the formula for one calculation request
pub async fn compute(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ComputeRequest>, JsonRejection>,
) -> Result<Json<ComputeResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    validate_compute_request(&req)?;

    let resolution =
        resolve_parameters(&state.db, &req.calculation_type, req.canton_code.as_deref()).await?;

    let response = respond(
        &resolution.calculation_type,
        &resolution.parameters,
        &req.inputs,
    )?;

    tracing::debug!(
        "Computed {} (canton: {})",
        resolution.calculation_type.slug,
        req.canton_code.as_deref().unwrap_or("-")
    );

    Ok(Json(response))
}

/// `calculationType` must be non-empty, `cantonCode` two characters when given
pub fn validate_compute_request(req: &ComputeRequest) -> Result<(), ApiError> {
    if req.calculation_type.is_empty() {
        return Err(ApiError::InvalidRequest(
            "calculationType must not be empty".to_string(),
        ));
    }
    if let Some(code) = &req.canton_code {
        if code.chars().count() != 2 {
            return Err(ApiError::InvalidRequest(format!(
                "cantonCode must have exactly 2 characters, got {:?}",
                code
            )));
        }
    }
    Ok(())
}

/// Version counters of all synchronisable tables
pub async fn sync_versions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DataVersion>>, ApiError> {
    let versions: Vec<DataVersion> = sqlx::query_as(
        "SELECT table_name, version, updated_at FROM data_versions ORDER BY table_name",
    )
    .fetch_all(&state.db)
    .await?;
    Ok(Json(versions))
}

/// Full contents of one table if the client is behind
pub async fn sync_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SyncQuery>,
) -> Result<Json<SyncResponse>, ApiError> {
    let table = query
        .table
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::InvalidRequest("Parameter \"table\" is required".to_string()))?;

    let version: Option<DataVersion> = sqlx::query_as(
        "SELECT table_name, version, updated_at FROM data_versions WHERE table_name = ?",
    )
    .bind(&table)
    .fetch_optional(&state.db)
    .await?;
    let version = version.ok_or_else(|| ApiError::NotFound(format!("Table not found: {}", table)))?;

    // An unparseable version counts as "never synced"
    let since = parse_int_prefix(query.since_version.as_deref().unwrap_or("0"));
    if since.is_some_and(|since| version.version <= since) {
        return Ok(Json(SyncResponse {
            data: Vec::new(),
            version: version.version,
            has_changes: false,
        }));
    }

    let data = match table.as_str() {
        "cantons" => to_json(load_cantons(&state.db).await?)?,
        "calculation_types" => to_json(load_calculation_types(&state.db).await?)?,
        "calculation_parameters" => to_json(load_all_parameters(&state.db).await?)?,
        other => {
            return Err(ApiError::InvalidRequest(format!("Unknown table: {}", other)));
        }
    };

    tracing::debug!("Sync of {} at version {}", table, version.version);

    Ok(Json(SyncResponse {
        data,
        version: version.version,
        has_changes: true,
    }))
}

/// Create or replace one parameter row and bump the parameter data version
pub async fn upsert_parameter(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ParameterUpsertRequest>, JsonRejection>,
) -> Result<Json<CalculationParameter>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    if req.parameter_key.trim().is_empty() {
        return Err(ApiError::InvalidRequest(
            "parameterKey must not be empty".to_string(),
        ));
    }

    let calculation_type = require_calculation_type(&state.db, &req.calculation_type).await?;
    let canton_id = match req.canton_code.as_deref() {
        Some(code) => Some(
            find_canton(&state.db, code)
                .await?
                .ok_or_else(|| EngineError::canton_not_found(&code.to_uppercase()))?
                .id,
        ),
        None => None,
    };

    let mut tx = state.db.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE calculation_parameters
        SET parameter_value = ?, value_type = ?, unit = ?, description = ?
        WHERE calculation_type_id = ? AND canton_id IS ? AND parameter_key = ?
        "#,
    )
    .bind(&req.parameter_value)
    .bind(req.value_type.as_str())
    .bind(&req.unit)
    .bind(&req.description)
    .bind(calculation_type.id)
    .bind(canton_id)
    .bind(&req.parameter_key)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        sqlx::query(
            r#"
            INSERT INTO calculation_parameters
                (calculation_type_id, canton_id, parameter_key, parameter_value, value_type, unit, description)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(calculation_type.id)
        .bind(canton_id)
        .bind(&req.parameter_key)
        .bind(&req.parameter_value)
        .bind(req.value_type.as_str())
        .bind(&req.unit)
        .bind(&req.description)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO data_versions (table_name, version, updated_at)
        VALUES ('calculation_parameters', 1, ?)
        ON CONFLICT(table_name) DO UPDATE SET version = version + 1, updated_at = excluded.updated_at
        "#,
    )
    .bind(Utc::now().to_rfc3339())
    .execute(&mut *tx)
    .await?;

    let row: DbCalculationParameter = sqlx::query_as(
        r#"
        SELECT id, calculation_type_id, canton_id, parameter_key, parameter_value, value_type, unit, description
        FROM calculation_parameters
        WHERE calculation_type_id = ? AND canton_id IS ? AND parameter_key = ?
        "#,
    )
    .bind(calculation_type.id)
    .bind(canton_id)
    .bind(&req.parameter_key)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        "Stored parameter {}={} for {} (canton: {})",
        req.parameter_key,
        req.parameter_value,
        calculation_type.slug,
        req.canton_code.as_deref().unwrap_or("-")
    );

    Ok(Json(row.try_into()?))
}

fn to_json<T: Serialize>(rows: Vec<T>) -> Result<Vec<serde_json::Value>, ApiError> {
    rows.into_iter()
        .map(|row| serde_json::to_value(row).map_err(|e| ApiError::Internal(e.into())))
        .collect()
}

async fn load_cantons(db: &SqlitePool) -> Result<Vec<Canton>, ApiError> {
    let rows: Vec<DbCanton> = sqlx::query_as(
        "SELECT id, code, name, name_official, language, sort_order FROM cantons ORDER BY sort_order",
    )
    .fetch_all(db)
    .await?;
    rows.into_iter().map(Canton::try_from).collect()
}

async fn find_canton(db: &SqlitePool, code: &str) -> Result<Option<Canton>, ApiError> {
    let Some(code) = CantonCode::from_code(code) else {
        return Ok(None);
    };
    let row: Option<DbCanton> = sqlx::query_as(
        "SELECT id, code, name, name_official, language, sort_order FROM cantons WHERE code = ?",
    )
    .bind(code.as_str())
    .fetch_optional(db)
    .await?;
    row.map(Canton::try_from).transpose()
}

/// Effective parameters of `slug` for an optional canton code.
///
/// Unknown canton codes resolve to nationwide defaults.
pub(crate) async fn resolve_parameters(
    db: &SqlitePool,
    slug: &str,
    canton_code: Option<&str>,
) -> Result<Resolution, ApiError> {
    let calculation_type = require_calculation_type(db, slug).await?;

    let canton = match canton_code.filter(|c| !c.is_empty()) {
        Some(code) => canton_or_defaults(code, find_canton(db, code).await?),
        None => None,
    };

    let rows = parameter_rows(db, calculation_type.id, canton.as_ref().map(|c| c.id)).await?;
    Ok(Resolution::from_rows(calculation_type, canton, rows))
}

async fn load_calculation_types(db: &SqlitePool) -> Result<Vec<CalculationType>, ApiError> {
    let rows: Vec<DbCalculationType> = sqlx::query_as(
        "SELECT id, slug, name, description, formula, icon, sort_order FROM calculation_types ORDER BY sort_order",
    )
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(CalculationType::from).collect())
}

async fn require_calculation_type(db: &SqlitePool, slug: &str) -> Result<CalculationType, ApiError> {
    let row: Option<DbCalculationType> = sqlx::query_as(
        "SELECT id, slug, name, description, formula, icon, sort_order FROM calculation_types WHERE slug = ?",
    )
    .bind(slug)
    .fetch_optional(db)
    .await?;
    row.map(CalculationType::from)
        .ok_or_else(|| EngineError::calculation_type_not_found(slug).into())
}

/// Rows of a calculation type for the canton and the nationwide defaults
async fn parameter_rows(
    db: &SqlitePool,
    calculation_type_id: i64,
    canton_id: Option<i64>,
) -> Result<Vec<CalculationParameter>, ApiError> {
    let rows: Vec<DbCalculationParameter> = sqlx::query_as(
        r#"
        SELECT id, calculation_type_id, canton_id, parameter_key, parameter_value, value_type, unit, description
        FROM calculation_parameters
        WHERE calculation_type_id = ? AND (canton_id IS NULL OR canton_id = ?)
        ORDER BY id
        "#,
    )
    .bind(calculation_type_id)
    .bind(canton_id)
    .fetch_all(db)
    .await?;
    rows.into_iter().map(CalculationParameter::try_from).collect()
}

async fn load_all_parameters(db: &SqlitePool) -> Result<Vec<CalculationParameter>, ApiError> {
    let rows: Vec<DbCalculationParameter> = sqlx::query_as(
        r#"
        SELECT id, calculation_type_id, canton_id, parameter_key, parameter_value, value_type, unit, description
        FROM calculation_parameters
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;
    rows.into_iter().map(CalculationParameter::try_from).collect()
}
