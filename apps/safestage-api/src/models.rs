//! Data models for the SafeStage API

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{
    CalculationParameter, CalculationType, Canton, CantonLanguage, ValueType,
};
use sqlx::FromRow;

use crate::error::ApiError;

/// Canton row as stored
#[derive(Debug, Clone, FromRow)]
pub struct DbCanton {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub name_official: String,
    pub language: String,
    pub sort_order: i64,
}

impl TryFrom<DbCanton> for Canton {
    type Error = ApiError;

    fn try_from(row: DbCanton) -> Result<Self, Self::Error> {
        let language = CantonLanguage::parse(&row.language).ok_or_else(|| {
            ApiError::Internal(anyhow!(
                "Canton {} has unknown language {:?}",
                row.code,
                row.language
            ))
        })?;

        Ok(Canton {
            id: row.id,
            code: row.code,
            name: row.name,
            name_official: row.name_official,
            language,
            sort_order: row.sort_order,
        })
    }
}

/// Calculation type row as stored
#[derive(Debug, Clone, FromRow)]
pub struct DbCalculationType {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub formula: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i64,
}

impl From<DbCalculationType> for CalculationType {
    fn from(row: DbCalculationType) -> Self {
        CalculationType {
            id: row.id,
            slug: row.slug,
            name: row.name,
            description: row.description,
            formula: row.formula,
            icon: row.icon,
            sort_order: row.sort_order,
        }
    }
}

/// Calculation parameter row as stored
#[derive(Debug, Clone, FromRow)]
pub struct DbCalculationParameter {
    pub id: i64,
    pub calculation_type_id: i64,
    pub canton_id: Option<i64>,
    pub parameter_key: String,
    pub parameter_value: String,
    pub value_type: String,
    pub unit: Option<String>,
    pub description: Option<String>,
}

impl TryFrom<DbCalculationParameter> for CalculationParameter {
    type Error = ApiError;

    fn try_from(row: DbCalculationParameter) -> Result<Self, Self::Error> {
        let value_type = ValueType::parse(&row.value_type).ok_or_else(|| {
            ApiError::Internal(anyhow!(
                "Parameter {} has unknown value type {:?}",
                row.id,
                row.value_type
            ))
        })?;

        Ok(CalculationParameter {
            id: row.id,
            calculation_type_id: row.calculation_type_id,
            canton_id: row.canton_id,
            parameter_key: row.parameter_key,
            parameter_value: row.parameter_value,
            value_type,
            unit: row.unit,
            description: row.description,
        })
    }
}

/// Version counter of one synchronisable table
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DataVersion {
    pub table_name: String,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Query of `GET /v1/calculations/parameters`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParametersQuery {
    #[serde(rename = "type")]
    pub calculation_type: Option<String>,
    pub canton_code: Option<String>,
}

/// Effective parameters of a calculation type
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParametersResponse {
    pub calculation_type: CalculationType,
    pub parameters: Vec<CalculationParameter>,
}

/// Query of `GET /v1/sync/data`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncQuery {
    pub table: Option<String>,
    pub since_version: Option<String>,
}

/// Full-table sync payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub data: Vec<serde_json::Value>,
    pub version: i64,
    pub has_changes: bool,
}

/// Body of `PUT /admin/api/calculation-parameters`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterUpsertRequest {
    /// Calculation type slug
    pub calculation_type: String,
    /// Omit for the nationwide default
    #[serde(default)]
    pub canton_code: Option<String>,
    pub parameter_key: String,
    pub parameter_value: String,
    #[serde(default = "default_value_type")]
    pub value_type: ValueType,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_value_type() -> ValueType {
    ValueType::Float
}
