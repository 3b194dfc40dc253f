//! Parameter store seam
//!
//! The engine reads reference data through [`ParameterStore`]. The HTTP
//! service keeps its rows in SQLite; [`InMemoryStore`] holds the same data
//! in memory for embedding and tests.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use shared_types::{CalculationParameter, CalculationType, Canton, ValueType};

use crate::catalog::CALCULATION_TYPES;
use crate::error::{EngineError, Result};
use crate::jurisdiction::CantonCode;

/// Read access to calculation types, cantons and parameter rows
pub trait ParameterStore: Send + Sync {
    /// All calculation types in sort order
    fn calculation_types(&self) -> Vec<CalculationType>;

    fn find_calculation_type(&self, slug: &str) -> Option<CalculationType>;

    /// Canton by code (case-insensitive)
    fn find_canton(&self, code: &str) -> Option<Canton>;

    /// Rows of one calculation type whose canton is `canton_id` or null
    fn parameters_for(
        &self,
        calculation_type_id: i64,
        canton_id: Option<i64>,
    ) -> Vec<CalculationParameter>;
}

/// Input for an administrative parameter edit
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterUpsert {
    pub calculation_type_id: i64,
    pub canton_id: Option<i64>,
    pub parameter_key: String,
    pub parameter_value: String,
    pub value_type: ValueType,
    pub unit: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default)]
struct Tables {
    cantons: Vec<Canton>,
    calculation_types: Vec<CalculationType>,
    parameters: Vec<CalculationParameter>,
    next_parameter_id: i64,
}

/// In-memory parameter store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// An empty store without cantons or calculation types
    pub fn new() -> Self {
        Self::default()
    }

    /// A store loaded with the 26 cantons, the calculation catalog and the
    /// nationwide default parameters
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut tables = store.write();
            tables.cantons = CantonCode::all().iter().map(|c| c.to_record()).collect();
            tables.calculation_types = CALCULATION_TYPES.iter().map(|s| s.to_record()).collect();

            for seed in CALCULATION_TYPES.iter() {
                for default in seed.parameters {
                    tables.next_parameter_id += 1;
                    let row = CalculationParameter {
                        id: tables.next_parameter_id,
                        calculation_type_id: seed.sort_order,
                        canton_id: None,
                        parameter_key: default.key.to_string(),
                        parameter_value: default.value.to_string(),
                        value_type: default.value_type,
                        unit: Some(default.unit.to_string()),
                        description: Some(default.description.to_string()),
                    };
                    tables.parameters.push(row);
                }
            }
        }

        store
    }

    pub fn insert_calculation_type(&self, calculation_type: CalculationType) {
        let mut tables = self.write();
        tables
            .calculation_types
            .retain(|t| t.id != calculation_type.id);
        tables.calculation_types.push(calculation_type);
        tables.calculation_types.sort_by_key(|t| t.sort_order);
    }

    /// Insert a row, or replace the row with the same
    /// `(calculation type, canton-or-null, key)` triple.
    pub fn upsert_parameter(&self, upsert: ParameterUpsert) -> Result<CalculationParameter> {
        let mut tables = self.write();

        if !tables
            .calculation_types
            .iter()
            .any(|t| t.id == upsert.calculation_type_id)
        {
            return Err(EngineError::calculation_type_not_found(
                &upsert.calculation_type_id.to_string(),
            ));
        }
        if let Some(canton_id) = upsert.canton_id {
            if !tables.cantons.iter().any(|c| c.id == canton_id) {
                return Err(EngineError::canton_not_found(&canton_id.to_string()));
            }
        }

        let existing = tables.parameters.iter_mut().find(|p| {
            p.calculation_type_id == upsert.calculation_type_id
                && p.canton_id == upsert.canton_id
                && p.parameter_key == upsert.parameter_key
        });

        if let Some(row) = existing {
            row.parameter_value = upsert.parameter_value;
            row.value_type = upsert.value_type;
            row.unit = upsert.unit;
            row.description = upsert.description;
            return Ok(row.clone());
        }

        tables.next_parameter_id += 1;
        let row = CalculationParameter {
            id: tables.next_parameter_id,
            calculation_type_id: upsert.calculation_type_id,
            canton_id: upsert.canton_id,
            parameter_key: upsert.parameter_key,
            parameter_value: upsert.parameter_value,
            value_type: upsert.value_type,
            unit: upsert.unit,
            description: upsert.description,
        };
        tables.parameters.push(row.clone());
        Ok(row)
    }

    /// Every stored parameter row
    pub fn all_parameters(&self) -> Vec<CalculationParameter> {
        self.read().parameters.clone()
    }

    pub fn cantons(&self) -> Vec<Canton> {
        self.read().cantons.clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl ParameterStore for InMemoryStore {
    fn calculation_types(&self) -> Vec<CalculationType> {
        self.read().calculation_types.clone()
    }

    fn find_calculation_type(&self, slug: &str) -> Option<CalculationType> {
        self.read()
            .calculation_types
            .iter()
            .find(|t| t.slug == slug)
            .cloned()
    }

    fn find_canton(&self, code: &str) -> Option<Canton> {
        let code = CantonCode::from_code(code)?;
        self.read()
            .cantons
            .iter()
            .find(|c| c.code == code.as_str())
            .cloned()
    }

    fn parameters_for(
        &self,
        calculation_type_id: i64,
        canton_id: Option<i64>,
    ) -> Vec<CalculationParameter> {
        self.read()
            .parameters
            .iter()
            .filter(|p| p.calculation_type_id == calculation_type_id)
            .filter(|p| p.canton_id.is_none() || p.canton_id == canton_id)
            .cloned()
            .collect()
    }
}
