//! Reference records: cantons, calculation types and their parameters

use serde::{Deserialize, Serialize};

/// Primary official language of a canton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CantonLanguage {
    De,
    Fr,
    It,
    Rm,
}

impl CantonLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CantonLanguage::De => "DE",
            CantonLanguage::Fr => "FR",
            CantonLanguage::It => "IT",
            CantonLanguage::Rm => "RM",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DE" => Some(CantonLanguage::De),
            "FR" => Some(CantonLanguage::Fr),
            "IT" => Some(CantonLanguage::It),
            "RM" => Some(CantonLanguage::Rm),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Canton {
    pub id: i64,
    pub code: String, // e.g., "ZH"
    pub name: String,
    pub name_official: String,
    pub language: CantonLanguage,
    pub sort_order: i64,
}

/// A formula family with its legal reference text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationType {
    pub id: i64,
    pub slug: String, // e.g., "emergency-exits"
    pub name: String,
    pub description: Option<String>,
    pub formula: Option<String>, // Returned to clients as `legalReference`
    pub icon: Option<String>,
    pub sort_order: i64,
}

/// Declared type of a stored parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueType {
    Int,
    Float,
    Boolean,
    String,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Int => "INT",
            ValueType::Float => "FLOAT",
            ValueType::Boolean => "BOOLEAN",
            ValueType::String => "STRING",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "INT" => Some(ValueType::Int),
            "FLOAT" => Some(ValueType::Float),
            "BOOLEAN" => Some(ValueType::Boolean),
            "STRING" => Some(ValueType::String),
            _ => None,
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored constant feeding a formula.
///
/// `canton_id == None` marks the nationwide default row. At most one row
/// exists per `(calculation_type_id, canton_id, parameter_key)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationParameter {
    pub id: i64,
    pub calculation_type_id: i64,
    pub canton_id: Option<i64>,
    pub parameter_key: String,
    pub parameter_value: String,
    pub value_type: ValueType,
    pub unit: Option<String>,
    pub description: Option<String>,
}

impl CalculationParameter {
    pub fn is_canton_specific(&self) -> bool {
        self.canton_id.is_some()
    }
}
