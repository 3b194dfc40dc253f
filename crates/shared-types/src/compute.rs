//! Calculation request/response payloads and typed results

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// A raw calculator input as sent by clients: either a JSON number or a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Number(f64),
    Text(String),
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        InputValue::Number(value)
    }
}

impl From<i64> for InputValue {
    fn from(value: i64) -> Self {
        InputValue::Number(value as f64)
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::Text(value.to_string())
    }
}

pub type Inputs = BTreeMap<String, InputValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRequest {
    pub calculation_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canton_code: Option<String>,
    pub inputs: Inputs,
}

impl ComputeRequest {
    pub fn new(calculation_type: impl Into<String>) -> Self {
        Self {
            calculation_type: calculation_type.into(),
            canton_code: None,
            inputs: Inputs::new(),
        }
    }

    pub fn with_canton(mut self, code: impl Into<String>) -> Self {
        self.canton_code = Some(code.into());
        self
    }

    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.inputs.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeResponse {
    pub results: CalculationResult,
    pub parameters: BTreeMap<String, String>,
    pub legal_reference: Option<String>,
    pub disclaimer: String,
}

/// Result of one formula family. Serializes as a flat object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CalculationResult {
    EmergencyExits(EmergencyExitResult),
    FireExtinguishers(FireExtinguisherResult),
    Capacity(CapacityResult),
    EvacuationRoutes(EvacuationRouteResult),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyExitResult {
    #[serde(serialize_with = "json_number")]
    pub required_exits: f64,
    #[serde(serialize_with = "json_number")]
    pub total_exit_width_m: f64,
    #[serde(serialize_with = "json_number")]
    pub width_per_exit_m: f64,
    #[serde(serialize_with = "json_number")]
    pub persons_per_sqm: f64,
    #[serde(serialize_with = "json_number")]
    pub max_capacity: f64,
    pub is_over_capacity: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FireExtinguisherResult {
    #[serde(serialize_with = "json_number")]
    pub required_extinguishers: f64,
    pub extinguisher_type: String,
    #[serde(serialize_with = "json_number")]
    pub coverage_per_unit: f64,
}

/// Which bound determines the effective capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitingFactor {
    Area,
    Exits,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityResult {
    #[serde(serialize_with = "json_number")]
    pub max_persons_by_area: f64,
    #[serde(serialize_with = "json_number")]
    pub max_persons_by_exits: f64,
    #[serde(serialize_with = "json_number")]
    pub effective_max_persons: f64,
    pub limiting_factor: LimitingFactor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvacuationRouteResult {
    #[serde(serialize_with = "json_number")]
    pub required_route_width_m: f64,
    #[serde(serialize_with = "json_number")]
    pub max_evacuation_time_sec: f64,
    #[serde(serialize_with = "json_number")]
    pub estimated_evacuation_time_sec: f64,
    pub is_compliant: bool,
    #[serde(serialize_with = "json_number")]
    pub illuminated_signs_required: f64,
}

/// Writes integral values as JSON integers and non-finite values as `null`.
///
/// Formula outputs are computed in `f64`, but counts such as `requiredExits`
/// must reach clients as `3`, not `3.0`.
pub fn json_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const I64_SAFE: f64 = 9_007_199_254_740_992.0; // 2^53

    if !value.is_finite() {
        serializer.serialize_none()
    } else if value.fract() == 0.0 && value.abs() <= I64_SAFE {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integral_numbers_serialize_without_fraction() {
        let result = CapacityResult {
            max_persons_by_area: 500.0,
            max_persons_by_exits: 598.0,
            effective_max_persons: 500.0,
            limiting_factor: LimitingFactor::Area,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "maxPersonsByArea": 500,
                "maxPersonsByExits": 598,
                "effectiveMaxPersons": 500,
                "limitingFactor": "area",
            })
        );
        assert!(!value.to_string().contains("500.0"));
    }

    #[test]
    fn test_non_finite_numbers_serialize_as_null() {
        let result = FireExtinguisherResult {
            required_extinguishers: f64::INFINITY,
            extinguisher_type: "ABC 6kg".to_string(),
            coverage_per_unit: 0.5,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["requiredExtinguishers"], serde_json::Value::Null);
        assert_eq!(value["coveragePerUnit"], json!(0.5));
    }

    #[test]
    fn test_results_flatten_into_plain_object() {
        let result = CalculationResult::EvacuationRoutes(EvacuationRouteResult {
            required_route_width_m: 1.8,
            max_evacuation_time_sec: 180.0,
            estimated_evacuation_time_sec: 56.0,
            is_compliant: true,
            illuminated_signs_required: 2.0,
        });
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "requiredRouteWidthM": 1.8,
                "maxEvacuationTimeSec": 180,
                "estimatedEvacuationTimeSec": 56,
                "isCompliant": true,
                "illuminatedSignsRequired": 2,
            })
        );
    }

    #[test]
    fn test_request_accepts_numbers_and_strings() {
        let request: ComputeRequest = serde_json::from_value(json!({
            "calculationType": "fire-extinguishers",
            "cantonCode": "ZH",
            "inputs": { "areaSqm": 500, "riskCategory": "medium" }
        }))
        .unwrap();

        assert_eq!(request.canton_code.as_deref(), Some("ZH"));
        assert_eq!(request.inputs["areaSqm"], InputValue::Number(500.0));
        assert_eq!(
            request.inputs["riskCategory"],
            InputValue::Text("medium".to_string())
        );
    }

    #[test]
    fn test_request_requires_inputs() {
        let missing = serde_json::from_value::<ComputeRequest>(json!({ "calculationType": "capacity" }));
        assert!(missing.is_err());

        let request: ComputeRequest =
            serde_json::from_value(json!({ "calculationType": "capacity", "inputs": {} })).unwrap();
        assert!(request.inputs.is_empty());
        assert!(request.canton_code.is_none());
    }
}
