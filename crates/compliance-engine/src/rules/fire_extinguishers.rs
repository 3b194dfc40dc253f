// Fire extinguisher count by area and hazard category (VKF BSV 2015)
use shared_types::{FireExtinguisherResult, Inputs};

use crate::extractors::numeric::{number_or, text_or};
use crate::resolver::ResolvedParameters;

/// Hazard category of the venue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    /// Anything other than `low` or `high` is treated as medium
    pub fn parse(s: &str) -> Self {
        match s {
            "low" => RiskCategory::Low,
            "high" => RiskCategory::High,
            _ => RiskCategory::Medium,
        }
    }

    fn coverage_key(&self) -> (&'static str, f64) {
        match self {
            RiskCategory::Low => ("coverage_per_unit_low", 300.0),
            RiskCategory::Medium => ("coverage_per_unit_medium", 200.0),
            RiskCategory::High => ("coverage_per_unit_high", 100.0),
        }
    }

    pub fn extinguisher_type(&self) -> &'static str {
        match self {
            RiskCategory::High => "ABC 12kg",
            _ => "ABC 6kg",
        }
    }
}

/// Inputs: `areaSqm`, `riskCategory` (`low` | `medium` | `high`)
pub fn calculate(inputs: &Inputs, params: &ResolvedParameters) -> FireExtinguisherResult {
    let area_sqm = number_or(inputs, "areaSqm", 0.0);
    let risk = RiskCategory::parse(&text_or(inputs, "riskCategory", "medium"));

    let (key, fallback) = risk.coverage_key();
    let coverage = params.float_or(key, fallback);

    FireExtinguisherResult {
        required_extinguishers: 1f64.max((area_sqm / coverage).ceil()),
        extinguisher_type: risk.extinguisher_type().to_string(),
        coverage_per_unit: coverage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use crate::store::InMemoryStore;
    use shared_types::InputValue;

    fn inputs(area_sqm: f64, risk: &str) -> Inputs {
        let mut inputs = Inputs::new();
        inputs.insert("areaSqm".to_string(), InputValue::Number(area_sqm));
        inputs.insert("riskCategory".to_string(), InputValue::Text(risk.to_string()));
        inputs
    }

    fn defaults() -> ResolvedParameters {
        resolve(&InMemoryStore::seeded(), "fire-extinguishers", None)
            .unwrap()
            .parameters
    }

    #[test]
    fn test_medium_risk_500_sqm() {
        let result = calculate(&inputs(500.0, "medium"), &defaults());
        assert_eq!(result.required_extinguishers, 3.0);
        assert_eq!(result.extinguisher_type, "ABC 6kg");
        assert_eq!(result.coverage_per_unit, 200.0);
    }

    #[test]
    fn test_high_risk_uses_heavier_extinguishers() {
        let result = calculate(&inputs(450.0, "high"), &defaults());
        assert_eq!(result.required_extinguishers, 5.0);
        assert_eq!(result.extinguisher_type, "ABC 12kg");
        assert_eq!(result.coverage_per_unit, 100.0);
    }

    #[test]
    fn test_low_risk() {
        let result = calculate(&inputs(900.0, "low"), &defaults());
        assert_eq!(result.required_extinguishers, 3.0);
        assert_eq!(result.coverage_per_unit, 300.0);
    }

    #[test]
    fn test_at_least_one_extinguisher() {
        let result = calculate(&inputs(10.0, "low"), &defaults());
        assert_eq!(result.required_extinguishers, 1.0);

        let empty = calculate(&Inputs::new(), &defaults());
        assert_eq!(empty.required_extinguishers, 1.0);
        assert_eq!(empty.coverage_per_unit, 200.0);
    }

    #[test]
    fn test_unknown_category_is_medium() {
        let result = calculate(&inputs(500.0, "HIGH"), &defaults());
        assert_eq!(result.coverage_per_unit, 200.0);
        assert_eq!(result.extinguisher_type, "ABC 6kg");
    }
}
