//! Formula rules, one module per calculation kind
//!
//! Each rule is a pure function of the request inputs and the resolved
//! parameter set. Missing parameters fall back to constants that match the
//! nationwide defaults in the catalog.

pub mod capacity;
pub mod emergency_exits;
pub mod evacuation_routes;
pub mod fire_extinguishers;

use shared_types::{CalculationResult, Inputs};

use crate::catalog::CalculationKind;
use crate::error::{EngineError, Result};
use crate::resolver::ResolvedParameters;

/// Run the rule for `kind`
pub fn evaluate(
    kind: CalculationKind,
    inputs: &Inputs,
    params: &ResolvedParameters,
) -> CalculationResult {
    match kind {
        CalculationKind::EmergencyExits => {
            CalculationResult::EmergencyExits(emergency_exits::calculate(inputs, params))
        }
        CalculationKind::FireExtinguishers => {
            CalculationResult::FireExtinguishers(fire_extinguishers::calculate(inputs, params))
        }
        CalculationKind::Capacity => {
            CalculationResult::Capacity(capacity::calculate(inputs, params))
        }
        CalculationKind::EvacuationRoutes => {
            CalculationResult::EvacuationRoutes(evacuation_routes::calculate(inputs, params))
        }
    }
}

/// Run the rule registered for `slug`; `InvalidArgument` if there is none
pub fn evaluate_slug(
    slug: &str,
    inputs: &Inputs,
    params: &ResolvedParameters,
) -> Result<CalculationResult> {
    let kind = CalculationKind::from_slug(slug)
        .ok_or_else(|| EngineError::InvalidArgument(slug.to_string()))?;
    Ok(evaluate(kind, inputs, params))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_slug() {
        let params = ResolvedParameters::default();
        let inputs = Inputs::new();

        assert!(matches!(
            evaluate_slug("capacity", &inputs, &params),
            Ok(CalculationResult::Capacity(_))
        ));
        assert!(matches!(
            evaluate_slug("emergency-exits", &inputs, &params),
            Ok(CalculationResult::EmergencyExits(_))
        ));
    }

    #[test]
    fn test_unknown_slug_is_invalid_argument() {
        let result = evaluate_slug(
            "noise-protection",
            &Inputs::new(),
            &ResolvedParameters::default(),
        );
        assert_eq!(
            result,
            Err(EngineError::InvalidArgument("noise-protection".to_string()))
        );
    }
}
