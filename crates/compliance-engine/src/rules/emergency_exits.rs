// Emergency exit sizing (VKF fire-safety guideline 16-15)
use shared_types::{EmergencyExitResult, Inputs};

use crate::extractors::numeric::{number_or, round2};
use crate::resolver::ResolvedParameters;

/// Inputs: `personCount`, `netAreaSqm`
pub fn calculate(inputs: &Inputs, params: &ResolvedParameters) -> EmergencyExitResult {
    let person_count = number_or(inputs, "personCount", 0.0);
    let net_area_sqm = number_or(inputs, "netAreaSqm", 0.0);

    let sqm_per_person = params.float_or("sqm_per_person", 1.0);
    let exit_width_per_100_persons = params.float_or("exit_width_per_100_persons", 0.6);
    let min_exit_width = params.float_or("min_exit_width", 0.9);
    let min_exits = params.int_or("min_exits", 2) as f64;

    let max_capacity = (net_area_sqm / sqm_per_person).floor();
    let total_exit_width = (person_count / 100.0) * exit_width_per_100_persons;
    // f64::max drops a NaN operand, so the minimum exit count always holds
    let required_exits = min_exits.max((total_exit_width / min_exit_width).ceil());
    let width_per_exit = (total_exit_width / required_exits).max(min_exit_width);

    EmergencyExitResult {
        required_exits,
        total_exit_width_m: round2(total_exit_width),
        width_per_exit_m: round2(width_per_exit),
        persons_per_sqm: round2(person_count / net_area_sqm),
        max_capacity,
        is_over_capacity: person_count > max_capacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::resolver::{merge_parameters, resolve};
    use pretty_assertions::assert_eq;
    use shared_types::{CalculationParameter, InputValue, ValueType};

    fn inputs(person_count: f64, net_area_sqm: f64) -> Inputs {
        let mut inputs = Inputs::new();
        inputs.insert("personCount".to_string(), InputValue::Number(person_count));
        inputs.insert("netAreaSqm".to_string(), InputValue::Number(net_area_sqm));
        inputs
    }

    fn defaults() -> ResolvedParameters {
        resolve(&InMemoryStore::seeded(), "emergency-exits", None)
            .unwrap()
            .parameters
    }

    #[test]
    fn test_500_persons_on_500_sqm() {
        let result = calculate(&inputs(500.0, 500.0), &defaults());

        // 3.0 m total width over 0.9 m minimum exits needs 4 exits
        assert_eq!(
            result,
            EmergencyExitResult {
                required_exits: 4.0,
                total_exit_width_m: 3.0,
                width_per_exit_m: 0.9,
                persons_per_sqm: 1.0,
                max_capacity: 500.0,
                is_over_capacity: false,
            }
        );
    }

    #[test]
    fn test_large_crowd_widens_exits() {
        let result = calculate(&inputs(2000.0, 1500.0), &defaults());

        assert_eq!(result.total_exit_width_m, 12.0);
        assert_eq!(result.required_exits, 14.0);
        assert_eq!(result.width_per_exit_m, 0.9);
        assert_eq!(result.max_capacity, 1500.0);
        assert!(result.is_over_capacity);
        assert_eq!(result.persons_per_sqm, 1.33);
    }

    #[test]
    fn test_small_event_uses_minimum_exits() {
        let result = calculate(&inputs(50.0, 200.0), &defaults());

        assert_eq!(result.required_exits, 2.0);
        assert_eq!(result.total_exit_width_m, 0.3);
        assert_eq!(result.width_per_exit_m, 0.9);
    }

    #[test]
    fn test_compiled_in_fallbacks_match_defaults() {
        let empty = ResolvedParameters::default();
        assert_eq!(
            calculate(&inputs(500.0, 500.0), &empty),
            calculate(&inputs(500.0, 500.0), &defaults())
        );
    }

    #[test]
    fn test_canton_override_changes_result() {
        let params = merge_parameters(vec![
            CalculationParameter {
                id: 1,
                calculation_type_id: 1,
                canton_id: None,
                parameter_key: "min_exits".to_string(),
                parameter_value: "2".to_string(),
                value_type: ValueType::Int,
                unit: None,
                description: None,
            },
            CalculationParameter {
                id: 2,
                calculation_type_id: 1,
                canton_id: Some(1),
                parameter_key: "min_exits".to_string(),
                parameter_value: "6".to_string(),
                value_type: ValueType::Int,
                unit: None,
                description: None,
            },
        ]);

        let result = calculate(&inputs(500.0, 500.0), &params);
        assert_eq!(result.required_exits, 6.0);
        assert_eq!(result.width_per_exit_m, 0.9);
    }

    #[test]
    fn test_missing_inputs_coerce_to_zero() {
        let result = calculate(&Inputs::new(), &defaults());

        assert_eq!(result.required_exits, 2.0);
        assert_eq!(result.total_exit_width_m, 0.0);
        assert_eq!(result.max_capacity, 0.0);
        assert!(result.persons_per_sqm.is_nan());
        assert!(!result.is_over_capacity);
    }
}
