// Evacuation route width, travel time and signage
use shared_types::{EvacuationRouteResult, Inputs};

use crate::extractors::numeric::{number_or, round2, round_half_up};
use crate::resolver::ResolvedParameters;

/// Walking speed on an evacuation route, m/s
const WALKING_SPEED: f64 = 1.2;
/// Added time per floor above the first, seconds
const SECONDS_PER_FLOOR: f64 = 30.0;
/// Persons passing an exit per second
const EXIT_FLOW_PER_SECOND: f64 = 60.0;
/// Maximum spacing of illuminated exit signs, meters
const SIGN_SPACING_M: f64 = 15.0;

/// Inputs: `personCount`, `floors`, `distanceToExitM`
pub fn calculate(inputs: &Inputs, params: &ResolvedParameters) -> EvacuationRouteResult {
    let person_count = number_or(inputs, "personCount", 0.0);
    let floors = number_or(inputs, "floors", 1.0);
    let distance_to_exit_m = number_or(inputs, "distanceToExitM", 0.0);

    let max_distance = params.float_or("max_distance_to_exit", 35.0);
    let min_route_width = params.float_or("min_route_width", 1.2);
    let route_width_per_100 = params.float_or("route_width_per_100_persons", 0.6);
    let max_evacuation_time = params.float_or("max_evacuation_time_sec", 180.0);

    let required_width = min_route_width.max((person_count / 100.0) * route_width_per_100);

    let stair_time = if floors > 1.0 {
        (floors - 1.0) * SECONDS_PER_FLOOR
    } else {
        0.0
    };
    let estimated_time =
        distance_to_exit_m / WALKING_SPEED + stair_time + person_count / EXIT_FLOW_PER_SECOND;

    EvacuationRouteResult {
        required_route_width_m: round2(required_width),
        max_evacuation_time_sec: max_evacuation_time,
        estimated_evacuation_time_sec: round_half_up(estimated_time),
        // Compliance is judged on the unrounded time
        is_compliant: distance_to_exit_m <= max_distance && estimated_time <= max_evacuation_time,
        illuminated_signs_required: 1f64.max((distance_to_exit_m / SIGN_SPACING_M).ceil()),
    }
}
