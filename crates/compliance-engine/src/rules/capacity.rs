// Maximum occupancy bounded by floor area and exit width
use shared_types::{CapacityResult, Inputs, LimitingFactor};

use crate::extractors::numeric::{number_or, text_or};
use crate::resolver::ResolvedParameters;

/// Seating arrangement of the event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Standing,
    Seated,
    Mixed,
}

impl EventType {
    /// Anything other than `standing` or `seated` is treated as mixed
    pub fn parse(s: &str) -> Self {
        match s {
            "standing" => EventType::Standing,
            "seated" => EventType::Seated,
            _ => EventType::Mixed,
        }
    }

    fn area_key(&self) -> (&'static str, f64) {
        match self {
            EventType::Standing => ("sqm_per_person_standing", 1.0),
            EventType::Seated => ("sqm_per_person_seated", 2.0),
            EventType::Mixed => ("sqm_per_person_mixed", 1.5),
        }
    }
}

/// Inputs: `netAreaSqm`, `eventType`, `exitCount`, `totalExitWidthM`.
///
/// `exitCount` is accepted for client compatibility but does not enter the
/// formula; the exit bound uses the total exit width only.
pub fn calculate(inputs: &Inputs, params: &ResolvedParameters) -> CapacityResult {
    let net_area_sqm = number_or(inputs, "netAreaSqm", 0.0);
    let event_type = EventType::parse(&text_or(inputs, "eventType", "standing"));
    let total_exit_width_m = number_or(inputs, "totalExitWidthM", 1.8);

    let (key, fallback) = event_type.area_key();
    let sqm_per_person = params.float_or(key, fallback);
    let persons_per_m_exit_width = params.float_or("persons_per_m_exit_width", 166.0);

    let max_by_area = (net_area_sqm / sqm_per_person).floor();
    let max_by_exits = (total_exit_width_m * persons_per_m_exit_width).floor();

    // Ties favour area
    let limiting_factor = if max_by_area <= max_by_exits {
        LimitingFactor::Area
    } else {
        LimitingFactor::Exits
    };

    CapacityResult {
        max_persons_by_area: max_by_area,
        max_persons_by_exits: max_by_exits,
        effective_max_persons: max_by_area.min(max_by_exits),
        limiting_factor,
    }
}
