//! Calculation catalog: formula families and their nationwide defaults
//!
//! This is the seed data for the parameter store. The default values listed
//! here are the same constants the rules fall back to when a key is missing
//! from the store entirely.

use serde::{Deserialize, Serialize};
use shared_types::{CalculationType, ValueType};

/// Fixed notice attached to every calculation result
pub const DISCLAIMER: &str =
    "Diese Berechnung dient nur der Orientierung und ersetzt keine behördliche Prüfung.";

/// Formula family, identified by its slug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculationKind {
    EmergencyExits,
    FireExtinguishers,
    Capacity,
    EvacuationRoutes,
}

impl CalculationKind {
    pub fn all() -> &'static [CalculationKind] {
        &[
            CalculationKind::EmergencyExits,
            CalculationKind::FireExtinguishers,
            CalculationKind::Capacity,
            CalculationKind::EvacuationRoutes,
        ]
    }

    pub fn slug(&self) -> &'static str {
        match self {
            CalculationKind::EmergencyExits => "emergency-exits",
            CalculationKind::FireExtinguishers => "fire-extinguishers",
            CalculationKind::Capacity => "capacity",
            CalculationKind::EvacuationRoutes => "evacuation-routes",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.slug() == slug)
    }

    /// Catalog entry for this kind
    pub fn seed(&self) -> &'static CalculationTypeSeed {
        match self {
            CalculationKind::EmergencyExits => &CALCULATION_TYPES[0],
            CalculationKind::FireExtinguishers => &CALCULATION_TYPES[1],
            CalculationKind::Capacity => &CALCULATION_TYPES[2],
            CalculationKind::EvacuationRoutes => &CALCULATION_TYPES[3],
        }
    }
}

impl std::fmt::Display for CalculationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// A nationwide default parameter row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterDefault {
    pub key: &'static str,
    pub value: &'static str,
    pub value_type: ValueType,
    pub unit: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationTypeSeed {
    pub kind: CalculationKind,
    pub name: &'static str,
    pub description: &'static str,
    pub formula: &'static str,
    pub icon: &'static str,
    pub sort_order: i64,
    pub parameters: &'static [ParameterDefault],
}

impl CalculationTypeSeed {
    /// Build the stored record; the id equals the sort order
    pub fn to_record(&self) -> CalculationType {
        CalculationType {
            id: self.sort_order,
            slug: self.kind.slug().to_string(),
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            formula: Some(self.formula.to_string()),
            icon: Some(self.icon.to_string()),
            sort_order: self.sort_order,
        }
    }
}

const fn float(
    key: &'static str,
    value: &'static str,
    unit: &'static str,
    description: &'static str,
) -> ParameterDefault {
    ParameterDefault {
        key,
        value,
        value_type: ValueType::Float,
        unit,
        description,
    }
}

pub const CALCULATION_TYPES: [CalculationTypeSeed; 4] = [
    CalculationTypeSeed {
        kind: CalculationKind::EmergencyExits,
        name: "Notausgänge berechnen",
        description: "Berechnet die erforderliche Anzahl und Breite der Notausgänge basierend auf Personenzahl und Fläche.",
        formula: "VKF Brandschutzrichtlinie 16-15: Ausgangsbreite = Personenzahl / 100 × 0.6m. Mindestens 2 Ausgänge.",
        icon: "log-out",
        sort_order: 1,
        parameters: &[
            float("sqm_per_person", "1", "m²/Person", "Fläche pro Person (stehend)"),
            float("exit_width_per_100_persons", "0.6", "m", "Ausgangsbreite pro 100 Personen"),
            float("min_exit_width", "0.9", "m", "Mindestbreite eines Ausgangs"),
            ParameterDefault {
                key: "min_exits",
                value: "2",
                value_type: ValueType::Int,
                unit: "Stück",
                description: "Mindestanzahl Ausgänge",
            },
        ],
    },
    CalculationTypeSeed {
        kind: CalculationKind::FireExtinguishers,
        name: "Feuerlöscher berechnen",
        description: "Berechnet die erforderliche Anzahl an Feuerlöschern nach Fläche und Risikokategorie.",
        formula: "VKF BSV 2015: Löschmitteleinheiten basierend auf Fläche und Gefährdungskategorie.",
        icon: "shield",
        sort_order: 2,
        parameters: &[
            float("coverage_per_unit_low", "300", "m²", "Abdeckung pro Löscher (geringe Gefährdung)"),
            float("coverage_per_unit_medium", "200", "m²", "Abdeckung pro Löscher (mittlere Gefährdung)"),
            float("coverage_per_unit_high", "100", "m²", "Abdeckung pro Löscher (hohe Gefährdung)"),
        ],
    },
    CalculationTypeSeed {
        kind: CalculationKind::Capacity,
        name: "Kapazität berechnen",
        description: "Berechnet die maximale Personenkapazität basierend auf Fläche, Veranstaltungsart und Ausgängen.",
        formula: "Stehend: 1 Person/m². Sitzend: 1 Person/2m². Gemischt: 1 Person/1.5m². Limitiert durch Ausgänge.",
        icon: "users",
        sort_order: 3,
        parameters: &[
            float("sqm_per_person_standing", "1", "m²/Person", "Fläche pro Person (stehend)"),
            float("sqm_per_person_seated", "2", "m²/Person", "Fläche pro Person (sitzend)"),
            float("sqm_per_person_mixed", "1.5", "m²/Person", "Fläche pro Person (gemischt)"),
            float("persons_per_m_exit_width", "166", "Personen/m", "Personen pro Meter Ausgangsbreite"),
        ],
    },
    CalculationTypeSeed {
        kind: CalculationKind::EvacuationRoutes,
        name: "Fluchtwege berechnen",
        description: "Berechnet erforderliche Fluchtwegbreiten und prüft Evakuierungszeiten.",
        formula: "VKF: Max. Fluchtweg 35m. Fluchtwegbreite mind. 1.2m. Beleuchtete Rettungszeichen alle 15m.",
        icon: "arrow-right-circle",
        sort_order: 4,
        parameters: &[
            float("max_distance_to_exit", "35", "m", "Maximaler Fluchtweg zum nächsten Ausgang"),
            float("min_route_width", "1.2", "m", "Mindestbreite Fluchtweg"),
            float("route_width_per_100_persons", "0.6", "m", "Fluchtwegbreite pro 100 Personen"),
            float("max_evacuation_time_sec", "180", "Sekunden", "Maximale Evakuierungszeit"),
        ],
    },
];
