//! Canton reference data
//!
//! The 26 Swiss cantons are the scoping dimension for calculation
//! parameters: a parameter row either belongs to one canton or is the
//! nationwide default.

use serde::{Deserialize, Serialize};
use shared_types::{Canton, CantonLanguage};

/// Canton codes in official (seed) order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CantonCode {
    ZH,
    BE,
    LU,
    UR,
    SZ,
    OW,
    NW,
    GL,
    ZG,
    FR,
    SO,
    BS,
    BL,
    SH,
    AR,
    AI,
    SG,
    GR,
    AG,
    TG,
    TI,
    VD,
    VS,
    NE,
    GE,
    JU,
}

const ALL_CANTONS: [CantonCode; 26] = [
    CantonCode::ZH,
    CantonCode::BE,
    CantonCode::LU,
    CantonCode::UR,
    CantonCode::SZ,
    CantonCode::OW,
    CantonCode::NW,
    CantonCode::GL,
    CantonCode::ZG,
    CantonCode::FR,
    CantonCode::SO,
    CantonCode::BS,
    CantonCode::BL,
    CantonCode::SH,
    CantonCode::AR,
    CantonCode::AI,
    CantonCode::SG,
    CantonCode::GR,
    CantonCode::AG,
    CantonCode::TG,
    CantonCode::TI,
    CantonCode::VD,
    CantonCode::VS,
    CantonCode::NE,
    CantonCode::GE,
    CantonCode::JU,
];

impl CantonCode {
    /// All cantons in sort order
    pub fn all() -> &'static [CantonCode] {
        &ALL_CANTONS
    }

    /// German short name
    pub fn name(&self) -> &'static str {
        match self {
            CantonCode::ZH => "Zürich",
            CantonCode::BE => "Bern",
            CantonCode::LU => "Luzern",
            CantonCode::UR => "Uri",
            CantonCode::SZ => "Schwyz",
            CantonCode::OW => "Obwalden",
            CantonCode::NW => "Nidwalden",
            CantonCode::GL => "Glarus",
            CantonCode::ZG => "Zug",
            CantonCode::FR => "Freiburg",
            CantonCode::SO => "Solothurn",
            CantonCode::BS => "Basel-Stadt",
            CantonCode::BL => "Basel-Landschaft",
            CantonCode::SH => "Schaffhausen",
            CantonCode::AR => "Appenzell Ausserrhoden",
            CantonCode::AI => "Appenzell Innerrhoden",
            CantonCode::SG => "St. Gallen",
            CantonCode::GR => "Graubünden",
            CantonCode::AG => "Aargau",
            CantonCode::TG => "Thurgau",
            CantonCode::TI => "Tessin",
            CantonCode::VD => "Waadt",
            CantonCode::VS => "Wallis",
            CantonCode::NE => "Neuenburg",
            CantonCode::GE => "Genf",
            CantonCode::JU => "Jura",
        }
    }

    pub fn official_name(&self) -> String {
        format!("Kanton {}", self.name())
    }

    /// Primary official language
    pub fn language(&self) -> CantonLanguage {
        match self {
            CantonCode::FR | CantonCode::VD | CantonCode::NE | CantonCode::GE | CantonCode::JU => {
                CantonLanguage::Fr
            }
            CantonCode::TI => CantonLanguage::It,
            _ => CantonLanguage::De,
        }
    }

    /// 1-based position in the official order; doubles as the seeded row id
    pub fn sort_order(&self) -> i64 {
        ALL_CANTONS
            .iter()
            .position(|c| c == self)
            .map(|i| i as i64 + 1)
            .unwrap_or(0)
    }

    /// Two-letter canton code, case-insensitive
    pub fn from_code(s: &str) -> Option<Self> {
        let needle = s.trim().to_uppercase();
        ALL_CANTONS.iter().copied().find(|c| c.as_str() == needle)
    }

    /// Parse from canton code or German short name (case-insensitive)
    pub fn parse_code(s: &str) -> Option<Self> {
        Self::from_code(s).or_else(|| {
            let needle = s.trim().to_uppercase();
            ALL_CANTONS
                .iter()
                .copied()
                .find(|c| c.name().to_uppercase() == needle)
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CantonCode::ZH => "ZH",
            CantonCode::BE => "BE",
            CantonCode::LU => "LU",
            CantonCode::UR => "UR",
            CantonCode::SZ => "SZ",
            CantonCode::OW => "OW",
            CantonCode::NW => "NW",
            CantonCode::GL => "GL",
            CantonCode::ZG => "ZG",
            CantonCode::FR => "FR",
            CantonCode::SO => "SO",
            CantonCode::BS => "BS",
            CantonCode::BL => "BL",
            CantonCode::SH => "SH",
            CantonCode::AR => "AR",
            CantonCode::AI => "AI",
            CantonCode::SG => "SG",
            CantonCode::GR => "GR",
            CantonCode::AG => "AG",
            CantonCode::TG => "TG",
            CantonCode::TI => "TI",
            CantonCode::VD => "VD",
            CantonCode::VS => "VS",
            CantonCode::NE => "NE",
            CantonCode::GE => "GE",
            CantonCode::JU => "JU",
        }
    }

    /// Build the stored record; the id equals the sort order
    pub fn to_record(&self) -> Canton {
        Canton {
            id: self.sort_order(),
            code: self.as_str().to_string(),
            name: self.name().to_string(),
            name_official: self.official_name(),
            language: self.language(),
            sort_order: self.sort_order(),
        }
    }
}

impl std::fmt::Display for CantonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
