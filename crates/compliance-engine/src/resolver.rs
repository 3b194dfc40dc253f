//! Parameter resolution
//!
//! Layers are applied bottom to top:
//! 1. Compiled-in fallback - the constant each rule passes to `float_or`/`int_or`
//! 2. Nationwide default - stored rows with no canton
//! 3. Canton override - stored rows for the requested canton
//!
//! Resolution runs fresh for every calculation; nothing is cached.

use std::collections::BTreeMap;

use shared_types::{CalculationParameter, CalculationType, Canton};
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::extractors::numeric::{parse_float_prefix, parse_int_prefix};
use crate::store::ParameterStore;

/// The effective parameter set for one calculation request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedParameters {
    rows: BTreeMap<String, CalculationParameter>,
}

impl ResolvedParameters {
    /// The winning row for `key`
    pub fn get(&self, key: &str) -> Option<&CalculationParameter> {
        self.rows.get(key)
    }

    /// Raw stored value for `key`
    pub fn value(&self, key: &str) -> Option<&str> {
        self.rows.get(key).map(|p| p.parameter_value.as_str())
    }

    /// Flat `key -> value` map as returned to clients
    pub fn value_map(&self) -> BTreeMap<String, String> {
        self.rows
            .iter()
            .map(|(k, p)| (k.clone(), p.parameter_value.clone()))
            .collect()
    }

    /// Winning rows ordered by key
    pub fn rows(&self) -> impl Iterator<Item = &CalculationParameter> {
        self.rows.values()
    }

    pub fn into_rows(self) -> Vec<CalculationParameter> {
        self.rows.into_values().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Decimal value of `key`, or `fallback` when the key is absent or empty
    pub fn float_or(&self, key: &str, fallback: f64) -> f64 {
        self.numeric(key, fallback, parse_float_prefix)
    }

    /// Integer value of `key` (fraction truncated), or `fallback`
    pub fn int_or(&self, key: &str, fallback: i64) -> i64 {
        self.numeric(key, fallback, parse_int_prefix)
    }

    fn numeric<T: Copy + std::fmt::Display>(
        &self,
        key: &str,
        fallback: T,
        parse: impl Fn(&str) -> Option<T>,
    ) -> T {
        match self.value(key) {
            None | Some("") => fallback,
            Some(raw) => parse(raw).unwrap_or_else(|| {
                warn!(
                    "Parameter {} has non-numeric value {:?}, using {}",
                    key, raw, fallback
                );
                fallback
            }),
        }
    }
}

impl FromIterator<CalculationParameter> for ResolvedParameters {
    fn from_iter<I: IntoIterator<Item = CalculationParameter>>(iter: I) -> Self {
        merge_parameters(iter)
    }
}

/// Merge default and canton rows, canton taking precedence.
///
/// Rows may arrive in any order. For each key the first row seen is kept
/// until a canton-specific row replaces it; among canton-specific rows the
/// last one wins. Default rows never replace an existing entry.
pub fn merge_parameters<I>(rows: I) -> ResolvedParameters
where
    I: IntoIterator<Item = CalculationParameter>,
{
    let mut merged: BTreeMap<String, CalculationParameter> = BTreeMap::new();

    for row in rows {
        if row.is_canton_specific() || !merged.contains_key(&row.parameter_key) {
            merged.insert(row.parameter_key.clone(), row);
        }
    }

    ResolvedParameters { rows: merged }
}

/// Outcome of resolving a calculation type for an optional canton
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub calculation_type: CalculationType,
    /// `None` if no canton was requested or the code is unknown
    pub canton: Option<Canton>,
    pub parameters: ResolvedParameters,
}

impl Resolution {
    /// Merge the fetched default and canton `rows` of `calculation_type`
    pub fn from_rows<I>(calculation_type: CalculationType, canton: Option<Canton>, rows: I) -> Self
    where
        I: IntoIterator<Item = CalculationParameter>,
    {
        let parameters = merge_parameters(rows);

        debug!(
            "Resolved {} parameters for {} (canton: {})",
            parameters.len(),
            calculation_type.slug,
            canton.as_ref().map(|c| c.code.as_str()).unwrap_or("-")
        );

        Self {
            calculation_type,
            canton,
            parameters,
        }
    }
}

/// Lookup result for a requested canton code.
///
/// An unknown code is not an error; the caller falls back to nationwide
/// defaults.
pub fn canton_or_defaults(code: &str, found: Option<Canton>) -> Option<Canton> {
    if found.is_none() {
        debug!("Unknown canton code {:?}, using nationwide defaults", code);
    }
    found
}

/// Resolve the effective parameters of `slug` for `canton_code`.
///
/// Fails with `NotFound` for an unknown calculation type. An unknown canton
/// code is not an error: resolution proceeds with nationwide defaults only.
pub fn resolve<S>(store: &S, slug: &str, canton_code: Option<&str>) -> Result<Resolution>
where
    S: ParameterStore + ?Sized,
{
    let calculation_type = store
        .find_calculation_type(slug)
        .ok_or_else(|| EngineError::calculation_type_not_found(slug))?;

    let canton = canton_code
        .filter(|code| !code.is_empty())
        .and_then(|code| canton_or_defaults(code, store.find_canton(code)));

    let rows = store.parameters_for(calculation_type.id, canton.as_ref().map(|c| c.id));
    Ok(Resolution::from_rows(calculation_type, canton, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, ParameterUpsert};
    use pretty_assertions::assert_eq;
    use shared_types::ValueType;

    fn row(id: i64, canton_id: Option<i64>, key: &str, value: &str) -> CalculationParameter {
        CalculationParameter {
            id,
            calculation_type_id: 1,
            canton_id,
            parameter_key: key.to_string(),
            parameter_value: value.to_string(),
            value_type: ValueType::Float,
            unit: None,
            description: None,
        }
    }

    #[test]
    fn test_canton_row_wins_regardless_of_order() {
        let default = row(1, None, "min_exit_width", "0.9");
        let canton = row(2, Some(1), "min_exit_width", "1.2");

        let forward = merge_parameters(vec![default.clone(), canton.clone()]);
        let backward = merge_parameters(vec![canton, default]);

        assert_eq!(forward.value("min_exit_width"), Some("1.2"));
        assert_eq!(backward.value("min_exit_width"), Some("1.2"));
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_default_used_without_override() {
        let merged = merge_parameters(vec![
            row(1, None, "min_exits", "2"),
            row(2, Some(1), "min_exit_width", "1.2"),
        ]);
        assert_eq!(merged.value("min_exits"), Some("2"));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_last_canton_row_wins_among_duplicates() {
        let merged = merge_parameters(vec![
            row(1, Some(1), "min_exits", "3"),
            row(2, Some(1), "min_exits", "4"),
        ]);
        assert_eq!(merged.get("min_exits").map(|p| p.id), Some(2));
    }

    #[test]
    fn test_value_map() {
        let merged: ResolvedParameters = vec![
            row(1, None, "a", "1"),
            row(2, None, "b", "2"),
        ]
        .into_iter()
        .collect();

        let expected: BTreeMap<String, String> = [("a", "1"), ("b", "2")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(merged.value_map(), expected);
    }

    #[test]
    fn test_typed_accessors() {
        let merged = merge_parameters(vec![
            row(1, None, "min_exits", "2.9"),
            row(2, None, "sqm_per_person", "1.5m"),
            row(3, None, "empty", ""),
            row(4, None, "garbage", "n/a"),
        ]);
        assert_eq!(merged.int_or("min_exits", 2), 2);
        assert_eq!(merged.float_or("sqm_per_person", 1.0), 1.5);
        assert_eq!(merged.float_or("empty", 7.0), 7.0);
        assert_eq!(merged.float_or("garbage", 7.0), 7.0);
        assert_eq!(merged.float_or("missing", 0.6), 0.6);
    }

    #[test]
    fn test_resolve_unknown_type_is_not_found() {
        let store = InMemoryStore::seeded();
        let err = resolve(&store, "structural-safety", None).unwrap_err();
        assert_eq!(err, EngineError::calculation_type_not_found("structural-safety"));
    }

    #[test]
    fn test_resolve_unknown_canton_uses_defaults() {
        let store = InMemoryStore::seeded();
        let resolution = resolve(&store, "emergency-exits", Some("XX")).unwrap();
        assert!(resolution.canton.is_none());
        assert_eq!(resolution.parameters.len(), 4);
        assert!(resolution.parameters.rows().all(|p| p.canton_id.is_none()));
    }

    #[test]
    fn test_resolve_applies_canton_override() {
        let store = InMemoryStore::seeded();
        store
            .upsert_parameter(ParameterUpsert {
                calculation_type_id: 4,
                canton_id: Some(1),
                parameter_key: "max_distance_to_exit".to_string(),
                parameter_value: "30".to_string(),
                value_type: ValueType::Float,
                unit: Some("m".to_string()),
                description: None,
            })
            .unwrap();

        let zurich = resolve(&store, "evacuation-routes", Some("zh")).unwrap();
        assert_eq!(zurich.canton.map(|c| c.code), Some("ZH".to_string()));
        assert_eq!(zurich.parameters.value("max_distance_to_exit"), Some("30"));

        let bern = resolve(&store, "evacuation-routes", Some("BE")).unwrap();
        assert_eq!(bern.parameters.value("max_distance_to_exit"), Some("35"));
    }

    #[test]
    fn test_resolve_empty_canton_code_is_nationwide() {
        let store = InMemoryStore::seeded();
        let resolution = resolve(&store, "capacity", Some("")).unwrap();
        assert!(resolution.canton.is_none());
        assert_eq!(resolution, resolve(&store, "capacity", None).unwrap());
    }

    #[test]
    fn test_resolution_from_rows_merges() {
        let store = InMemoryStore::seeded();
        let capacity = store.find_calculation_type("capacity").unwrap();
        let zurich = store.find_canton("ZH");

        let resolution = Resolution::from_rows(
            capacity.clone(),
            zurich.clone(),
            vec![
                row(2, Some(1), "sqm_per_person", "2"),
                row(1, None, "sqm_per_person", "1"),
                row(3, None, "max_occupancy_factor", "0.9"),
            ],
        );

        assert_eq!(resolution.calculation_type, capacity);
        assert_eq!(resolution.canton, zurich);
        assert_eq!(resolution.parameters.value("sqm_per_person"), Some("2"));
        assert_eq!(resolution.parameters.len(), 2);
    }

    #[test]
    fn test_canton_or_defaults_passes_lookup_through() {
        let store = InMemoryStore::seeded();
        assert_eq!(canton_or_defaults("XX", store.find_canton("XX")), None);
        assert_eq!(
            canton_or_defaults("ti", store.find_canton("ti")).map(|c| c.code),
            Some("TI".to_string())
        );
    }
}
