// Numeric extraction from calculator inputs and stored parameter values
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{InputValue, Inputs};

lazy_static! {
    /// A complete decimal literal, e.g. "12", "-0.5", ".5", "1e3"
    static ref DECIMAL: Regex =
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").unwrap();

    /// Leading decimal literal of a longer string, e.g. "1.5" in "1.5m"
    static ref DECIMAL_PREFIX: Regex =
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").unwrap();

    /// Leading integer literal, e.g. "2" in "2.7"
    static ref INTEGER_PREFIX: Regex = Regex::new(r"^[+-]?\d+").unwrap();
}

/// Numeric value of a raw input.
///
/// Numbers pass through. Strings are trimmed and must be a complete decimal
/// literal; an empty string counts as 0. Returns `None` for anything else.
pub fn to_number(value: &InputValue) -> Option<f64> {
    match value {
        InputValue::Number(n) if n.is_nan() => None,
        InputValue::Number(n) => Some(*n),
        InputValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else if DECIMAL.is_match(trimmed) {
                trimmed.parse().ok()
            } else {
                None
            }
        }
    }
}

/// Numeric input with a per-input default.
///
/// Missing, non-numeric and zero values all yield `default`. Inputs are not
/// validated beyond this coercion, so `"abc"` is indistinguishable from an
/// omitted field.
pub fn number_or(inputs: &Inputs, key: &str, default: f64) -> f64 {
    inputs
        .get(key)
        .and_then(to_number)
        .filter(|n| *n != 0.0)
        .unwrap_or(default)
}

/// Text input with a default for missing, empty or zero values.
/// Numbers are rendered the way they would be printed ("5", "1.5").
pub fn text_or(inputs: &Inputs, key: &str, default: &str) -> String {
    match inputs.get(key) {
        Some(InputValue::Text(s)) if !s.is_empty() => s.clone(),
        Some(InputValue::Number(n)) if *n != 0.0 && !n.is_nan() => n.to_string(),
        _ => default.to_string(),
    }
}

/// Leading decimal number of a stored value ("1.5m" -> 1.5)
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    DECIMAL_PREFIX
        .find(s.trim_start())
        .and_then(|m| m.as_str().parse().ok())
}

/// Leading integer of a stored value ("2.7" -> 2)
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    INTEGER_PREFIX
        .find(s.trim_start())
        .and_then(|m| m.as_str().parse().ok())
}

/// Round half up to the nearest integer (2.5 -> 3, -2.5 -> -2)
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round half up to two decimals
pub fn round2(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(pairs: &[(&str, InputValue)]) -> Inputs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(&InputValue::Number(12.5)), Some(12.5));
        assert_eq!(to_number(&"42".into()), Some(42.0));
        assert_eq!(to_number(&" 42 ".into()), Some(42.0));
        assert_eq!(to_number(&".5".into()), Some(0.5));
        assert_eq!(to_number(&"1e3".into()), Some(1000.0));
        assert_eq!(to_number(&"".into()), Some(0.0));
        assert_eq!(to_number(&"12px".into()), None);
        assert_eq!(to_number(&"abc".into()), None);
        assert_eq!(to_number(&"inf".into()), None);
    }

    #[test]
    fn test_number_or_falls_back_on_missing_zero_and_garbage() {
        let values = inputs(&[
            ("floors", InputValue::Number(0.0)),
            ("exitCount", "many".into()),
            ("personCount", "300".into()),
        ]);
        assert_eq!(number_or(&values, "floors", 1.0), 1.0);
        assert_eq!(number_or(&values, "exitCount", 2.0), 2.0);
        assert_eq!(number_or(&values, "personCount", 0.0), 300.0);
        assert_eq!(number_or(&values, "distanceToExitM", 0.0), 0.0);
    }

    #[test]
    fn test_text_or() {
        let values = inputs(&[
            ("riskCategory", "high".into()),
            ("eventType", "".into()),
            ("code", InputValue::Number(5.0)),
            ("zero", InputValue::Number(0.0)),
        ]);
        assert_eq!(text_or(&values, "riskCategory", "medium"), "high");
        assert_eq!(text_or(&values, "eventType", "standing"), "standing");
        assert_eq!(text_or(&values, "code", "x"), "5");
        assert_eq!(text_or(&values, "zero", "medium"), "medium");
        assert_eq!(text_or(&values, "missing", "medium"), "medium");
    }

    #[test]
    fn test_parse_prefixes() {
        assert_eq!(parse_float_prefix("0.6"), Some(0.6));
        assert_eq!(parse_float_prefix(" 1.5m"), Some(1.5));
        assert_eq!(parse_float_prefix("166 Personen"), Some(166.0));
        assert_eq!(parse_float_prefix("m1"), None);
        assert_eq!(parse_int_prefix("2"), Some(2));
        assert_eq!(parse_int_prefix("2.7"), Some(2));
        assert_eq!(parse_int_prefix("-3x"), Some(-3));
        assert_eq!(parse_int_prefix("x3"), None);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_half_up(55.8333), 56.0);
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round2(1.8), 1.8);
        assert_eq!(round2(2.345678), 2.35);
        assert_eq!(round2(1.004), 1.0);
        assert_eq!(round2(3.0), 3.0);
    }
}
