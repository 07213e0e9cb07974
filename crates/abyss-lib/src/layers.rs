//! Typed records for the dense cell layer and the sparse overlay layers.
//!
//! Numeric fields have already passed through [`safe_float`] by the time a
//! record exists, so scoring code never has to handle parse failures.

use serde::Serialize;

/// Dense base record: exactly one per valid coordinate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cell {
    pub depth_m: f64,
    pub biome: String,
    pub temperature_c: f64,
}

/// Hazard overlay. Severity is nominally in `[0, 1]` but is never clamped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Hazard {
    pub kind: String,
    pub severity: f64,
}

/// Water current overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Current {
    pub speed_mps: f64,
    /// 1.0 is fully stable.
    pub stability: f64,
}

impl Default for Current {
    /// Calm water: no speed, fully stable.
    fn default() -> Self {
        Self {
            speed_mps: 0.0,
            stability: 1.0,
        }
    }
}

/// Coral reef overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Coral {
    pub cover_pct: f64,
    pub health_index: f64,
    pub biodiversity_index: f64,
}

/// Extractable resource deposit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resource {
    /// Resource family or type label; narrative only.
    pub family: String,
    pub abundance: f64,
    pub economic_value: f64,
    pub purity: f64,
    pub extraction_difficulty: f64,
    pub environmental_impact: f64,
}

/// Biological observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Life {
    pub species: String,
    pub density: f64,
    pub threat_level: f64,
}

/// Point of interest. Carried for explanations, never scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Poi {
    pub label: String,
    pub description: String,
}

/// Coerce a raw field into a finite float, substituting `0.0` for blank,
/// unparseable, or non-finite values.
pub fn safe_float(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_float_accepts_plain_numbers() {
        assert_eq!(safe_float("0.75"), 0.75);
        assert_eq!(safe_float(" 4200 "), 4200.0);
        assert_eq!(safe_float("-1.5"), -1.5);
    }

    #[test]
    fn safe_float_substitutes_zero_for_garbage() {
        assert_eq!(safe_float(""), 0.0);
        assert_eq!(safe_float("n/a"), 0.0);
        assert_eq!(safe_float("NaN"), 0.0);
        assert_eq!(safe_float("inf"), 0.0);
    }

    #[test]
    fn default_current_is_calm() {
        let current = Current::default();
        assert_eq!(current.speed_mps, 0.0);
        assert_eq!(current.stability, 1.0);
    }
}
