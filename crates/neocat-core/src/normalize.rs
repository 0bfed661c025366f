//! Record normalizer: one loosely-typed raw record in, one canonical flat
//! row (or a validation rejection) out. Pure function of its input.

use serde_json::Value;

use crate::error::ValidationError;
use crate::page::RawRecord;
use crate::record::NeoRecord;

/// Non-fatal oddities found while normalizing a record. Surfaced through
/// logs, never grounds for rejection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizeWarning {
    /// Upstream reported min > max; values were swapped.
    SwappedDiameters,
    /// Eccentricity outside [0, 1): hyperbolic orbits are physically valid
    /// but rare enough to surface.
    SuspectEccentricity { value: f64 },
}

/// A normalized record plus whatever was tolerated along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub record: NeoRecord,
    pub warnings: Vec<NormalizeWarning>,
}

/// Maps one raw API record into the canonical flat schema.
///
/// `id` and `name` are required; every other field degrades to `None` when
/// absent or unparsable. Numeric fields accept numeric-looking strings, which
/// is how the NeoWs API ships its orbital data.
pub fn normalize(raw: &RawRecord) -> Result<NormalizedRecord, ValidationError> {
    let id = required_string(raw, "id")?;
    let name = required_string(raw, "name")?;

    let mut warnings = Vec::new();

    let kilometers = &raw["estimated_diameter"]["kilometers"];
    let mut diameter_min_km = optional_number(&kilometers["estimated_diameter_min"]);
    let mut diameter_max_km = optional_number(&kilometers["estimated_diameter_max"]);
    if let (Some(min), Some(max)) = (diameter_min_km, diameter_max_km) {
        if min > max {
            diameter_min_km = Some(max);
            diameter_max_km = Some(min);
            warnings.push(NormalizeWarning::SwappedDiameters);
        }
    }
    let diameter_avg_km = match (diameter_min_km, diameter_max_km) {
        (Some(min), Some(max)) => Some((min + max) / 2.0),
        _ => None,
    };

    let orbital = &raw["orbital_data"];
    let eccentricity = optional_number(&orbital["eccentricity"]);
    if let Some(value) = eccentricity {
        if !(0.0..1.0).contains(&value) {
            warnings.push(NormalizeWarning::SuspectEccentricity { value });
        }
    }

    let record = NeoRecord {
        id,
        name,
        absolute_magnitude: optional_number(&raw["absolute_magnitude_h"]),
        diameter_min_km,
        diameter_max_km,
        diameter_avg_km,
        is_hazardous: raw["is_potentially_hazardous_asteroid"]
            .as_bool()
            .unwrap_or(false),
        orbit_id: optional_string(&orbital["orbit_id"]),
        semi_major_axis: optional_number(&orbital["semi_major_axis"]),
        eccentricity,
    };

    Ok(NormalizedRecord { record, warnings })
}

fn required_string(raw: &Value, field: &'static str) -> Result<String, ValidationError> {
    match &raw[field] {
        Value::String(s) if !s.trim().is_empty() => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null | Value::String(_) => Err(ValidationError::MissingField { field }),
        other => Err(ValidationError::InvalidField {
            field,
            value: other.to_string(),
        }),
    }
}

fn optional_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn optional_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|parsed| parsed.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_record() -> RawRecord {
        json!({
            "id": "2021277",
            "name": "21277 (1996 TO5)",
            "absolute_magnitude_h": 16.1,
            "estimated_diameter": {
                "kilometers": {
                    "estimated_diameter_min": 1.6016033798,
                    "estimated_diameter_max": 3.5812940302
                },
                "meters": {
                    "estimated_diameter_min": 1601.6033797856,
                    "estimated_diameter_max": 3581.2940301941
                }
            },
            "is_potentially_hazardous_asteroid": false,
            "orbital_data": {
                "orbit_id": "611",
                "semi_major_axis": "2.377878220119007",
                "eccentricity": ".5206608773953545"
            }
        })
    }

    #[test]
    fn maps_a_full_record_into_the_flat_schema() {
        let normalized = normalize(&full_record()).expect("valid record");
        let record = &normalized.record;

        assert_eq!(record.id, "2021277");
        assert_eq!(record.name, "21277 (1996 TO5)");
        assert_eq!(record.absolute_magnitude, Some(16.1));
        assert_eq!(record.orbit_id.as_deref(), Some("611"));
        assert_eq!(record.semi_major_axis, Some(2.377878220119007));
        assert_eq!(record.eccentricity, Some(0.5206608773953545));
        assert!(!record.is_hazardous);
        assert!(normalized.warnings.is_empty());
    }

    #[test]
    fn average_diameter_is_the_mean_of_min_and_max() {
        let normalized = normalize(&full_record()).expect("valid record");
        let record = &normalized.record;

        let (min, max) = (
            record.diameter_min_km.expect("min"),
            record.diameter_max_km.expect("max"),
        );
        assert!(min <= max);
        assert_eq!(record.diameter_avg_km, Some((min + max) / 2.0));
    }

    #[test]
    fn missing_id_rejects_the_record() {
        let raw = json!({"name": "Duende"});
        let error = normalize(&raw).expect_err("no id");
        assert_eq!(error, ValidationError::MissingField { field: "id" });
    }

    #[test]
    fn empty_name_rejects_the_record() {
        let raw = json!({"id": "3", "name": "   "});
        let error = normalize(&raw).expect_err("blank name");
        assert_eq!(error, ValidationError::MissingField { field: "name" });
    }

    #[test]
    fn structured_id_rejects_the_record() {
        let raw = json!({"id": {"inner": 1}, "name": "Apophis"});
        let error = normalize(&raw).expect_err("non-scalar id");
        assert_eq!(error.field(), "id");
    }

    #[test]
    fn numeric_id_is_stringified() {
        let raw = json!({"id": 2099942, "name": "Apophis"});
        let normalized = normalize(&raw).expect("numeric id is acceptable");
        assert_eq!(normalized.record.id, "2099942");
    }

    #[test]
    fn unparsable_optional_numerics_become_null() {
        let raw = json!({
            "id": "1",
            "name": "x",
            "absolute_magnitude_h": "unknown",
            "orbital_data": {"semi_major_axis": "n/a", "eccentricity": {}}
        });

        let normalized = normalize(&raw).expect("record survives bad optionals");
        assert_eq!(normalized.record.absolute_magnitude, None);
        assert_eq!(normalized.record.semi_major_axis, None);
        assert_eq!(normalized.record.eccentricity, None);
        assert_eq!(normalized.record.diameter_avg_km, None);
    }

    #[test]
    fn inverted_diameters_are_swapped_and_flagged() {
        let raw = json!({
            "id": "1",
            "name": "x",
            "estimated_diameter": {
                "kilometers": {"estimated_diameter_min": 3.0, "estimated_diameter_max": 1.0}
            }
        });

        let normalized = normalize(&raw).expect("swap, do not reject");
        assert_eq!(normalized.record.diameter_min_km, Some(1.0));
        assert_eq!(normalized.record.diameter_max_km, Some(3.0));
        assert_eq!(normalized.record.diameter_avg_km, Some(2.0));
        assert!(normalized
            .warnings
            .contains(&NormalizeWarning::SwappedDiameters));
    }

    #[test]
    fn hyperbolic_eccentricity_is_kept_but_flagged() {
        let raw = json!({
            "id": "1",
            "name": "Oumuamua-like",
            "orbital_data": {"eccentricity": "1.2"}
        });

        let normalized = normalize(&raw).expect("suspect, not invalid");
        assert_eq!(normalized.record.eccentricity, Some(1.2));
        assert_eq!(
            normalized.warnings,
            vec![NormalizeWarning::SuspectEccentricity { value: 1.2 }]
        );
    }

    #[test]
    fn single_diameter_bound_leaves_the_average_unset() {
        let raw = json!({
            "id": "1",
            "name": "x",
            "estimated_diameter": {"kilometers": {"estimated_diameter_min": 0.5}}
        });

        let normalized = normalize(&raw).expect("valid record");
        assert_eq!(normalized.record.diameter_min_km, Some(0.5));
        assert_eq!(normalized.record.diameter_max_km, None);
        assert_eq!(normalized.record.diameter_avg_km, None);
    }

    #[test]
    fn normalize_is_idempotent_over_the_same_input() {
        let raw = full_record();
        assert_eq!(
            normalize(&raw).expect("first"),
            normalize(&raw).expect("second")
        );
    }
}
