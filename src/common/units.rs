// src/common/units.rs

//! Unit-code resolution for measurement fields.
//!
//! Each measurement value on the wire ends in a single unit character whose
//! meaning depends on the field label (`M` is m/s for wind speed but mmHg
//! for pressure). The table is chosen from the label, then the code is
//! looked up in it.

use alloc::string::String;

use super::error::CodecError;
use super::response::MeasurementValue;

type UnitTable = &'static [(char, &'static str)];

/// Unit reported for a field the sensor marked as unavailable.
pub const INVALID_UNIT: &str = "invalid";
/// Unit code the sensor uses to mark a field as unavailable.
pub const INVALID_CODE: char = '#';

const TEMPERATURE: UnitTable = &[('C', "C"), ('F', "F")];
const SPEED: UnitTable = &[('M', "m/s"), ('K', "km/h"), ('S', "mph"), ('N', "kn")];
const DIRECTION: UnitTable = &[('D', "deg")];
const PRESSURE: UnitTable = &[('H', "hPa"), ('P', "Pa"), ('B', "bar"), ('M', "mmHg"), ('I', "inHg")];
const HUMIDITY: UnitTable = &[('P', "%")];
const RAIN_ACCUMULATION: UnitTable = &[('M', "mm"), ('I', "in")];
// The vendor manual documents both cases for seconds; firmware intent unknown
const DURATION: UnitTable = &[('S', "s"), ('s', "s")];
const RAIN_INTENSITY: UnitTable = &[('M', "mm/h"), ('I', "in/h")];
const HAIL_ACCUMULATION: UnitTable = &[('M', "hits/cm2"), ('I', "hits/in2"), ('H', "hits")];
const HAIL_INTENSITY: UnitTable = &[('M', "hits/cm2h"), ('I', "hits/in2h"), ('H', "hits/h")];
const VOLTAGE: UnitTable = &[('V', "V")];
const HEATING_STATUS: UnitTable = &[
    ('N', "0% hi-"),
    ('V', "50% mid-hi"),
    ('W', "100% lo-mid"),
    ('F', "50% -lo"),
];

/// Selects the unit table for a label.
///
/// Exact labels win over first-character families, which win over the
/// duration suffix. `Id` must be handled before this is reached.
fn table_for(label: &str) -> Option<UnitTable> {
    let exact = match label {
        "Pa" => Some(PRESSURE),
        "Ua" => Some(HUMIDITY),
        "Ri" | "Rp" => Some(RAIN_INTENSITY),
        "Rc" => Some(RAIN_ACCUMULATION),
        "Hi" | "Hp" => Some(HAIL_INTENSITY),
        "Hc" => Some(HAIL_ACCUMULATION),
        "Vh" => Some(HEATING_STATUS),
        _ => None,
    };
    if exact.is_some() {
        return exact;
    }
    let by_family = match label.chars().next()? {
        'T' => Some(TEMPERATURE),
        'S' => Some(SPEED),
        'D' => Some(DIRECTION),
        'V' => Some(VOLTAGE),
        _ => None,
    };
    if by_family.is_some() {
        return by_family;
    }
    if label.ends_with('d') {
        return Some(DURATION);
    }
    None
}

/// Resolves a unit code for `label` to its display string.
pub fn lookup_unit(label: &str, code: char) -> Result<&'static str, CodecError> {
    let found = table_for(label)
        .and_then(|table| table.iter().find(|(c, _)| *c == code))
        .map(|(_, unit)| *unit);
    match found {
        Some(unit) => Ok(unit),
        None if code == INVALID_CODE => Ok(INVALID_UNIT),
        None => Err(CodecError::UnresolvableUnit { label: String::from(label), code }),
    }
}

/// Splits `raw_value` into its measurement and unit and resolves the unit.
///
/// Returns `Ok(None)` for the `Id` field, which is an identifier rather
/// than a measurement.
pub fn resolve(label: &str, raw_value: &str) -> Result<Option<MeasurementValue>, CodecError> {
    if label == "Id" {
        return Ok(None);
    }
    let code = raw_value.chars().last().ok_or_else(|| {
        let mut token = String::from(label);
        token.push('=');
        CodecError::MalformedField(token)
    })?;
    let value = &raw_value[..raw_value.len() - code.len_utf8()];
    let unit = lookup_unit(label, code)?;
    tracing::trace!(label, value, unit, "resolved field");
    Ok(Some(MeasurementValue::new(value, unit)))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn unit_of(label: &str, raw: &str) -> &'static str {
        resolve(label, raw).unwrap().unwrap().unit
    }

    #[test]
    fn test_exact_labels() {
        assert_eq!(unit_of("Pa", "1013.2H"), "hPa");
        assert_eq!(unit_of("Pa", "29.9I"), "inHg");
        assert_eq!(unit_of("Ua", "45.0P"), "%");
        assert_eq!(unit_of("Ri", "0.0M"), "mm/h");
        assert_eq!(unit_of("Rp", "0.0I"), "in/h");
        assert_eq!(unit_of("Rc", "0.10M"), "mm");
        assert_eq!(unit_of("Hi", "0.0M"), "hits/cm2h");
        assert_eq!(unit_of("Hp", "0.0H"), "hits/h");
        assert_eq!(unit_of("Hc", "0.0H"), "hits");
        assert_eq!(unit_of("Vh", "12.0N"), "0% hi-");
    }

    #[test]
    fn test_family_labels() {
        assert_eq!(unit_of("Ta", "23.1C"), "C");
        assert_eq!(unit_of("Th", "74.0F"), "F");
        assert_eq!(unit_of("Sm", "1.0K"), "km/h");
        assert_eq!(unit_of("Sx", "2.2N"), "kn");
        assert_eq!(unit_of("Dn", "236D"), "deg");
        assert_eq!(unit_of("Vs", "12.1V"), "V");
        assert_eq!(unit_of("Vr", "3.5V"), "V");
    }

    #[test]
    fn test_duration_suffix_both_cases() {
        assert_eq!(unit_of("Rd", "10S"), "s");
        assert_eq!(unit_of("Hd", "0s"), "s");
    }

    #[test]
    fn test_value_split() {
        let mv = resolve("Pa", "1013.2H").unwrap().unwrap();
        assert_eq!(mv.value, "1013.2");
        assert_eq!(mv.unit, "hPa");
    }

    #[test]
    fn test_identifier_has_no_unit() {
        // Would otherwise fall into the duration-suffix rule
        assert_eq!(resolve("Id", "HEL___"), Ok(None));
    }

    #[test]
    fn test_invalid_sentinel_regardless_of_label() {
        for label in ["Ta", "Pa", "Sm", "Rd", "Vh", "Zz"] {
            let mv = resolve(label, "0.0#").unwrap().unwrap();
            assert_eq!(mv.unit, INVALID_UNIT, "label {}", label);
            assert_eq!(mv.value, "0.0");
        }
    }

    #[test]
    fn test_unresolvable_unit() {
        assert_eq!(
            resolve("Ta", "23.1X"),
            Err(CodecError::UnresolvableUnit { label: "Ta".to_string(), code: 'X' })
        );
        assert_eq!(
            resolve("Zz", "1.0M"),
            Err(CodecError::UnresolvableUnit { label: "Zz".to_string(), code: 'M' })
        );
    }

    #[test]
    fn test_empty_value_is_malformed() {
        assert_eq!(resolve("Ta", ""), Err(CodecError::MalformedField("Ta=".to_string())));
    }
}
