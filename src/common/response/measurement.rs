// src/common/response/measurement.rs

use alloc::string::String;

use crate::common::units::INVALID_UNIT;

/// A decoded measurement: the raw numeric text and its resolved unit.
///
/// The value is kept as sent so no precision is lost; `unit` is
/// `"invalid"` when the sensor flagged the field as unavailable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MeasurementValue {
    pub value: String,
    pub unit: &'static str,
}

impl MeasurementValue {
    pub fn new(value: &str, unit: &'static str) -> Self {
        MeasurementValue { value: String::from(value), unit }
    }

    /// Numeric interpretation of the value, if it has one.
    pub fn as_f32(&self) -> Option<f32> {
        self.value.parse().ok()
    }

    pub fn is_valid(&self) -> bool {
        self.unit != INVALID_UNIT
    }
}
