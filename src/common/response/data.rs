// src/common/response/data.rs

use alloc::string::String;
use alloc::vec::Vec;

use super::measurement::MeasurementValue;

/// Average and limits of one wind quantity. (`aR1`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WindStatistic {
    pub average: Option<MeasurementValue>,
    pub minimum: Option<MeasurementValue>,
    pub maximum: Option<MeasurementValue>,
}

/// Wind data message (`r1`). Fields the sensor did not send are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WindData {
    /// `Sm`, `Sn`, `Sx`
    pub speed: WindStatistic,
    /// `Dm`, `Dn`, `Dx`
    pub direction: WindStatistic,
}

/// Pressure, temperature and humidity message (`r2`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PtuData {
    /// `Ta`
    pub ambient_temperature: Option<MeasurementValue>,
    /// `Tp`, used in the pressure calculation.
    pub internal_temperature: Option<MeasurementValue>,
    /// `Ua`
    pub humidity: Option<MeasurementValue>,
    /// `Pa`
    pub pressure: Option<MeasurementValue>,
}

/// One precipitation type within a rain message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PrecipitationData {
    pub intensity: Option<MeasurementValue>,
    pub peak: Option<MeasurementValue>,
    pub accumulation: Option<MeasurementValue>,
    pub duration: Option<MeasurementValue>,
}

/// Precipitation message (`r3`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RainData {
    /// `Ri`, `Rp`, `Rc`, `Rd`
    pub rain: PrecipitationData,
    /// `Hi`, `Hp`, `Hc`, `Hd`
    pub hail: PrecipitationData,
}

/// Supervisor message (`r5`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatusData {
    /// `Vs`
    pub supply_voltage: Option<MeasurementValue>,
    /// `Vr`
    pub reference_voltage: Option<MeasurementValue>,
    /// Value of `Vh` in volts; the unit character encodes the heating status.
    pub heating_voltage: Option<MeasurementValue>,
    /// `Th`
    pub heating_temperature: Option<MeasurementValue>,
    /// Heating status decoded from the unit character of `Vh`.
    pub heating_status: Option<&'static str>,
}

/// Communication settings reply (`xU`/`XXU`), passed through undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CommsInfo {
    pub tag: String,
    /// Body tokens after the tag, as received.
    pub fields: Vec<String>,
}

impl CommsInfo {
    /// Value of a `label=value` token, if present.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields.iter().find_map(|token| {
            token.strip_prefix(label).and_then(|rest| rest.strip_prefix('='))
        })
    }
}

/// Reply to a text command (`tX`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CommandResponse {
    pub result: String,
}
