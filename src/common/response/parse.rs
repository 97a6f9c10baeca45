// src/common/response/parse.rs

//! Tag dispatch over the typed message parsers.
//!
//! Parsers are tried top to bottom and the first whose tag pattern matches
//! decodes the body. The tags in [`PARSERS`] are disjoint, but the order is
//! still part of the contract so dispatch stays deterministic.

use alloc::string::String;
use alloc::vec::Vec;

use super::data::{
    CommandResponse, CommsInfo, PrecipitationData, PtuData, RainData, StatusData, WindData,
    WindStatistic,
};
use super::measurement::MeasurementValue;
use super::ParsedMessage;

use crate::common::error::CodecError;
use crate::common::fields::FieldMap;
use crate::common::settings::{Settings, SettingsKind};

pub const WIND_TAG: &str = "r1";
pub const PTU_TAG: &str = "r2";
pub const RAIN_TAG: &str = "r3";
pub const STATUS_TAG: &str = "r5";
pub const COMMS_INFO_TAGS: [&str; 2] = ["xU", "XXU"];
pub const COMMAND_RESPONSE_TAG: &str = "tX";

/// Unit reported for the numeric part of the heating voltage `Vh`.
const HEATING_VOLTAGE_UNIT: &str = "V";

/// How a parser recognizes its leading tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TagPattern {
    Exact(&'static str),
    /// Any of the tags, compared ASCII case-insensitively.
    AnyIgnoreCase(&'static [&'static str]),
}

impl TagPattern {
    pub fn matches(&self, tag: &str) -> bool {
        match self {
            TagPattern::Exact(expected) => *expected == tag,
            TagPattern::AnyIgnoreCase(expected) => expected.iter().any(|t| t.eq_ignore_ascii_case(tag)),
        }
    }
}

type DecodeFn = fn(&str, &[&str]) -> Result<ParsedMessage, CodecError>;

/// One entry of the dispatch table.
#[derive(Copy, Clone)]
pub struct TypedParser {
    pub name: &'static str,
    pub pattern: TagPattern,
    /// Receives the tag and the body tokens after it.
    pub decode: DecodeFn,
}

impl core::fmt::Debug for TypedParser {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypedParser")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .finish()
    }
}

/// Parsers in priority order.
pub const PARSERS: [TypedParser; 9] = [
    TypedParser { name: "wind", pattern: TagPattern::Exact(WIND_TAG), decode: decode_wind },
    TypedParser { name: "ptu", pattern: TagPattern::Exact(PTU_TAG), decode: decode_ptu },
    TypedParser { name: "rain", pattern: TagPattern::Exact(RAIN_TAG), decode: decode_rain },
    TypedParser { name: "status", pattern: TagPattern::Exact(STATUS_TAG), decode: decode_status },
    TypedParser {
        name: "comms_info",
        pattern: TagPattern::AnyIgnoreCase(&COMMS_INFO_TAGS),
        decode: decode_comms_info,
    },
    TypedParser {
        name: "command_response",
        pattern: TagPattern::Exact(COMMAND_RESPONSE_TAG),
        decode: decode_command_response,
    },
    TypedParser { name: "ptu_settings", pattern: TagPattern::Exact("xTU"), decode: decode_ptu_settings },
    TypedParser {
        name: "precipitation_settings",
        pattern: TagPattern::Exact("xRU"),
        decode: decode_precipitation_settings,
    },
    TypedParser {
        name: "supervisor_settings",
        pattern: TagPattern::Exact("xSU"),
        decode: decode_supervisor_settings,
    },
];

/// Decodes a frame body (address, checksum and terminator already removed).
pub fn dispatch(body: &str) -> Result<ParsedMessage, CodecError> {
    dispatch_with(&PARSERS, body)
}

/// Decodes `body` with the first parser in `parsers` that claims its tag.
pub fn dispatch_with(parsers: &[TypedParser], body: &str) -> Result<ParsedMessage, CodecError> {
    let tokens: Vec<&str> = body.split(',').collect();
    let (tag, fields) = match tokens.split_first() {
        Some((tag, fields)) if !tag.is_empty() => (*tag, fields),
        _ => return Err(CodecError::EmptyFrame),
    };
    match parsers.iter().find(|p| p.pattern.matches(tag)) {
        Some(parser) => {
            tracing::debug!(tag, parser = parser.name, "dispatching message");
            (parser.decode)(tag, fields)
        }
        None => {
            tracing::debug!(tag, "no parser for message");
            Err(CodecError::UnrecognizedMessage(String::from(tag)))
        }
    }
}

// --- Measurement messages ---

fn decode_wind(_tag: &str, fields: &[&str]) -> Result<ParsedMessage, CodecError> {
    let map = FieldMap::parse(fields)?;
    let statistic = |avg, min, max| -> Result<WindStatistic, CodecError> {
        Ok(WindStatistic {
            average: map.measurement(avg)?,
            minimum: map.measurement(min)?,
            maximum: map.measurement(max)?,
        })
    };
    Ok(ParsedMessage::Wind(WindData {
        speed: statistic("Sm", "Sn", "Sx")?,
        direction: statistic("Dm", "Dn", "Dx")?,
    }))
}

fn decode_ptu(_tag: &str, fields: &[&str]) -> Result<ParsedMessage, CodecError> {
    let map = FieldMap::parse(fields)?;
    Ok(ParsedMessage::Ptu(PtuData {
        ambient_temperature: map.measurement("Ta")?,
        internal_temperature: map.measurement("Tp")?,
        humidity: map.measurement("Ua")?,
        pressure: map.measurement("Pa")?,
    }))
}

fn decode_rain(_tag: &str, fields: &[&str]) -> Result<ParsedMessage, CodecError> {
    let map = FieldMap::parse(fields)?;
    let group = |prefix: char| -> Result<PrecipitationData, CodecError> {
        let label = |suffix: char| {
            let mut l = String::with_capacity(2);
            l.push(prefix);
            l.push(suffix);
            l
        };
        Ok(PrecipitationData {
            intensity: map.measurement(&label('i'))?,
            peak: map.measurement(&label('p'))?,
            accumulation: map.measurement(&label('c'))?,
            duration: map.measurement(&label('d'))?,
        })
    };
    Ok(ParsedMessage::Rain(RainData { rain: group('R')?, hail: group('H')? }))
}

fn decode_status(_tag: &str, fields: &[&str]) -> Result<ParsedMessage, CodecError> {
    let map = FieldMap::parse(fields)?;
    let heating = map.measurement("Vh")?;
    Ok(ParsedMessage::Status(StatusData {
        supply_voltage: map.measurement("Vs")?,
        reference_voltage: map.measurement("Vr")?,
        heating_voltage: heating
            .as_ref()
            .map(|mv| MeasurementValue::new(&mv.value, HEATING_VOLTAGE_UNIT)),
        heating_temperature: map.measurement("Th")?,
        heating_status: heating.map(|mv| mv.unit),
    }))
}

// --- Pass-through messages ---

fn decode_comms_info(tag: &str, fields: &[&str]) -> Result<ParsedMessage, CodecError> {
    Ok(ParsedMessage::CommsInfo(CommsInfo {
        tag: String::from(tag),
        fields: fields.iter().map(|f| String::from(*f)).collect(),
    }))
}

fn decode_command_response(tag: &str, fields: &[&str]) -> Result<ParsedMessage, CodecError> {
    let result = fields.first().ok_or_else(|| CodecError::malformed(tag))?;
    Ok(ParsedMessage::CommandResponse(CommandResponse { result: String::from(*result) }))
}

// --- Settings messages ---

fn decode_ptu_settings(_tag: &str, fields: &[&str]) -> Result<ParsedMessage, CodecError> {
    Settings::decode(SettingsKind::Ptu, fields).map(ParsedMessage::PtuSettings)
}

fn decode_precipitation_settings(_tag: &str, fields: &[&str]) -> Result<ParsedMessage, CodecError> {
    Settings::decode(SettingsKind::Precipitation, fields).map(ParsedMessage::PrecipitationSettings)
}

fn decode_supervisor_settings(_tag: &str, fields: &[&str]) -> Result<ParsedMessage, CodecError> {
    Settings::decode(SettingsKind::Supervisor, fields).map(ParsedMessage::SupervisorSettings)
}
