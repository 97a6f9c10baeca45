// src/common/response/mod.rs

mod data;
mod measurement;
pub mod parse;

pub use data::{
    CommandResponse, CommsInfo, PrecipitationData, PtuData, RainData, StatusData, WindData,
    WindStatistic,
};
pub use measurement::MeasurementValue;
pub use parse::{dispatch, TagPattern, TypedParser, PARSERS};

use crate::common::address::DeviceAddr;
use crate::common::settings::{Settings, SettingsKind};

/// Any message body the codec can decode, tagged by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ParsedMessage {
    /// Wind data (`r1`).
    Wind(WindData),
    /// Pressure, temperature and humidity (`r2`).
    Ptu(PtuData),
    /// Precipitation (`r3`).
    Rain(RainData),
    /// Supervisor status (`r5`).
    Status(StatusData),
    /// Communication settings (`xU` / `XXU`).
    CommsInfo(CommsInfo),
    /// Text command reply (`tX`).
    CommandResponse(CommandResponse),
    /// PTU settings (`xTU`).
    PtuSettings(Settings),
    /// Precipitation settings (`xRU`).
    PrecipitationSettings(Settings),
    /// Supervisor settings (`xSU`).
    SupervisorSettings(Settings),
}

impl ParsedMessage {
    /// Settings payload, for the three settings shapes.
    pub fn settings(&self) -> Option<&Settings> {
        match self {
            ParsedMessage::PtuSettings(s)
            | ParsedMessage::PrecipitationSettings(s)
            | ParsedMessage::SupervisorSettings(s) => Some(s),
            _ => None,
        }
    }

    /// Consumes the message, returning its settings if it is of `kind`.
    pub fn into_settings(self, kind: SettingsKind) -> Option<Settings> {
        match self {
            ParsedMessage::PtuSettings(s)
            | ParsedMessage::PrecipitationSettings(s)
            | ParsedMessage::SupervisorSettings(s)
                if s.kind() == kind =>
            {
                Some(s)
            }
            _ => None,
        }
    }
}

/// A verified incoming frame: the sender's address and its decoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DecodedFrame {
    pub address: DeviceAddr,
    pub message: ParsedMessage,
}
