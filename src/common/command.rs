//! Transmitter command definitions.
//!
//! A [`Command`] knows its tag and its payload; the address, checksum and
//! terminator are added by [`FrameCodec`](super::codec::FrameCodec).

use alloc::string::String;

use super::error::CodecError;
use super::frame::WireVariant;
use super::settings::{Settings, SettingsKind};
use super::types::CommsSettings;

/// Tag of the address query. Sent without an address.
pub const QUERY_ADDRESS_TAG: &str = "?";

/// Represents a command sent to the transmitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Address Query (`?`) - The single device on the bus answers with its address.
    QueryAddress,

    /// Read All Data (`aR`) - Returns the wind, PTU, precipitation and supervisor messages.
    ReadAllData,

    /// Reset (`axZ`) - Restarts the device.
    Reset,

    /// Precipitation Intensity Reset (`axZRI`).
    ResetPrecipitationIntensity,

    /// Precipitation Counter Reset (`axZRU`) - Clears accumulation and duration.
    ResetPrecipitationCounters,

    /// Communication Settings (`axU` / `aXXU`) without arguments - reads the current settings.
    GetCommsSettings,

    /// Communication Settings (`axU,...`) with arguments. Arguments are validated
    /// before anything is rendered.
    SetCommsSettings(CommsSettings),

    /// Reads the settings of one kind (`axTU`, `axRU`, `axSU`).
    GetSettings(SettingsKind),

    /// Writes the settings of one kind (`axTU,R=...,...`).
    SetSettings(Settings),
}

impl Command {
    /// Leading tag of the command on the given wire variant.
    pub fn tag(&self, variant: WireVariant) -> &'static str {
        match self {
            Command::QueryAddress => QUERY_ADDRESS_TAG,
            Command::ReadAllData => "R",
            Command::Reset => "xZ",
            Command::ResetPrecipitationIntensity => "xZRI",
            Command::ResetPrecipitationCounters => "xZRU",
            Command::GetCommsSettings | Command::SetCommsSettings(_) => variant.comms_settings_tag(),
            Command::GetSettings(kind) => kind.tag(),
            Command::SetSettings(settings) => settings.kind().tag(),
        }
    }

    /// Renders the text that follows `tag,`, if any.
    ///
    /// A `SetCommsSettings` with no argument set renders no payload, which
    /// the device treats as a read.
    pub fn payload(&self) -> Result<Option<String>, CodecError> {
        match self {
            Command::SetCommsSettings(args) => {
                let payload = args.payload()?;
                Ok(if payload.is_empty() { None } else { Some(payload) })
            }
            Command::SetSettings(settings) => settings.encode_payload().map(Some),
            _ => Ok(None),
        }
    }

    /// `true` for commands that carry the device address.
    pub fn is_addressed(&self) -> bool {
        !matches!(self, Command::QueryAddress)
    }

    /// Number of response lines the device sends back.
    pub fn expected_responses(&self) -> usize {
        match self {
            Command::ReadAllData => 4,
            _ => 1,
        }
    }
}
