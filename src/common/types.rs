// src/common/types.rs

use alloc::format;
use alloc::string::String;

use super::error::CodecError;

// --- Communication protocol (`M=` parameter) ---

/// Protocol modes selectable through the `M` communication parameter.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CommunicationProtocol {
    AsciiAutomatic,
    AsciiAutomaticCrc,
    AsciiPolled,
    AsciiPolledCrc,
    NmeaAutomatic,
    NmeaPolled,
}

impl CommunicationProtocol {
    pub const ALL: [CommunicationProtocol; 6] = [
        CommunicationProtocol::AsciiAutomatic,
        CommunicationProtocol::AsciiAutomaticCrc,
        CommunicationProtocol::AsciiPolled,
        CommunicationProtocol::AsciiPolledCrc,
        CommunicationProtocol::NmeaAutomatic,
        CommunicationProtocol::NmeaPolled,
    ];

    pub const fn code(&self) -> char {
        match self {
            CommunicationProtocol::AsciiAutomatic => 'A',
            CommunicationProtocol::AsciiAutomaticCrc => 'a',
            CommunicationProtocol::AsciiPolled => 'P',
            CommunicationProtocol::AsciiPolledCrc => 'p',
            CommunicationProtocol::NmeaAutomatic => 'N',
            CommunicationProtocol::NmeaPolled => 'Q',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.code() == code)
    }

    /// Whether frames exchanged in this mode carry a trailing checksum.
    pub const fn has_crc(&self) -> bool {
        matches!(
            self,
            CommunicationProtocol::AsciiAutomaticCrc | CommunicationProtocol::AsciiPolledCrc
        )
    }

    pub const fn is_ascii(&self) -> bool {
        !matches!(
            self,
            CommunicationProtocol::NmeaAutomatic | CommunicationProtocol::NmeaPolled
        )
    }
}

// --- Serial interface (`C=` parameter) ---

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SerialInterface {
    Sdi12,
    Rs232,
    Rs485,
    Rs422,
}

impl SerialInterface {
    pub const ALL: [SerialInterface; 4] = [
        SerialInterface::Sdi12,
        SerialInterface::Rs232,
        SerialInterface::Rs485,
        SerialInterface::Rs422,
    ];

    pub const fn code(&self) -> char {
        match self {
            SerialInterface::Sdi12 => '1',
            SerialInterface::Rs232 => '2',
            SerialInterface::Rs485 => '3',
            SerialInterface::Rs422 => '4',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.iter().copied().find(|i| i.code() == code)
    }
}

// --- Numeric parameter domains ---

pub const BAUD_RATES: [u32; 8] = [1200, 2400, 4800, 9600, 19200, 38400, 57600, 115200];
pub const DATA_BITS: [u8; 2] = [7, 8];
/// Upper bound (seconds) of the composite data repeat interval `I`.
pub const COMPOSITE_REPEAT_MAX: u16 = 3600;

/// Letters of the communication parameters understood by `aXU`.
pub mod comms_param {
    pub const ADDRESS: &str = "A";
    pub const PROTOCOL: &str = "M";
    pub const TEST: &str = "T";
    pub const SERIAL_INTERFACE: &str = "C";
    pub const COMPOSITE_DATA_REPEAT: &str = "I";
    pub const BAUD_RATE: &str = "B";
    pub const DATA_BITS: &str = "D";
    pub const PARITY: &str = "P";
    pub const STOP_BITS: &str = "S";
    pub const RS485_LINE_DELAY: &str = "L";
    pub const DEVICE_NAME: &str = "N";
    pub const SOFTWARE_VERSION: &str = "V";
    pub const PARAMETER_LOCK: &str = "H";
}

// --- Communication settings command arguments ---

/// Optional arguments of the set-communication-settings command.
///
/// Values are raw codes as they appear on the wire so that out-of-domain
/// input can be reported rather than made unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommsSettings {
    pub protocol: Option<char>,
    pub serial_interface: Option<char>,
    pub composite_data_repeat: Option<u16>,
    pub baud_rate: Option<u32>,
    pub data_bits: Option<u8>,
}

impl CommsSettings {
    /// Checks every present argument against its domain.
    pub fn validate(&self) -> Result<(), CodecError> {
        if let Some(code) = self.protocol {
            if CommunicationProtocol::from_code(code).is_none() {
                let accepted: String = CommunicationProtocol::ALL.iter().map(|p| p.code()).collect();
                return Err(invalid("protocol", code, format!("one of {:?}", accepted)));
            }
        }
        if let Some(code) = self.serial_interface {
            if SerialInterface::from_code(code).is_none() {
                let accepted: String = SerialInterface::ALL.iter().map(|i| i.code()).collect();
                return Err(invalid("serial_interface", code, format!("one of {:?}", accepted)));
            }
        }
        if let Some(repeat) = self.composite_data_repeat {
            if repeat > COMPOSITE_REPEAT_MAX {
                return Err(invalid(
                    "composite_data_repeat",
                    repeat,
                    format!("0...{}", COMPOSITE_REPEAT_MAX),
                ));
            }
        }
        if let Some(rate) = self.baud_rate {
            if !BAUD_RATES.contains(&rate) {
                return Err(invalid("baud_rate", rate, format!("{:?}", BAUD_RATES)));
            }
        }
        if let Some(bits) = self.data_bits {
            if !DATA_BITS.contains(&bits) {
                return Err(invalid("data_bits", bits, format!("{:?}", DATA_BITS)));
            }
        }
        Ok(())
    }

    /// Validates, then renders the comma-joined `label=value` payload.
    /// Empty when no argument is set (the command then reads the settings).
    pub fn payload(&self) -> Result<String, CodecError> {
        self.validate()?;
        let mut parts: alloc::vec::Vec<String> = alloc::vec::Vec::new();
        if let Some(code) = self.protocol {
            parts.push(format!("{}={}", comms_param::PROTOCOL, code));
        }
        if let Some(code) = self.serial_interface {
            parts.push(format!("{}={}", comms_param::SERIAL_INTERFACE, code));
        }
        if let Some(repeat) = self.composite_data_repeat {
            parts.push(format!("{}={}", comms_param::COMPOSITE_DATA_REPEAT, repeat));
        }
        if let Some(rate) = self.baud_rate {
            parts.push(format!("{}={}", comms_param::BAUD_RATE, rate));
        }
        if let Some(bits) = self.data_bits {
            parts.push(format!("{}={}", comms_param::DATA_BITS, bits));
        }
        Ok(parts.join(","))
    }
}

fn invalid(field: &'static str, value: impl core::fmt::Display, accepted: String) -> CodecError {
    CodecError::InvalidParameter { field, value: format!("{}", value), accepted }
}
