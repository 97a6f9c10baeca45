// src/common/error.rs

use alloc::string::String;
use arrayvec::ArrayString;

/// Errors raised while building or decoding a single frame.
///
/// Every variant is scoped to the frame being processed; none of them leave
/// the codec in a different state, so the caller decides whether the
/// exchange is worth repeating.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The trailing checksum disagrees with the one computed over the frame.
    /// Nothing in the frame has been interpreted.
    #[error("Checksum mismatch: expected {expected}, received {actual}")]
    InvalidChecksum {
        expected: ArrayString<3>,
        actual: ArrayString<3>,
    },

    /// A body token is not a `label=value` pair, or its value is unusable.
    #[error("Malformed field: '{0}'")]
    MalformedField(String),

    /// The unit code is not in the table selected for the label.
    #[error("Cannot resolve unit code '{code}' for field '{label}'")]
    UnresolvableUnit { label: String, code: char },

    /// No parser claimed the frame's leading tag.
    #[error("No parser for message tag '{0}'")]
    UnrecognizedMessage(String),

    /// A command argument lies outside its declared domain.
    #[error("Invalid {field}: {value}, expected: {accepted}")]
    InvalidParameter {
        field: &'static str,
        value: String,
        accepted: String,
    },

    /// The line was empty once framing was removed.
    #[error("Empty frame")]
    EmptyFrame,

    /// The line is too short to carry a checksum after the address.
    #[error("Frame too short for checksum")]
    TooShort,

    /// The leading character is not a usable device address.
    #[error("Invalid device address character: '{0}'")]
    InvalidAddress(char),

    /// The protocol code cannot drive the ASCII codec (e.g. NMEA modes).
    #[error("Unsupported communication protocol: '{0}'")]
    UnsupportedProtocol(char),
}

impl CodecError {
    pub(crate) fn malformed(token: &str) -> Self {
        CodecError::MalformedField(String::from(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message_names_field_and_domain() {
        let err = CodecError::InvalidParameter {
            field: "baud_rate",
            value: "9601".to_string(),
            accepted: "[1200, 2400]".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid baud_rate: 9601, expected: [1200, 2400]");
    }

    #[test]
    fn test_checksum_message_reports_both_values() {
        let err = CodecError::InvalidChecksum {
            expected: ArrayString::from("CCb").unwrap(),
            actual: ArrayString::from("CCc").unwrap(),
        };
        assert_eq!(err.to_string(), "Checksum mismatch: expected CCb, received CCc");
    }
}
