// src/common/address.rs

use super::error::CodecError;
use core::convert::TryFrom;
use core::fmt;

/// Single-character bus address of a WXT5xx transmitter.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "char"))]
pub struct DeviceAddr(char);

impl DeviceAddr {
    pub const DEFAULT_ADDRESS: DeviceAddr = DeviceAddr('0');

    /// Creates a new `DeviceAddr` if the given character is a valid address.
    pub fn new(address_char: char) -> Result<Self, CodecError> {
        if Self::is_valid_address_char(address_char) {
            Ok(DeviceAddr(address_char))
        } else {
            Err(CodecError::InvalidAddress(address_char))
        }
    }

    #[inline]
    pub const fn as_char(&self) -> char {
        self.0
    }

    #[inline]
    pub const fn is_valid_address_char(c: char) -> bool {
        matches!(c, '0'..='9' | 'a'..='z' | 'A'..='Z')
    }
}

impl Default for DeviceAddr {
    fn default() -> Self {
        Self::DEFAULT_ADDRESS
    }
}

impl TryFrom<char> for DeviceAddr {
    type Error = CodecError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeviceAddr> for char {
    fn from(value: DeviceAddr) -> Self {
        value.0
    }
}

impl fmt::Display for DeviceAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
