// src/common/codec.rs

use alloc::string::String;

use super::address::DeviceAddr;
use super::command::{Command, QUERY_ADDRESS_TAG};
use super::crc;
use super::error::CodecError;
use super::frame::WireVariant;
use super::response::{parse, DecodedFrame, ParsedMessage};
use super::types::CommunicationProtocol;

/// Builds outgoing frames and decodes incoming lines for one device.
///
/// The codec is fixed for a session: address, wire variant and whether
/// frames carry a checksum. It holds no other state, so one instance can
/// be reused for every exchange.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameCodec {
    address: DeviceAddr,
    variant: WireVariant,
    checksum: bool,
}

impl FrameCodec {
    pub fn new(address: DeviceAddr, variant: WireVariant, checksum: bool) -> Self {
        FrameCodec { address, variant, checksum }
    }

    /// Configures the codec for the device's `M=` protocol mode.
    ///
    /// # Errors
    /// `UnsupportedProtocol` for the NMEA modes, which this codec cannot speak.
    pub fn for_protocol(
        address: DeviceAddr,
        protocol: CommunicationProtocol,
        variant: WireVariant,
    ) -> Result<Self, CodecError> {
        if !protocol.is_ascii() {
            return Err(CodecError::UnsupportedProtocol(protocol.code()));
        }
        Ok(Self::new(address, variant, protocol.has_crc()))
    }

    pub fn address(&self) -> DeviceAddr {
        self.address
    }

    pub fn variant(&self) -> WireVariant {
        self.variant
    }

    pub fn checksum_enabled(&self) -> bool {
        self.checksum
    }

    /// Assembles `address + tag [+ "," + payload] [+ checksum] + terminator`.
    ///
    /// The checksum covers everything before it, address included.
    pub fn build_command(&self, tag: &str, payload: Option<&str>) -> String {
        let mut frame = String::with_capacity(tag.len() + payload.map_or(0, |p| p.len() + 1) + 8);
        frame.push(self.address.as_char());
        frame.push_str(tag);
        if let Some(payload) = payload {
            frame.push(',');
            frame.push_str(payload);
        }
        if self.checksum {
            let sum = crc::checksum(&frame);
            frame.push_str(&sum);
        }
        frame.push_str(self.variant.terminator());
        tracing::trace!(frame = frame.as_str(), "built frame");
        frame
    }

    /// Renders a [`Command`] into a complete frame.
    ///
    /// Arguments are validated first; on error nothing is rendered.
    pub fn build(&self, command: &Command) -> Result<String, CodecError> {
        if !command.is_addressed() {
            return Ok(self.enumerate_devices());
        }
        let payload = command.payload()?;
        Ok(self.build_command(command.tag(self.variant), payload.as_deref()))
    }

    /// The address query frame. Only valid with a single device on the bus.
    pub fn enumerate_devices(&self) -> String {
        let mut frame = String::from(QUERY_ADDRESS_TAG);
        frame.push_str(self.variant.terminator());
        frame
    }

    /// Decodes one received line into its message.
    ///
    /// With checksums enabled the trailing three characters are verified
    /// before anything else is looked at.
    pub fn parse_frame(&self, line: &str) -> Result<ParsedMessage, CodecError> {
        self.decode_frame(line).map(|decoded| decoded.message)
    }

    /// Like [`parse_frame`](Self::parse_frame) but also returns the sender's address.
    pub fn decode_frame(&self, line: &str) -> Result<DecodedFrame, CodecError> {
        let frame = self.verified(line)?;
        let mut chars = frame.chars();
        let address = DeviceAddr::new(chars.next().ok_or(CodecError::EmptyFrame)?)?;
        let body = chars.as_str();
        if address != self.address {
            tracing::debug!(expected = %self.address, received = %address, "frame from another address");
        }
        let message = parse::dispatch(body)?;
        Ok(DecodedFrame { address, message })
    }

    /// Decodes the reply to the address query: a bare address character.
    /// The reply never carries a checksum.
    pub fn parse_address(&self, line: &str) -> Result<DeviceAddr, CodecError> {
        let frame = line.trim();
        let mut chars = frame.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => DeviceAddr::new(c),
            (None, _) => Err(CodecError::EmptyFrame),
            (Some(_), Some(_)) => Err(CodecError::malformed(frame)),
        }
    }

    /// Trims framing and, when enabled, strips and checks the checksum.
    fn verified<'a>(&self, line: &'a str) -> Result<&'a str, CodecError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CodecError::EmptyFrame);
        }
        if self.checksum {
            crc::split_verified(line)
        } else {
            Ok(line)
        }
    }
}
