// src/station/sync_station/mod.rs

mod io_helpers;

use alloc::vec::Vec;

use crate::common::{
    address::DeviceAddr,
    codec::FrameCodec,
    command::Command,
    hal_traits::LineChannel,
    response::{CommsInfo, ParsedMessage},
    settings::{Settings, SettingsKind},
    types::CommsSettings,
};
use crate::station::StationError;

/// Capacity of the receive line buffer, terminator included.
pub const LINE_BUFFER_SIZE: usize = 256;

/// Drives a single transmitter over a blocking line exchange.
///
/// Every method sends one or more frames and reads the matching number of
/// reply lines. Nothing is retried; a failed exchange is reported as is.
#[derive(Debug)]
pub struct SyncStation<IF>
where
    IF: LineChannel,
{
    interface: IF,
    codec: FrameCodec,
}

impl<IF> SyncStation<IF>
where
    IF: LineChannel,
{
    pub fn new(interface: IF, codec: FrameCodec) -> Self {
        SyncStation { interface, codec }
    }

    pub fn codec(&self) -> &FrameCodec {
        &self.codec
    }

    /// Gives back the channel.
    pub fn release(self) -> IF {
        self.interface
    }

    // --- Frame Level ---

    /// Builds and writes one command frame.
    pub fn send(&mut self, command: &Command) -> Result<(), StationError<IF::Error>> {
        let frame = self.codec.build(command)?;
        tracing::trace!(frame = frame.trim_end(), "sending frame");
        self.send_frame_bytes(frame.as_bytes())
    }

    /// Reads and decodes one reply line from this station's device.
    pub fn read_message(&mut self) -> Result<ParsedMessage, StationError<IF::Error>> {
        let raw = self.read_line_bytes()?;
        let line = core::str::from_utf8(&raw).map_err(|_| StationError::InvalidUtf8)?;
        tracing::trace!(line = line.trim_end(), "received line");
        let decoded = self.codec.decode_frame(line)?;
        if decoded.address != self.codec.address() {
            return Err(StationError::UnexpectedResponse);
        }
        Ok(decoded.message)
    }

    /// Sends `command` and reads a single reply.
    pub fn transact(&mut self, command: &Command) -> Result<ParsedMessage, StationError<IF::Error>> {
        self.send(command)?;
        self.read_message()
    }

    // --- Public Blocking Methods ---

    /// Asks the only device on the bus for its address.
    pub fn query_address(&mut self) -> Result<DeviceAddr, StationError<IF::Error>> {
        self.send(&Command::QueryAddress)?;
        let raw = self.read_line_bytes()?;
        let line = core::str::from_utf8(&raw).map_err(|_| StationError::InvalidUtf8)?;
        Ok(self.codec.parse_address(line)?)
    }

    /// Requests all data; returns the wind, PTU, rain and status messages in
    /// the order received.
    pub fn read_all_data(&mut self) -> Result<Vec<ParsedMessage>, StationError<IF::Error>> {
        let command = Command::ReadAllData;
        self.send(&command)?;
        let mut messages = Vec::with_capacity(command.expected_responses());
        for _ in 0..command.expected_responses() {
            messages.push(self.read_message()?);
        }
        Ok(messages)
    }

    pub fn reset(&mut self) -> Result<ParsedMessage, StationError<IF::Error>> {
        self.transact(&Command::Reset)
    }

    /// Resets precipitation intensity, then the precipitation counters.
    pub fn reset_precipitation(
        &mut self,
    ) -> Result<(ParsedMessage, ParsedMessage), StationError<IF::Error>> {
        let intensity = self.transact(&Command::ResetPrecipitationIntensity)?;
        let counters = self.transact(&Command::ResetPrecipitationCounters)?;
        Ok((intensity, counters))
    }

    pub fn get_settings(&mut self, kind: SettingsKind) -> Result<Settings, StationError<IF::Error>> {
        let reply = self.transact(&Command::GetSettings(kind))?;
        reply.into_settings(kind).ok_or(StationError::UnexpectedResponse)
    }

    /// Writes `settings` and returns the settings the device reports back.
    pub fn set_settings(&mut self, settings: &Settings) -> Result<Settings, StationError<IF::Error>> {
        let kind = settings.kind();
        let reply = self.transact(&Command::SetSettings(settings.clone()))?;
        reply.into_settings(kind).ok_or(StationError::UnexpectedResponse)
    }

    pub fn get_comms_settings(&mut self) -> Result<CommsInfo, StationError<IF::Error>> {
        Self::expect_comms_info(self.transact(&Command::GetCommsSettings)?)
    }

    /// Changes communication settings. Arguments are validated before
    /// anything is written.
    pub fn set_comms_settings(
        &mut self,
        settings: CommsSettings,
    ) -> Result<CommsInfo, StationError<IF::Error>> {
        Self::expect_comms_info(self.transact(&Command::SetCommsSettings(settings))?)
    }

    fn expect_comms_info(reply: ParsedMessage) -> Result<CommsInfo, StationError<IF::Error>> {
        match reply {
            ParsedMessage::CommsInfo(info) => Ok(info),
            _ => Err(StationError::UnexpectedResponse),
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::CodecError;
    use crate::common::frame::WireVariant;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum MockCommError {
        Exhausted,
    }

    #[derive(Debug, Default)]
    struct MockChannel {
        rx: VecDeque<u8>,
        tx: Vec<u8>,
        // WouldBlock returned before each staged byte is handed out
        stall_per_byte: usize,
        stalled: usize,
        flushes: usize,
    }

    impl MockChannel {
        fn with_lines(lines: &[&str]) -> Self {
            let mut mock = MockChannel::default();
            for line in lines {
                mock.rx.extend(line.bytes());
            }
            mock
        }

        fn written(&self) -> &str {
            core::str::from_utf8(&self.tx).unwrap()
        }
    }

    impl LineChannel for MockChannel {
        type Error = MockCommError;

        fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
            if self.stalled < self.stall_per_byte {
                self.stalled += 1;
                return Err(nb::Error::WouldBlock);
            }
            self.stalled = 0;
            self.rx.pop_front().ok_or(nb::Error::Other(MockCommError::Exhausted))
        }

        fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
            self.tx.push(byte);
            Ok(())
        }

        fn flush(&mut self) -> nb::Result<(), Self::Error> {
            self.flushes += 1;
            Ok(())
        }
    }

    fn addr0() -> DeviceAddr {
        DeviceAddr::new('0').unwrap()
    }

    fn station(lines: &[&str], checksum: bool) -> SyncStation<MockChannel> {
        SyncStation::new(MockChannel::with_lines(lines), FrameCodec::new(addr0(), WireVariant::Ascii, checksum))
    }

    #[test]
    fn test_read_all_data() {
        let mut st = station(
            &[
                "0r1,Dn=236D,Dm=283D,Dx=031D,Sn=0.0M,Sm=1.0M,Sx=2.2M\r\n",
                "0r2,Ta=23.1C,Tp=24.0C,Ua=45.0P,Pa=1013.2H\r\n",
                "0r3,Rc=0.00M,Rd=0s,Ri=0.0M,Hc=0.0M,Hd=0s,Hi=0.0M\r\n",
                "0r5,Th=25.9C,Vh=12.0N,Vs=12.1V,Vr=3.510V\r\n",
            ],
            false,
        );
        let messages = st.read_all_data().unwrap();
        assert_eq!(st.interface.written(), "0R\r\n");
        assert_eq!(st.interface.flushes, 1);
        assert_eq!(messages.len(), 4);
        assert!(matches!(messages[0], ParsedMessage::Wind(_)));
        assert!(matches!(messages[1], ParsedMessage::Ptu(_)));
        assert!(matches!(messages[2], ParsedMessage::Rain(_)));
        assert!(matches!(messages[3], ParsedMessage::Status(_)));
    }

    #[test]
    fn test_would_block_is_retried() {
        let mut st = station(&["0r2,Ta=23.1C\r\n"], false);
        st.interface.stall_per_byte = 2;
        match st.read_message().unwrap() {
            ParsedMessage::Ptu(ptu) => assert_eq!(ptu.ambient_temperature.unwrap().value, "23.1"),
            other => panic!("Expected Ptu, got {:?}", other),
        }
    }

    #[test]
    fn test_get_settings_with_checksum() {
        let mut st = station(&["0xTU,R=11000000&00000000,I=60,P=H,T=CNcs\r\n"], true);
        let settings = st.get_settings(SettingsKind::Ptu).unwrap();
        assert_eq!(st.interface.written(), "0xTUNYq\r\n");
        assert_eq!(settings.block().is_requested("Pa"), Some(true));
        assert_eq!(settings.block().is_requested("Tp"), Some(false));
        assert_eq!(settings.get("I"), Some("60"));
    }

    #[test]
    fn test_set_settings_writes_payload() {
        let mut st = station(&["0xTU,R=11000000&00000000,I=60,P=H,T=CNcs\r\n"], true);
        let mut settings = Settings::decode(SettingsKind::Ptu, &["R=11000000&00000000", "I=60", "P=H", "T=C"]).unwrap();
        settings.set("I", "60").unwrap();
        let echoed = st.set_settings(&settings).unwrap();
        assert_eq!(st.interface.written(), "0xTU,R=11000000&00000000,I=60,P=H,T=CNcs\r\n");
        assert_eq!(echoed, settings);
    }

    #[test]
    fn test_settings_reply_of_wrong_kind() {
        let mut st = station(&["0xRU,R=11111100&10100000,I=60\r\n"], false);
        assert!(matches!(st.get_settings(SettingsKind::Ptu), Err(StationError::UnexpectedResponse)));
    }

    #[test]
    fn test_reset_precipitation() {
        let mut st = station(&["0tX,Inten reset\r\n", "0tX,Rain reset\r\n"], false);
        let (intensity, counters) = st.reset_precipitation().unwrap();
        assert_eq!(st.interface.written(), "0xZRI\r\n0xZRU\r\n");
        assert!(matches!(intensity, ParsedMessage::CommandResponse(ref r) if r.result == "Inten reset"));
        assert!(matches!(counters, ParsedMessage::CommandResponse(ref r) if r.result == "Rain reset"));
    }

    #[test]
    fn test_comms_settings() {
        let mut st = station(&["0xU,A=0,M=P,C=2,I=0,B=19200,D=8\r\n"], false);
        let args = CommsSettings { protocol: Some('P'), ..Default::default() };
        let info = st.set_comms_settings(args).unwrap();
        assert_eq!(st.interface.written(), "0xU,M=P\r\n");
        assert_eq!(info.get("B"), Some("19200"));
    }

    #[test]
    fn test_invalid_comms_settings_write_nothing() {
        let mut st = station(&[], false);
        let args = CommsSettings { baud_rate: Some(9601), ..Default::default() };
        match st.set_comms_settings(args) {
            Err(StationError::Codec(CodecError::InvalidParameter { field, .. })) => assert_eq!(field, "baud_rate"),
            other => panic!("Expected InvalidParameter, got {:?}", other),
        }
        assert!(st.interface.tx.is_empty());
    }

    #[test]
    fn test_comms_reply_of_wrong_shape() {
        let mut st = station(&["0tX,Result\r\n"], false);
        assert!(matches!(st.get_comms_settings(), Err(StationError::UnexpectedResponse)));
    }

    #[test]
    fn test_query_address() {
        let mut st = station(&["0\r\n"], true);
        assert_eq!(st.query_address().unwrap(), addr0());
        assert_eq!(st.interface.written(), "?\r\n");
    }

    #[test]
    fn test_reply_from_other_address() {
        let mut st = station(&["1r2,Ta=23.1C\r\n"], false);
        assert!(matches!(st.read_message(), Err(StationError::UnexpectedResponse)));
    }

    #[test]
    fn test_checksum_failure_surfaces() {
        let mut st = station(&["0tX,ResultAAA\r\n"], true);
        assert!(matches!(
            st.reset(),
            Err(StationError::Codec(CodecError::InvalidChecksum { .. }))
        ));
    }

    #[test]
    fn test_line_buffer_overflow() {
        let mut long = "0".repeat(LINE_BUFFER_SIZE + 10);
        long.push_str("\r\n");
        let mut st = station(&[long.as_str()], false);
        assert!(matches!(
            st.read_message(),
            Err(StationError::BufferOverflow { needed: 268, got: 256 })
        ));
        assert!(st.interface.rx.is_empty());
    }

    #[test]
    fn test_overflow_resyncs_on_next_line() {
        // The tail of the oversized line looks like a frame of its own
        let long = format!("0xU,N={},0r2,Ta=23.1C\r\n", "A".repeat(250));
        let mut st = station(&[long.as_str(), "0r2,Ta=99.9C\r\n"], false);
        match st.read_message() {
            Err(StationError::BufferOverflow { needed, got }) => {
                assert_eq!(needed, long.len());
                assert_eq!(got, LINE_BUFFER_SIZE);
            }
            other => panic!("Expected BufferOverflow, got {:?}", other),
        }
        match st.read_message().unwrap() {
            ParsedMessage::Ptu(ptu) => assert_eq!(ptu.ambient_temperature.unwrap().value, "99.9"),
            other => panic!("Expected Ptu, got {:?}", other),
        }
    }

    #[test]
    fn test_overflow_without_terminator_is_io_error() {
        let long = "0".repeat(LINE_BUFFER_SIZE + 10);
        let mut st = station(&[long.as_str()], false);
        assert!(matches!(st.read_message(), Err(StationError::Io(MockCommError::Exhausted))));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut st = station(&[], false);
        st.interface.rx.extend([0xFF, b'\r', b'\n']);
        assert!(matches!(st.read_message(), Err(StationError::InvalidUtf8)));
    }

    #[test]
    fn test_io_error() {
        let mut st = station(&["0r2,Ta=1"], false);
        assert!(matches!(st.read_message(), Err(StationError::Io(MockCommError::Exhausted))));
        let channel = st.release();
        assert!(channel.rx.is_empty());
    }
}
