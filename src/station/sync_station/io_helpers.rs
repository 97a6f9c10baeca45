// src/station/sync_station/io_helpers.rs

use super::{SyncStation, LINE_BUFFER_SIZE};
use crate::common::hal_traits::LineChannel;
use crate::station::StationError;

// Implementation block for I/O related helpers
impl<IF> SyncStation<IF>
where
    IF: LineChannel,
{
    /// Writes an already formatted frame and flushes it.
    pub(super) fn send_frame_bytes(&mut self, bytes: &[u8]) -> Result<(), StationError<IF::Error>> {
        for &byte in bytes {
            nb::block!(self.interface.write_byte(byte)).map_err(StationError::Io)?;
        }
        nb::block!(self.interface.flush()).map_err(StationError::Io)
    }

    /// Reads bytes up to and including the next `<LF>`.
    ///
    /// An oversized line is consumed through its `<LF>` before the overflow
    /// is reported, so the next read starts on a frame boundary.
    pub(super) fn read_line_bytes(
        &mut self,
    ) -> Result<heapless::Vec<u8, LINE_BUFFER_SIZE>, StationError<IF::Error>> {
        let mut line = heapless::Vec::new();
        loop {
            let byte = nb::block!(self.interface.read_byte()).map_err(StationError::Io)?;
            if line.push(byte).is_err() {
                let needed = self.discard_through_newline(line.len() + 1, byte)?;
                tracing::warn!(needed, got = LINE_BUFFER_SIZE, "line too long, discarded");
                return Err(StationError::BufferOverflow { needed, got: LINE_BUFFER_SIZE });
            }
            if byte == b'\n' {
                return Ok(line);
            }
        }
    }

    /// Drops bytes until `<LF>` has been read; returns the full line length.
    fn discard_through_newline(
        &mut self,
        mut count: usize,
        mut last: u8,
    ) -> Result<usize, StationError<IF::Error>> {
        while last != b'\n' {
            last = nb::block!(self.interface.read_byte()).map_err(StationError::Io)?;
            count += 1;
        }
        Ok(count)
    }
}
