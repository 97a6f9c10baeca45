// src/station/mod.rs

//! Host-side client that exchanges frames with a transmitter over a
//! [`LineChannel`](crate::common::hal_traits::LineChannel).

pub mod sync_station;

pub use sync_station::SyncStation;

use crate::common::error::CodecError;

/// Errors raised by a station exchange.
#[derive(Debug, thiserror::Error)]
pub enum StationError<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying I/O error from the channel implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// A received line did not fit the line buffer.
    #[error("Buffer overflow: needed {needed}, got {got}")]
    BufferOverflow { needed: usize, got: usize },

    /// A received line is not valid UTF-8.
    #[error("Received line is not valid UTF-8")]
    InvalidUtf8,

    /// Got a well-formed reply, but not the one the exchange expects.
    #[error("Unexpected response received")]
    UnexpectedResponse,

    /// The frame could not be built or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}
