// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub mod common;
pub mod station;

// Re-export key types for convenience
pub use common::{CodecError, DeviceAddr, FrameCodec, ParsedMessage};
pub use station::{StationError, SyncStation};
