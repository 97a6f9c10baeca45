// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod codec;
pub mod command;
pub mod crc;
pub mod error;
pub mod fields;
pub mod frame;
pub mod hal_traits;
pub mod response;
pub mod settings;
pub mod types;
pub mod units;

// --- Re-export key types/traits/functions for easier access ---

pub use address::DeviceAddr;
pub use codec::FrameCodec;
pub use command::Command;
pub use crc::{calculate_crc16, checksum, encode_crc_ascii, verify};
pub use error::CodecError;
pub use fields::FieldMap;
pub use frame::WireVariant;
pub use hal_traits::LineChannel;
pub use response::{DecodedFrame, MeasurementValue, ParsedMessage};
pub use settings::{Settings, SettingsBlock, SettingsKind};
pub use types::{CommsSettings, CommunicationProtocol, SerialInterface};

// Native HAL integration (from hal_traits.rs)
#[cfg(feature = "impl-native")]
pub use hal_traits::NativeAdapter;
