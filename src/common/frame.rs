// src/common/frame.rs

/// Wire variants the transmitter speaks on its serial ports.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum WireVariant {
    /// ASCII protocol, frames end with `<CR><LF>`.
    #[default]
    Ascii,
    /// SDI-12 port, commands end with `!`.
    Sdi12,
}

impl WireVariant {
    /// Terminator appended to every outgoing frame.
    pub const fn terminator(&self) -> &'static str {
        match self {
            WireVariant::Ascii => "\r\n",
            WireVariant::Sdi12 => "!",
        }
    }

    /// Tag of the communication-settings command on this variant.
    pub const fn comms_settings_tag(&self) -> &'static str {
        match self {
            WireVariant::Ascii => "xU",
            WireVariant::Sdi12 => "XXU",
        }
    }
}
