// src/common/hal_traits.rs

use core::fmt::Debug;

/// Abstraction for the non-blocking serial line the transmitter is attached to.
///
/// Framing (terminators, checksums) is handled above this trait; an
/// implementation only moves bytes.
pub trait LineChannel {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte from the serial interface.
    ///
    /// Returns `Ok(byte)` if a byte was read, or `Err(nb::Error::WouldBlock)`
    /// if no byte is available yet.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the serial interface.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if the write buffer is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer, ensuring all written bytes have been sent.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}

/// Wraps any `embedded-hal-nb` serial peripheral as a [`LineChannel`].
#[cfg(feature = "impl-native")]
#[derive(Debug)]
pub struct NativeAdapter<U>(pub U);

#[cfg(feature = "impl-native")]
impl<U> NativeAdapter<U> {
    pub fn new(uart: U) -> Self {
        NativeAdapter(uart)
    }

    /// Returns the wrapped peripheral.
    pub fn release(self) -> U {
        self.0
    }
}

#[cfg(feature = "impl-native")]
impl<U> LineChannel for NativeAdapter<U>
where
    U: embedded_hal_nb::serial::Read<u8> + embedded_hal_nb::serial::Write<u8>,
{
    type Error = U::Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.0.read()
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        self.0.write(byte)
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.0.flush()
    }
}
