//! Bit-banged transmission over two output pins.
//!
//! Slower than hardware SPI but works on any pair of pins. Each byte is
//! shifted out MSB first: set the data line, pulse the clock high then low.

use embedded_hal::digital::OutputPin;
use embedded_hal::digital::PinState;

use crate::Error;

/// A data/clock pin pair driven by software.
pub struct BitBang<DI, CK> {
    data: DI,
    clock: CK,
}

impl<DI: OutputPin, CK: OutputPin> BitBang<DI, CK> {
    /// Drive both lines low so the first rising clock edge is a real bit.
    pub(crate) fn start(&mut self) -> Result<(), Error> {
        self.data.set_low().map_err(Error::pin)?;
        self.clock.set_low().map_err(Error::pin)
    }

    pub fn clock_in(&mut self, bit: bool) -> Result<(), Error> {
        self.data.set_state(PinState::from(bit)).map_err(Error::pin)?;
        self.clock.set_high().map_err(Error::pin)?;
        self.clock.set_low().map_err(Error::pin)
    }

    pub fn send_byte(&mut self, byte: u8) -> Result<(), Error> {
        for bit in (0..8).rev() {
            self.clock_in(byte & (1 << bit) != 0)?;
        }
        Ok(())
    }

    pub fn send(&mut self, bytes: &[u8]) -> Result<(), Error> {
        for &byte in bytes {
            self.send_byte(byte)?;
        }
        Ok(())
    }
}

impl<DI, CK> BitBang<DI, CK> {
    pub fn new(data: DI, clock: CK) -> Self {
        Self { data, clock }
    }

    /// Give the pins back. Their last driven levels are left as they are.
    pub fn release(self) -> (DI, CK) {
        (self.data, self.clock)
    }
}
