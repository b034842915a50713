//! Selects how bytes reach the strip.
//!
//! [`Output`] is either a hardware SPI bus or a bit-banged pin pair. A
//! driver that only ever uses one of them can fill the other type
//! parameters with [`NoSpi`] or [`NoPin`].

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::gpio::BitBang;
use crate::spi;
use crate::Error;

/// Byte transmission strategy.
pub enum Output<SPI, DI, CK> {
    /// Hardware SPI, MOSI and SCK on the peripheral's pins.
    Spi(SPI),
    /// Software SPI on arbitrary pins.
    BitBang(BitBang<DI, CK>),
}

impl<SPI, DI, CK> Output<SPI, DI, CK> {
    pub fn is_spi(&self) -> bool {
        matches!(self, Self::Spi(_))
    }

    pub fn is_bit_bang(&self) -> bool {
        matches!(self, Self::BitBang(_))
    }
}

impl<SPI, DI, CK> Output<SPI, DI, CK>
where
    SPI: SpiBus,
    DI: OutputPin,
    CK: OutputPin,
{
    /// Bring the transport to an idle state, ready for the first byte.
    pub(crate) fn start(&mut self) -> Result<(), Error> {
        match self {
            // bus setup (mode, bit order, clock) belongs to the HAL
            Self::Spi(_) => Ok(()),
            Self::BitBang(bb) => bb.start(),
        }
    }

    pub(crate) fn send(&mut self, bytes: &[u8]) -> Result<(), Error> {
        match self {
            Self::Spi(bus) => spi::write(bus, bytes),
            Self::BitBang(bb) => bb.send(bytes),
        }
    }

    /// Wait for queued bytes to leave. Bit-banged bytes are already out.
    pub(crate) fn flush(&mut self) -> Result<(), Error> {
        match self {
            Self::Spi(bus) => spi::flush(bus),
            Self::BitBang(_) => Ok(()),
        }
    }

    /// Finish with this transport before another one takes over.
    pub(crate) fn stop(&mut self) -> Result<(), Error> {
        self.flush()
    }
}

/// Placeholder pin for drivers that never bit-bang.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoPin;

impl embedded_hal::digital::ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Placeholder bus for drivers that only bit-bang.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoSpi;

impl embedded_hal::spi::ErrorType for NoSpi {
    type Error = Infallible;
}

impl SpiBus for NoSpi {
    fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn write(&mut self, _words: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
