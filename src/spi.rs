//! Hardware SPI transmission.
//!
//! The strip only needs MOSI and SCK. Configure the bus with [`MODE`], MSB
//! first, before handing it to the driver. The LPD8806 is rated up to 20MHz
//! but unshielded wiring to the strip usually tops out well below that;
//! 2MHz is a safe starting point.
//!
//! Only one driver should own a given bus at a time. Share it through an
//! `embedded-hal-bus` style wrapper if other devices live on the same bus.

use embedded_hal::spi::Mode;
use embedded_hal::spi::SpiBus;
use embedded_hal::spi::MODE_0;

use crate::Error;

/// SPI mode the strip expects: clock idles low, data sampled on the rising
/// edge.
pub const MODE: Mode = MODE_0;

/// Queue `bytes` on the bus.
pub(crate) fn write<SPI: SpiBus>(spi: &mut SPI, bytes: &[u8]) -> Result<(), Error> {
    spi.write(bytes).map_err(Error::spi)
}

/// Block until everything queued has been clocked out.
pub(crate) fn flush<SPI: SpiBus>(spi: &mut SPI) -> Result<(), Error> {
    spi.flush().map_err(Error::spi)
}
