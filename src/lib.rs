//! Driver for LPD8806 based RGB LED strips.
//!
//! The LPD8806 is a two wire (data + clock) chip where each LED driver
//! consumes the first three bytes it sees (green, red, blue) and passes
//! everything after that down the chain. Color bytes always have their top
//! bit set; a zero byte resets the pass-through state. A zero byte only
//! travels 32 LEDs, so a strip of `n` LEDs needs `ceil(n / 32)` of them after
//! every frame. Sending fewer looks fine on the first frame and silently
//! drops data at the end of the strip on the next one.
//!
//! The driver writes colors into a caller-owned pixel buffer and streams it
//! out either over an `embedded-hal` [`SpiBus`](embedded_hal::spi::SpiBus) or
//! by toggling two [`OutputPin`](embedded_hal::digital::OutputPin)s.
//!
//! # Example
//! ```rust,no_run
//! # fn demo<SPI: embedded_hal::spi::SpiBus>(spi: SPI) -> Result<(), lpd8806::Error> {
//! use lpd8806::ColorDepth;
//! use lpd8806::Lpd8806;
//!
//! const LEDS: u16 = 64;
//! let mut pixels = [0u8; lpd8806::compute_buffer_size(LEDS, ColorDepth::Bits16)];
//!
//! let mut strip = Lpd8806::new_spi(LEDS, spi)
//!     .with_color_depth(ColorDepth::Bits16)
//!     .with_buffer(&mut pixels);
//! strip.begin()?;
//!
//! strip.set_pixel_rgb(0, 255, 0, 0);
//! strip.set_pixel_rgb(1, 0, 255, 0);
//! strip.show()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//! - `log`: log through the `log` crate.
//! - `defmt`: log through `defmt` and implement `defmt::Format` for public
//!   types.
#![no_std]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod color;
pub mod gpio;
pub mod output;
pub mod spi;
pub mod strip;

#[cfg(test)]
mod testing;

use core::fmt::Display;
use core::fmt::Formatter;

use embedded_graphics::pixelcolor::Rgb888;

pub use color::ColorDepth;
pub use output::NoPin;
pub use output::NoSpi;
pub use output::Output;
pub use strip::compute_buffer_size;
pub use strip::compute_latch_bytes;
pub use strip::Lpd8806;

pub type Color = Rgb888;

/// Errors reported by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The SPI bus failed a write or flush.
    Spi(embedded_hal::spi::ErrorKind),
    /// A data or clock pin could not be driven.
    Pin(embedded_hal::digital::ErrorKind),
    /// No pixel buffer has been attached.
    NoBuffer,
    /// The pixel buffer is shorter than the strip needs.
    BufferTooSmall { expected: usize, actual: usize },
    /// The color depth is [`ColorDepth::Disabled`].
    ColorDepthDisabled,
    /// A nominal color depth that is not one of 1, 2, 3, 8, 15, 16, 21, 24.
    InvalidColorDepth(u8),
}

impl Error {
    pub(crate) fn spi<E: embedded_hal::spi::Error>(e: E) -> Self {
        Self::Spi(e.kind())
    }

    pub(crate) fn pin<E: embedded_hal::digital::Error>(e: E) -> Self {
        Self::Pin(e.kind())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(kind) => write!(f, "SPI error: {kind}"),
            Self::Pin(kind) => write!(f, "pin error: {kind}"),
            Self::NoBuffer => write!(f, "no pixel buffer"),
            Self::BufferTooSmall { expected, actual } => write!(
                f,
                "pixel buffer too small: expected {expected} bytes, got {actual}"
            ),
            Self::ColorDepthDisabled => write!(f, "color depth is disabled"),
            Self::InvalidColorDepth(depth) => write!(f, "invalid color depth: {depth}"),
        }
    }
}

impl core::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Spi(kind) => defmt::write!(f, "SPI error: {}", defmt::Debug2Format(kind)),
            Self::Pin(kind) => defmt::write!(f, "pin error: {}", defmt::Debug2Format(kind)),
            Self::NoBuffer => defmt::write!(f, "no pixel buffer"),
            Self::BufferTooSmall { expected, actual } => defmt::write!(
                f,
                "pixel buffer too small: expected {} bytes, got {}",
                expected,
                actual
            ),
            Self::ColorDepthDisabled => defmt::write!(f, "color depth is disabled"),
            Self::InvalidColorDepth(depth) => defmt::write!(f, "invalid color depth: {}", depth),
        }
    }
}
