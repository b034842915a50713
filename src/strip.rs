//! The strip driver.
//!
//! [`Lpd8806`] owns the transport and borrows a caller-supplied pixel buffer.
//! Pixels are stored in the buffer at the active [`ColorDepth`] and encoded
//! to wire bytes only when [`Lpd8806::show`] streams a frame.
//!
//! # Frame layout
//! For every LED, in index order, three bytes `G | 0x80`, `R | 0x80`,
//! `B | 0x80`, followed by [`compute_latch_bytes`] zero bytes. The zeros
//! latch the last blue channel and reset the chain for the next frame.
//! [`Lpd8806::begin`] sends the same zeros once to put the strip in a known
//! state.
//!
//! # Buffer
//! The buffer must hold at least [`compute_buffer_size`] bytes for the strip
//! length and depth. Changing the depth does not convert existing pixels:
//! they decode as garbage under the new layout until rewritten or cleared.

use core::convert::Infallible;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::OriginDimensions;
use embedded_graphics::geometry::Size;
use embedded_graphics::Pixel;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::color;
use crate::color::ColorDepth;
use crate::gpio::BitBang;
use crate::output::NoPin;
use crate::output::NoSpi;
use crate::output::Output;
use crate::Color;
use crate::Error;

/// LEDs a single zero byte can reset.
pub const LEDS_PER_LATCH_BYTE: u16 = 32;

/// Color data bytes always carry this bit; latch bytes never do.
const DATA_BIT: u8 = 0x80;

const ZEROS: [u8; LEDS_PER_LATCH_BYTE as usize] = [0; LEDS_PER_LATCH_BYTE as usize];

/// Zero bytes needed after a frame for a strip of `leds` LEDs.
pub const fn compute_latch_bytes(leds: u16) -> u16 {
    leds.div_ceil(LEDS_PER_LATCH_BYTE)
}

/// Buffer bytes needed to store `leds` pixels at `depth`.
pub const fn compute_buffer_size(leds: u16, depth: ColorDepth) -> usize {
    leds as usize * depth.bytes_per_pixel()
}

/// LPD8806 strip driver.
///
/// Not reentrant: all methods take `&mut self`, share the driver behind a
/// mutex if several tasks need it.
pub struct Lpd8806<'a, SPI, DI, CK> {
    output: Output<SPI, DI, CK>,
    pixels: Option<&'a mut [u8]>,
    depth: ColorDepth,
    num_leds: u16,
    latch_bytes: u16,
    begun: bool,
}

impl<'a, SPI> Lpd8806<'a, SPI, NoPin, NoPin> {
    /// A driver on a hardware SPI bus, 24-bit color and no buffer.
    pub fn new_spi(leds: u16, spi: SPI) -> Self {
        Self::new(leds, Output::Spi(spi))
    }
}

impl<'a, DI, CK> Lpd8806<'a, NoSpi, DI, CK> {
    /// A driver bit-banging `data` and `clock`, 24-bit color and no buffer.
    pub fn new_bit_bang(leds: u16, data: DI, clock: CK) -> Self {
        Self::new(leds, Output::BitBang(BitBang::new(data, clock)))
    }
}

impl<'a, SPI, DI, CK> Lpd8806<'a, SPI, DI, CK> {
    /// A driver on `output`, 24-bit color and no buffer.
    ///
    /// Nothing is sent until [`Lpd8806::begin`].
    pub fn new(leds: u16, output: Output<SPI, DI, CK>) -> Self {
        let mut strip = Self {
            output,
            pixels: None,
            depth: ColorDepth::default(),
            num_leds: 0,
            latch_bytes: 0,
            begun: false,
        };
        strip.update_length(leds);
        strip
    }

    pub fn with_color_depth(mut self, depth: impl Into<ColorDepth>) -> Self {
        self.set_color_depth(depth);
        self
    }

    /// Attach a pixel buffer. It is not cleared.
    pub fn with_buffer(mut self, pixels: &'a mut [u8]) -> Self {
        self.pixels = Some(pixels);
        self
    }

    pub fn num_pixels(&self) -> u16 {
        self.num_leds
    }

    pub fn color_depth(&self) -> ColorDepth {
        self.depth
    }

    pub fn latch_bytes(&self) -> u16 {
        self.latch_bytes
    }

    pub fn is_begun(&self) -> bool {
        self.begun
    }

    pub fn output(&self) -> &Output<SPI, DI, CK> {
        &self.output
    }

    /// Tear the driver apart, returning the output and the buffer.
    pub fn release(self) -> (Output<SPI, DI, CK>, Option<&'a mut [u8]>) {
        (self.output, self.pixels)
    }

    /// Bytes the pixel buffer must hold for the current length and depth.
    pub fn required_buffer_len(&self) -> usize {
        compute_buffer_size(self.num_leds, self.depth)
    }

    pub fn buffer(&self) -> Option<&[u8]> {
        self.pixels.as_deref()
    }

    /// Change the color depth.
    ///
    /// Accepts a [`ColorDepth`] or a nominal `u8` (1, 2, 3, 8, 15, 16, 21,
    /// 24). Other values disable the strip: nothing can be stored and
    /// [`Lpd8806::show`] fails with [`Error::ColorDepthDisabled`]. Use
    /// [`ColorDepth::try_from_nominal`] to reject bad values up front.
    ///
    /// Stored pixels are not converted.
    pub fn set_color_depth(&mut self, depth: impl Into<ColorDepth>) {
        self.depth = depth.into();
        if !self.depth.is_enabled() {
            warn!("unsupported color depth, strip disabled");
        }
    }

    /// Change the strip length.
    ///
    /// Recomputes the latch byte count and clears the pixel buffer.
    pub fn update_length(&mut self, leds: u16) {
        self.latch_bytes = compute_latch_bytes(leds);
        self.num_leds = leds;
        self.clear();
    }

    /// Swap in a new pixel buffer, returning the old one. Neither is cleared
    /// or checked.
    pub fn set_buffer(&mut self, pixels: &'a mut [u8]) -> Option<&'a mut [u8]> {
        self.pixels.replace(pixels)
    }

    pub fn take_buffer(&mut self) -> Option<&'a mut [u8]> {
        self.pixels.take()
    }

    /// Zero the pixels of the strip. Bytes past the strip's share of the
    /// buffer are left alone.
    pub fn clear(&mut self) {
        let len = self.required_buffer_len();
        if let Some(pixels) = self.pixels.as_deref_mut() {
            let len = len.min(pixels.len());
            pixels[..len].fill(0);
        }
    }

    /// Pack R, G, B for the current depth.
    pub fn color(&self, r: u8, g: u8, b: u8) -> u32 {
        color::pack(self.depth, r, g, b)
    }

    /// Pack a `0xRRGGBB` color for the current depth.
    pub fn color_rgb24(&self, rgb: u32) -> u32 {
        color::pack_rgb24(self.depth, rgb)
    }

    fn slot_mut(&mut self, n: u16) -> Option<&mut [u8]> {
        if n >= self.num_leds {
            return None;
        }
        let bpp = self.depth.bytes_per_pixel();
        let start = n as usize * bpp;
        self.pixels.as_deref_mut()?.get_mut(start..start + bpp)
    }

    fn slot(&self, n: u16) -> Option<&[u8]> {
        if n >= self.num_leds {
            return None;
        }
        let bpp = self.depth.bytes_per_pixel();
        let start = n as usize * bpp;
        self.pixels.as_deref()?.get(start..start + bpp)
    }

    /// Store an already packed color (see [`Lpd8806::color`]) at pixel `n`.
    ///
    /// Ignored if `n` is past the end of the strip or the buffer.
    pub fn set_pixel_color(&mut self, n: u16, packed: u32) {
        let depth = self.depth;
        if let Some(slot) = self.slot_mut(n) {
            color::store(depth, packed, slot);
        }
    }

    pub fn set_pixel_rgb(&mut self, n: u16, r: u8, g: u8, b: u8) {
        self.set_pixel_color(n, self.color(r, g, b));
    }

    /// Read back pixel `n` as a packed color.
    ///
    /// The stored components are scaled up one bit and re-packed, so this is
    /// an approximation of what was set: low bits dropped by the depth are
    /// not recovered. Returns 0 past the end of the strip, which is the same
    /// as black.
    pub fn get_pixel_color(&self, n: u16) -> u32 {
        self.slot(n)
            .map(|slot| color::repack(self.depth, slot))
            .unwrap_or(0)
    }

    /// Read back pixel `n` as 8-bit components.
    ///
    /// `None` past the end of the strip or while the depth is disabled.
    pub fn get_pixel_rgb(&self, n: u16) -> Option<Color> {
        if !self.depth.is_enabled() {
            return None;
        }
        let [g, r, b] = color::decode_grb(self.depth, self.slot(n)?);
        Some(Color::new(r << 1, g << 1, b << 1))
    }
}

impl<'a, SPI, DI, CK> Lpd8806<'a, SPI, DI, CK>
where
    SPI: SpiBus,
    DI: OutputPin,
    CK: OutputPin,
{
    /// Start the transport and prime the strip with latch bytes.
    ///
    /// May be called again; it just primes again.
    pub fn begin(&mut self) -> Result<(), Error> {
        self.start_output()?;
        self.begun = true;
        Ok(())
    }

    fn start_output(&mut self) -> Result<(), Error> {
        debug!(
            "starting output, {} latch bytes for {} leds",
            self.latch_bytes,
            self.num_leds
        );
        self.output.start()?;
        self.send_latch()
    }

    fn send_latch(&mut self) -> Result<(), Error> {
        let mut remaining = self.latch_bytes as usize;
        while remaining > 0 {
            let n = remaining.min(ZEROS.len());
            self.output.send(&ZEROS[..n])?;
            remaining -= n;
        }
        self.output.flush()
    }

    /// Stream the pixel buffer to the strip.
    ///
    /// Sends exactly `3 * num_pixels() + latch_bytes()` bytes. Nothing is
    /// sent if the depth is disabled, there is no buffer or it is too short.
    pub fn show(&mut self) -> Result<(), Error> {
        if !self.depth.is_enabled() {
            warn!("show with color depth disabled");
            return Err(Error::ColorDepthDisabled);
        }
        let len = self.required_buffer_len();
        let Some(pixels) = self.pixels.as_deref() else {
            warn!("show without a pixel buffer");
            return Err(Error::NoBuffer);
        };
        if pixels.len() < len {
            warn!("pixel buffer too small: {} < {}", pixels.len(), len);
            return Err(Error::BufferTooSmall {
                expected: len,
                actual: pixels.len(),
            });
        }

        trace!("show {} leds at {}", self.num_leds, self.depth);
        for slot in pixels[..len].chunks_exact(self.depth.bytes_per_pixel()) {
            let grb = color::decode_grb(self.depth, slot).map(|c| c | DATA_BIT);
            self.output.send(&grb)?;
        }
        self.send_latch()
    }

    /// Switch to hardware SPI, handing back the previous output.
    ///
    /// If [`Lpd8806::begin`] was already called the previous output is
    /// stopped and the strip re-primed over the new bus. If stopping the
    /// current output fails nothing changes and the new output is handed back
    /// with the error. If priming the new output fails it stays installed
    /// and the previous output is handed back with the error.
    pub fn use_spi(
        &mut self,
        spi: SPI,
    ) -> Result<Output<SPI, DI, CK>, (Error, Output<SPI, DI, CK>)> {
        self.set_output(Output::Spi(spi))
    }

    /// Switch to bit-banging `data` and `clock`, handing back the previous
    /// output. See [`Lpd8806::use_spi`].
    pub fn use_bit_bang(
        &mut self,
        data: DI,
        clock: CK,
    ) -> Result<Output<SPI, DI, CK>, (Error, Output<SPI, DI, CK>)> {
        self.set_output(Output::BitBang(BitBang::new(data, clock)))
    }

    pub fn set_output(
        &mut self,
        output: Output<SPI, DI, CK>,
    ) -> Result<Output<SPI, DI, CK>, (Error, Output<SPI, DI, CK>)> {
        debug!(
            "switching output to {}",
            if output.is_spi() { "spi" } else { "bit-bang" }
        );
        if self.begun {
            if let Err(e) = self.output.stop() {
                return Err((e, output));
            }
        }
        let previous = core::mem::replace(&mut self.output, output);
        if self.begun {
            if let Err(e) = self.start_output() {
                return Err((e, previous));
            }
        }
        Ok(previous)
    }
}

impl<SPI, DI, CK> OriginDimensions for Lpd8806<'_, SPI, DI, CK> {
    fn size(&self) -> Size {
        Size::new(self.num_leds as u32, 1)
    }
}

/// Draws into the pixel buffer; call [`Lpd8806::show`] to display it.
/// The strip is a single row, pixels off that row are ignored.
impl<SPI, DI, CK> DrawTarget for Lpd8806<'_, SPI, DI, CK> {
    type Color = Color;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if p.y != 0 || p.x < 0 || p.x >= self.num_leds as i32 {
                continue;
            }
            let packed = color::pack_rgb888(self.depth, c);
            self.set_pixel_color(p.x as u16, packed);
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl<SPI, DI, CK> defmt::Format for Lpd8806<'_, SPI, DI, CK> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Lpd8806 leds: {}, depth: {}, latch_bytes: {}, begun: {}, spi: {}",
            self.num_leds,
            self.depth,
            self.latch_bytes,
            self.begun,
            self.output.is_spi()
        );
    }
}
