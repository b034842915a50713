//! Packed pixel colors for LPD8806 strips.
//!
//! The LPD8806 only has 7 bits of brightness per channel, and the data byte
//! for each channel must have its top bit set on the wire. Pixels can be
//! stored in three densities to trade color resolution for RAM:
//!
//! | depth    | bytes | layout                           |
//! |----------|-------|----------------------------------|
//! | `Bits8`  | 1     | `RRRGGGBB`                       |
//! | `Bits16` | 2     | `0RRRRRGG GGGBBBBB` (5:5:5)      |
//! | `Bits24` | 3     | `0GGGGGGG 0RRRRRRR 0BBBBBBB`     |
//!
//! The 24-bit layout is already in the strip's G, R, B order so it can be
//! streamed without being unpacked. The 8 and 16-bit layouts are plain packed
//! integers and are decoded to wire components at transmission time.
//!
//! All conversions are lossy truncations, there is no gamma or color-space
//! handling.

use core::fmt;

use bitfield::bitfield;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::pixelcolor::RgbColor;

use crate::Error;

/// Mask of the 7 brightness bits in a wire byte.
pub const WIRE_MASK: u8 = 0x7f;

/// Number of bytes used to store one pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ColorDepth {
    /// An unsupported depth was requested. Nothing is stored or shown.
    Disabled = 0,
    /// 8-bit color, 3:3:2.
    Bits8 = 1,
    /// 15-bit "high color", 5:5:5 in two bytes.
    Bits16 = 2,
    /// 21-bit color, 7:7:7 in three bytes, wire order.
    #[default]
    Bits24 = 3,
}

impl ColorDepth {
    /// Maps a nominal depth to a `ColorDepth`.
    ///
    /// Accepts the byte counts `1`, `2`, `3` and the bit counts `8`, `15`,
    /// `16`, `21`, `24`. Anything else becomes [`ColorDepth::Disabled`].
    pub const fn from_nominal(depth: u8) -> Self {
        match depth {
            1 | 8 => Self::Bits8,
            2 | 15 | 16 => Self::Bits16,
            3 | 21 | 24 => Self::Bits24,
            _ => Self::Disabled,
        }
    }

    /// Like [`ColorDepth::from_nominal`] but rejects unsupported values.
    pub const fn try_from_nominal(depth: u8) -> Result<Self, Error> {
        match Self::from_nominal(depth) {
            Self::Disabled => Err(Error::InvalidColorDepth(depth)),
            depth => Ok(depth),
        }
    }

    pub const fn bytes_per_pixel(self) -> usize {
        self as usize
    }

    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

impl From<u8> for ColorDepth {
    fn from(depth: u8) -> Self {
        Self::from_nominal(depth)
    }
}

impl fmt::Display for ColorDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::Bits8 => write!(f, "8-bit"),
            Self::Bits16 => write!(f, "16-bit"),
            Self::Bits24 => write!(f, "24-bit"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ColorDepth {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Disabled => defmt::write!(f, "disabled"),
            Self::Bits8 => defmt::write!(f, "8-bit"),
            Self::Bits16 => defmt::write!(f, "16-bit"),
            Self::Bits24 => defmt::write!(f, "24-bit"),
        }
    }
}

bitfield! {
    /// An 8-bit packed color, `RRRGGGBB`.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct Color8(u8);
    impl Debug;
    pub red, set_red: 7, 5;
    pub green, set_green: 4, 2;
    pub blue, set_blue: 1, 0;
}

bitfield! {
    /// A 15-bit packed color in a `u16`, `0RRRRRGG GGGBBBBB`.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct Color16(u16);
    impl Debug;
    pub red, set_red: 14, 10;
    pub green, set_green: 9, 5;
    pub blue, set_blue: 4, 0;
}

impl Color8 {
    /// Packs 8-bit components, keeping the top 3:3:2 bits.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self((r & 0b1110_0000) | (g & 0b1110_0000) >> 3 | (b & 0b1100_0000) >> 6)
    }
}

impl Color16 {
    /// Packs 8-bit components, keeping the top 5 bits of each.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(
            ((r & 0b1111_1000) as u16) << 7
                | ((g & 0b1111_1000) as u16) << 2
                | ((b & 0b1111_1000) as u16) >> 3,
        )
    }
}

// Component extractors. Each returns the channel as a wire-range value
// (0..=127) with the surviving bits in the high positions.

pub fn red8(c8: u8) -> u8 {
    Color8(c8).red() << 4
}

pub fn green8(c8: u8) -> u8 {
    Color8(c8).green() << 4
}

pub fn blue8(c8: u8) -> u8 {
    Color8(c8).blue() << 5
}

pub fn red16(c16: u16) -> u8 {
    (Color16(c16).red() << 2) as u8
}

pub fn green16(c16: u16) -> u8 {
    (Color16(c16).green() << 2) as u8
}

pub fn blue16(c16: u16) -> u8 {
    (Color16(c16).blue() << 2) as u8
}

/// Packs R, G, B components for the given depth.
///
/// The 24-bit result is in wire order, `0x00GGRRBB`, with each byte holding
/// the top 7 bits of its channel.
pub const fn pack(depth: ColorDepth, r: u8, g: u8, b: u8) -> u32 {
    match depth {
        ColorDepth::Disabled => 0,
        ColorDepth::Bits8 => Color8::from_rgb(r, g, b).0 as u32,
        ColorDepth::Bits16 => Color16::from_rgb(r, g, b).0 as u32,
        ColorDepth::Bits24 => {
            ((g >> 1) as u32) << 16 | ((r >> 1) as u32) << 8 | (b >> 1) as u32
        }
    }
}

/// Packs a `0xRRGGBB` color for the given depth.
pub const fn pack_rgb24(depth: ColorDepth, color: u32) -> u32 {
    pack(depth, (color >> 16) as u8, (color >> 8) as u8, color as u8)
}

/// Packs an `embedded-graphics` color for the given depth.
pub fn pack_rgb888(depth: ColorDepth, color: Rgb888) -> u32 {
    pack(depth, color.r(), color.g(), color.b())
}

/// Widens an 8-bit packed color into the 5:5:5 layout.
///
/// Each channel lands in the high bits of its 5-bit field, the low bits are
/// zero.
pub fn color8_to_16(c8: u8) -> u16 {
    let c8 = Color8(c8);
    let mut c16 = Color16(0);
    c16.set_red((c8.red() as u16) << 2);
    c16.set_green((c8.green() as u16) << 2);
    c16.set_blue((c8.blue() as u16) << 3);
    c16.0
}

/// Lifts a packed color of the given depth into the 24-bit wire layout.
pub fn to_grb(depth: ColorDepth, packed: u32) -> u32 {
    let mut bytes = [0u8; 3];
    store(depth, packed, &mut bytes);
    let [g, r, b] = decode_grb(depth, &bytes);
    (g as u32) << 16 | (r as u32) << 8 | b as u32
}

/// Writes a packed color into a pixel slot of `depth.bytes_per_pixel()`
/// bytes. Multi-byte colors are stored most significant byte first.
pub fn store(depth: ColorDepth, packed: u32, slot: &mut [u8]) {
    match depth {
        ColorDepth::Disabled => {}
        ColorDepth::Bits8 => slot[0] = packed as u8,
        ColorDepth::Bits16 => {
            slot[0] = (packed >> 8) as u8;
            slot[1] = packed as u8;
        }
        ColorDepth::Bits24 => {
            slot[0] = (packed >> 16) as u8;
            slot[1] = (packed >> 8) as u8;
            slot[2] = packed as u8;
        }
    }
}

/// Decodes a stored pixel slot into wire-range components, in G, R, B order.
pub fn decode_grb(depth: ColorDepth, slot: &[u8]) -> [u8; 3] {
    match depth {
        ColorDepth::Disabled => [0; 3],
        ColorDepth::Bits8 => [green8(slot[0]), red8(slot[0]), blue8(slot[0])],
        ColorDepth::Bits16 => {
            let c16 = u16::from_be_bytes([slot[0], slot[1]]);
            [green16(c16), red16(c16), blue16(c16)]
        }
        ColorDepth::Bits24 => [
            slot[0] & WIRE_MASK,
            slot[1] & WIRE_MASK,
            slot[2] & WIRE_MASK,
        ],
    }
}

/// Approximates the packed color a stored slot was set from.
///
/// Components are shifted up one bit from wire range and re-packed with
/// `depth`. This does not round-trip exactly: the low bits lost on the way
/// in are not recovered.
pub fn repack(depth: ColorDepth, slot: &[u8]) -> u32 {
    let [g, r, b] = decode_grb(depth, slot);
    pack(depth, r << 1, g << 1, b << 1)
}
