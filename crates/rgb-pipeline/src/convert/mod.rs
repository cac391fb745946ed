//! Pixel conversion routines.
//!
//! # Overview
//!
//! Each [`Routine`] turns a rectangle of caller pixels into the native
//! encoding of one family of surfaces. The set of routines for a display is
//! chosen once by [`select_routines`] and stored in a [`RoutineSet`]; the
//! draw path then runs them without inspecting the format again.
//!
//! ```text
//! source (rgb / rgb32 / gray / indexed)
//!     |
//!     +-- Direct(routine) ---------------------------+
//!     |                                              |
//!     +-- Staged*: expand into the 24-bit stage -----+--> rgb or rgb_dither
//!     |                                              |
//!     +-- GrayColormap: indexed routine, gray table -+
//! ```
//!
//! Routines write exactly `width x height` destination pixels and read
//! exactly `width x height x channels` source bytes per call.

pub mod pack;
mod gray;
mod mono;
mod pseudo;
mod select;
mod stage;
mod truecolor;

pub use select::{select_routines, FormatKey};
pub use stage::{StageBuffer, STAGE_ROWSTRIDE};

use crate::error::RgbError;
use crate::palette::{ColorCube, Colormap, Shades};
use crate::visual::{ByteOrder, Visual};
use pack::by_order;
use truecolor::{
    convert_555, convert_565, convert_565_dither, convert_565_gray, convert_truecolor,
    convert_truecolor_dither,
};

/// A rectangle of caller pixels.
#[derive(Debug, Clone, Copy)]
pub struct Source<'a> {
    pub data: &'a [u8],
    pub rowstride: usize,
    pub width: u32,
    pub height: u32,
}

impl<'a> Source<'a> {
    pub fn new(data: &'a [u8], rowstride: usize, width: u32, height: u32) -> Self {
        Self {
            data,
            rowstride,
            width,
            height,
        }
    }

    /// Row `y`, exactly `width * channels` bytes.
    #[inline]
    pub fn row(&self, y: u32, channels: usize) -> &'a [u8] {
        let start = y as usize * self.rowstride;
        &self.data[start..start + self.width as usize * channels]
    }

    /// Bytes a buffer must hold for this rectangle; the last row needs no
    /// padding. `None` when the size does not fit in `usize`.
    pub fn required_len(&self, channels: usize) -> Option<usize> {
        if self.width == 0 || self.height == 0 {
            return Some(0);
        }
        (self.height as usize - 1)
            .checked_mul(self.rowstride)?
            .checked_add((self.width as usize).checked_mul(channels)?)
    }
}

/// Destination memory of a scratch surface and the pixel offset to write at.
#[derive(Debug)]
pub struct Target<'a> {
    pub data: &'a mut [u8],
    pub bytes_per_line: usize,
    pub x: u32,
    pub y: u32,
}

impl<'a> Target<'a> {
    /// `len` bytes of destination row `y` (relative to the target offset),
    /// starting `byte_x` bytes into the line.
    #[inline]
    pub fn row_mut(&mut self, y: u32, byte_x: usize, len: usize) -> &mut [u8] {
        let start = (self.y + y) as usize * self.bytes_per_line + byte_x;
        &mut self.data[start..start + len]
    }
}

/// Dither matrix phase: destination position of the first source pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Align {
    pub x: u32,
    pub y: u32,
}

impl Align {
    #[inline]
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub(crate) fn row(self, y: u32) -> u32 {
        self.y.wrapping_add(y)
    }

    #[inline]
    pub(crate) fn col(self, x: u32) -> u32 {
        self.x.wrapping_add(x)
    }
}

/// Context-wide data the routines read.
#[derive(Debug, Clone, Copy)]
pub struct ConvertState<'a> {
    pub visual: &'a Visual,
    pub cube: &'a ColorCube,
    pub shades: Shades,
    pub bytes_per_pixel: usize,
    /// Palette of the image being drawn, for indexed sources.
    pub colormap: Option<&'a Colormap>,
    /// Identity gray palette, for gray sources on 8-bit colormapped visuals.
    pub gray_colormap: Option<&'a Colormap>,
}

/// A specialized conversion routine.
///
/// 24 and 32 bit routines are named by the byte layout they write in memory,
/// so `Bgrx8888` writes blue, green, red, then a pad byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Routine {
    /// 1 bit per pixel, threshold dithered.
    Mono,
    Rgb565(ByteOrder),
    Rgb565Dither(ByteOrder),
    /// 565 from a gray source.
    Rgb565Gray(ByteOrder),
    Rgb555(ByteOrder),
    Rgb888,
    Bgr888,
    Bgrx8888,
    Xrgb8888,
    Rgbx8888,
    Xbgr8888,
    /// Any mask layout, one to four bytes per pixel.
    TrueColor(ByteOrder),
    TrueColorDither(ByteOrder),
    /// Color cube lookup, one byte per pixel.
    Cube8,
    Cube8Dither666,
    Cube8Dither,
    /// Indexed source through the colormap lut.
    Indexed8,
    Gray8,
    /// Gray source onto an 8-bit gray surface.
    Gray8Copy,
    /// Gray at 2 to 7 bits, one byte per pixel.
    GrayN,
    GrayNDither,
    /// Gray at 2 to 4 bits, two pixels per byte.
    GrayNPacked,
    GrayNPackedDither,
    /// Dithered 2x2x2 cube for 3 to 7 bit colormapped visuals.
    Cube222Dither,
}

impl Routine {
    /// Source bytes per pixel this routine reads.
    pub fn source_channels(self) -> usize {
        match self {
            Routine::Rgb565Gray(_) | Routine::Gray8Copy | Routine::Indexed8 => 1,
            _ => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Routine::Mono => "mono",
            Routine::Rgb565(ByteOrder::LsbFirst) => "565-lsb",
            Routine::Rgb565(ByteOrder::MsbFirst) => "565-msb",
            Routine::Rgb565Dither(ByteOrder::LsbFirst) => "565-dither-lsb",
            Routine::Rgb565Dither(ByteOrder::MsbFirst) => "565-dither-msb",
            Routine::Rgb565Gray(ByteOrder::LsbFirst) => "565-gray-lsb",
            Routine::Rgb565Gray(ByteOrder::MsbFirst) => "565-gray-msb",
            Routine::Rgb555(ByteOrder::LsbFirst) => "555-lsb",
            Routine::Rgb555(ByteOrder::MsbFirst) => "555-msb",
            Routine::Rgb888 => "rgb888",
            Routine::Bgr888 => "bgr888",
            Routine::Bgrx8888 => "bgrx8888",
            Routine::Xrgb8888 => "xrgb8888",
            Routine::Rgbx8888 => "rgbx8888",
            Routine::Xbgr8888 => "xbgr8888",
            Routine::TrueColor(ByteOrder::LsbFirst) => "truecolor-lsb",
            Routine::TrueColor(ByteOrder::MsbFirst) => "truecolor-msb",
            Routine::TrueColorDither(ByteOrder::LsbFirst) => "truecolor-dither-lsb",
            Routine::TrueColorDither(ByteOrder::MsbFirst) => "truecolor-dither-msb",
            Routine::Cube8 => "cube8",
            Routine::Cube8Dither666 => "cube8-dither-666",
            Routine::Cube8Dither => "cube8-dither",
            Routine::Indexed8 => "indexed8",
            Routine::Gray8 => "gray8",
            Routine::Gray8Copy => "gray8-copy",
            Routine::GrayN => "gray",
            Routine::GrayNDither => "gray-dither",
            Routine::GrayNPacked => "gray-packed",
            Routine::GrayNPackedDither => "gray-packed-dither",
            Routine::Cube222Dither => "cube222-dither",
        }
    }

    /// Convert `source` into `target`. Only an indexed routine without a
    /// colormap fails.
    pub fn convert(
        self,
        state: &ConvertState<'_>,
        target: &mut Target<'_>,
        source: &Source<'_>,
        align: Align,
    ) -> Result<(), RgbError> {
        match self {
            Routine::Mono => mono::convert_mono(target, source, align),
            Routine::Rgb565(order) => by_order!(order, convert_565(target, source)),
            Routine::Rgb565Dither(order) => by_order!(order, convert_565_dither(target, source, align)),
            Routine::Rgb565Gray(order) => by_order!(order, convert_565_gray(target, source)),
            Routine::Rgb555(order) => by_order!(order, convert_555(target, source)),
            Routine::Rgb888 => truecolor::convert_bytes(target, source, [0, 1, 2], 3),
            Routine::Bgr888 => truecolor::convert_bytes(target, source, [2, 1, 0], 3),
            Routine::Bgrx8888 => truecolor::convert_bytes(target, source, [2, 1, 0], 4),
            Routine::Xrgb8888 => truecolor::convert_bytes(target, source, [1, 2, 3], 4),
            Routine::Rgbx8888 => truecolor::convert_bytes(target, source, [0, 1, 2], 4),
            Routine::Xbgr8888 => truecolor::convert_bytes(target, source, [3, 2, 1], 4),
            Routine::TrueColor(order) => by_order!(order, convert_truecolor(state, target, source)),
            Routine::TrueColorDither(order) => {
                by_order!(order, convert_truecolor_dither(state, target, source, align))
            }
            Routine::Cube8 => pseudo::convert_cube8(state.cube, target, source),
            Routine::Cube8Dither666 => pseudo::convert_cube8_dither_666(state.cube, target, source, align),
            Routine::Cube8Dither => pseudo::convert_cube8_dither(state, target, source, align),
            Routine::Indexed8 => {
                let colormap = state.colormap.ok_or(RgbError::MissingColormap)?;
                pseudo::convert_indexed8(colormap, target, source)
            }
            Routine::Gray8 => gray::convert_gray8(target, source),
            Routine::Gray8Copy => gray::convert_gray8_copy(target, source),
            Routine::GrayN => gray::convert_gray_n(state.visual.depth, target, source),
            Routine::GrayNDither => gray::convert_gray_n_dither(state.visual.depth, target, source, align),
            Routine::GrayNPacked => gray::convert_gray_n_packed(state.visual.depth, target, source),
            Routine::GrayNPackedDither => {
                gray::convert_gray_n_packed_dither(state.visual.depth, target, source, align)
            }
            Routine::Cube222Dither => pseudo::convert_cube222_dither(state.cube, target, source, align),
        }
        Ok(())
    }
}

/// How one source kind reaches the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// A routine that reads this source kind directly.
    Direct(Routine),
    /// Drop the pad byte into the stage, then run the RGB routine.
    StagedRgb32,
    /// Replicate gray into the stage, then run the RGB routine.
    StagedGray,
    /// Resolve indices through the colormap into the stage, then run the
    /// RGB routine.
    StagedIndexed,
    /// Treat gray values as indices into the identity gray colormap.
    GrayColormap,
}

impl Conversion {
    pub fn name(self) -> &'static str {
        match self {
            Conversion::Direct(routine) => routine.name(),
            Conversion::StagedRgb32 => "staged-rgb32",
            Conversion::StagedGray => "staged-gray",
            Conversion::StagedIndexed => "staged-indexed",
            Conversion::GrayColormap => "gray-colormap",
        }
    }
}

/// Everything selected for one display format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoutineSet {
    pub rgb: Routine,
    pub rgb_dither: Routine,
    pub rgb32: Conversion,
    pub rgb32_dither: Conversion,
    pub gray: Conversion,
    pub gray_dither: Conversion,
    pub indexed: Conversion,
    pub indexed_dither: Conversion,
    /// `Auto` dithering resolves to on.
    pub dither_by_default: bool,
}

impl RoutineSet {
    /// Whether dithering changes anything on this format.
    pub fn is_ditherable(&self) -> bool {
        self.rgb != self.rgb_dither
    }
}

/// Run one conversion, staging the source first when needed.
#[allow(clippy::too_many_arguments)]
pub fn execute(
    set: &RoutineSet,
    conversion: Conversion,
    dithered: bool,
    state: &ConvertState<'_>,
    target: &mut Target<'_>,
    source: &Source<'_>,
    align: Align,
    stage: &mut StageBuffer,
) -> Result<(), RgbError> {
    let rgb = if dithered { set.rgb_dither } else { set.rgb };
    match conversion {
        Conversion::Direct(routine) => routine.convert(state, target, source, align),
        Conversion::StagedRgb32 => {
            let staged = stage.stage_rgb32(source);
            rgb.convert(state, target, &staged, align)
        }
        Conversion::StagedGray => {
            let staged = stage.stage_gray(source);
            rgb.convert(state, target, &staged, align)
        }
        Conversion::StagedIndexed => {
            let colormap = state.colormap.ok_or(RgbError::MissingColormap)?;
            let staged = stage.stage_indexed(source, colormap);
            rgb.convert(state, target, &staged, align)
        }
        Conversion::GrayColormap => {
            let state = ConvertState {
                colormap: state.gray_colormap,
                ..*state
            };
            execute(set, set.indexed, false, &state, target, source, align, stage)
        }
    }
}
