//! Color cubes for colormapped displays.
//!
//! # Overview
//!
//! A display with a writable color table (pseudo color) can only show a few
//! hundred colors at once. The [`PaletteBuilder`] claims an evenly spaced
//! `nr x ng x nb` grid of them, the *color cube*, and the converters map
//! each RGB pixel to its nearest grid cell through a [`ColorCube`].
//!
//! Indexed images carry their own palette; a [`Colormap`] resolves those
//! indices through the cube once instead of per pixel.

mod builder;
mod colormap;
mod cube;

pub use builder::{BuiltCube, PaletteBuilder, CUBE_SIZES, DEFAULT_MIN_COLORS};
pub use colormap::{Colormap, MAX_COLORMAP_SIZE};
pub use cube::{ColorCube, CUBE_SIZE, DITHER_CUBE_SIZE};

/// Shade counts per channel of the active color cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shades {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub gray: u8,
}

impl Default for Shades {
    fn default() -> Self {
        Self {
            red: 6,
            green: 6,
            blue: 4,
            gray: 24,
        }
    }
}

impl Shades {
    #[inline]
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            ..Self::default()
        }
    }

    /// The full 6x6x6 cube, which has a dedicated dithering routine.
    #[inline]
    pub fn is_666(&self) -> bool {
        self.red == 6 && self.green == 6 && self.blue == 6
    }
}
