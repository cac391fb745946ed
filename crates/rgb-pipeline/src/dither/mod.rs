//! Ordered dithering primitives.
//!
//! Every dithered conversion routine reduces to a handful of per-channel
//! formulas that share one threshold matrix. They are collected here so the
//! rounding rules live in exactly one place:
//!
//! - [`dither_channel`]: true-color and gray channels reduced to `prec` bits
//! - [`cube_level`]: channel reduced to a color-cube level
//! - [`gray_level`]: the cheap luma approximation used by gray targets

mod matrix;

pub use matrix::{dither_row, threshold, DITHER_MATRIX, DM_HEIGHT, DM_WIDTH};

/// Dither mode requested by a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherMode {
    /// Never dither.
    Off,
    /// Always dither when the target has a dithering routine.
    On,
    /// Dither only on targets where it is the default (colormapped 8-bit).
    #[default]
    Auto,
}

impl DitherMode {
    /// Whether the dithered routine should be used.
    #[inline]
    pub fn enabled(self, dither_by_default: bool) -> bool {
        match self {
            DitherMode::Off => false,
            DitherMode::On => true,
            DitherMode::Auto => dither_by_default,
        }
    }
}

/// Keep the top `prec` bits of an 8-bit channel.
#[inline]
pub fn truncate_channel(value: u32, prec: u8) -> u32 {
    if prec >= 8 {
        value << (prec - 8)
    } else {
        value >> (8 - prec)
    }
}

/// Reduce an 8-bit channel to `prec` bits after adding a scaled threshold.
///
/// `offset` is a matrix threshold scaled to `0..=252`. The carry term
/// `c1 >> prec` keeps full intensity from overflowing into the next bit.
#[inline]
pub fn dither_channel(value: u32, offset: u32, prec: u8) -> u32 {
    if prec == 0 {
        return 0;
    }
    if prec >= 8 {
        return truncate_channel(value, prec);
    }
    let c1 = value + (offset >> prec);
    (c1 - (c1 >> prec)) >> (8 - prec)
}

/// Cube level of an 8-bit channel for a cube with `shades` levels.
#[inline]
pub fn cube_level(value: u32, shades: u32, dith: u32) -> u32 {
    (value * (shades - 1) + dith) >> 8
}

/// `(g + (r + b) / 2) / 2`, rounded down at each step.
#[inline]
pub fn gray_level(r: u32, g: u32, b: u32) -> u32 {
    (g + ((b + r) >> 1)) >> 1
}
