//! Error types for the rendering pipeline.

use thiserror::Error;

use crate::visual::{ByteOrder, VisualClass};

/// Errors surfaced by [`RenderContext`](crate::RenderContext).
#[derive(Debug, Error)]
pub enum RgbError {
    #[error("No usable visual available")]
    NoVisuals,

    #[error("Visual type={class} depth={depth}, image bpp={bits_per_pixel}, {byte_order} first is not supported")]
    UnsupportedVisual {
        class: VisualClass,
        depth: u8,
        bits_per_pixel: u8,
        byte_order: ByteOrder,
    },

    #[error("Unable to allocate a color cube, even in a private color table")]
    PaletteExhausted,

    #[error("Unable to allocate scratch images")]
    ScratchUnavailable,

    #[error("Unable to create a {width}x{height} surface")]
    SurfaceUnavailable { width: u32, height: u32 },

    #[error("Too many colors for colormap: {count} (max 256)")]
    TooManyColors { count: usize },

    #[error("Buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("Draw rectangle of {width}x{height} with row stride {rowstride} overflows")]
    BufferOverflow {
        width: u32,
        height: u32,
        rowstride: usize,
    },

    #[error("Indexed conversion without a colormap")]
    MissingColormap,

    #[error("Display error: {0}")]
    Backend(#[from] BackendError),
}

/// Errors reported by a [`DisplayBackend`](crate::DisplayBackend).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Unknown surface: {0}")]
    UnknownSurface(u32),

    #[error("Unknown color table: {0}")]
    UnknownColorTable(u32),

    #[error("Incompatible surfaces: {src_bpp} bpp onto {dst_bpp} bpp")]
    IncompatibleSurfaces { src_bpp: u8, dst_bpp: u8 },

    #[error("Source rectangle {width}x{height}+{x}+{y} is outside the surface")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}
