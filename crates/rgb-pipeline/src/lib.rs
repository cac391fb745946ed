#![allow(clippy::needless_range_loop, clippy::manual_range_contains)]

//! rgb-pipeline: device-adaptive true-color rendering
//!
//! This library converts 24-bit RGB (or 32-bit RGBx, 8-bit gray, or
//! palette-indexed) pixel data into whatever native pixel encoding a display
//! surface requires. Limited displays get a quantized color cube and ordered
//! dithering; deep displays get tight byte-shuffling packers.
//!
//! # Quick Start
//!
//! The [`RenderContext`] is the primary entry point. It owns a
//! [`DisplayBackend`] and initializes itself lazily on first use:
//!
//! ```
//! use rgb_pipeline::{DisplayBackend, DitherMode, DrawArea, MemoryDisplay, RenderContext};
//! use rgb_pipeline::{Visual, VisualClass};
//!
//! let visual = Visual::new(0x21, VisualClass::TrueColor, 16).with_masks(0xf800, 0x07e0, 0x001f);
//! let display = MemoryDisplay::new(vec![(visual, 16)], visual.id);
//! let mut ctx = RenderContext::new(display);
//!
//! let window = ctx.create_window(2, 1).unwrap();
//! let pixels = [255, 0, 0, 0, 0, 255];
//! ctx.draw_rgb(window, DrawArea::new(0, 0, 2, 1), DitherMode::Off, &pixels, 6)
//!     .unwrap();
//!
//! assert_eq!(ctx.backend().pixel(window, 0, 0), Some(0xf800));
//! assert_eq!(ctx.backend().pixel(window, 1, 0), Some(0x001f));
//! ```
//!
//! # Pipeline Overview
//!
//! ```text
//! caller buffer (RGB / RGBx / gray / indexed)
//!     |
//!     v
//! [Visual scorer]          (once: pick the best visual)
//!     |
//! [Palette builder]        (once: color cube for colormapped visuals)
//!     |
//! [Format selector]        (once: routine set for bpp/depth/order/masks)
//!     |
//!     v
//! ╔═════════════════════════════════════════════╗
//! ║  Per draw call                              ║
//! ║                                             ║
//! ║  tile into <= 256x64 chunks                 ║
//! ║      |                                      ║
//! ║  scratch region (bin-packed, 6 regions)     ║
//! ║      |                                      ║
//! ║  [stage to 24-bit]  (32-bit/gray/indexed)   ║
//! ║      |                                      ║
//! ║  conversion routine (+ ordered dither)      ║
//! ║      |                                      ║
//! ║  blit region onto destination surface       ║
//! ╚═════════════════════════════════════════════╝
//! ```
//!
//! # Ordered Dithering
//!
//! All dithered routines index one 8x8 threshold matrix
//! ([`dither::DITHER_MATRIX`]) by `(x + x_align) & 7` and `(y + y_align) & 7`.
//! The alignment is the destination position of the pixel, so adjacent
//! draws tile the pattern seamlessly. Green uses the inverted threshold,
//! which keeps luminance noise lower than dithering all channels in phase.
//!
//! # Color Cubes
//!
//! Pseudo-color displays get an `nr x ng x nb` cube carved out of the
//! hardware color table. The builder reuses colors that other clients
//! already allocated when they sit close enough to a cube cell, then
//! allocates the rest. Two lookup tables come out of it: a 4096-entry table
//! indexed by the top four bits of each channel, and a 512-entry table
//! indexed by per-channel cube levels for dithered rendering.

macro_rules! verbose_event {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+)
        } else {
            tracing::debug!($($arg)+)
        }
    };
}

pub mod backend;
pub mod context;
pub mod convert;
pub mod dither;
pub mod error;
pub mod palette;
pub mod scratch;
pub mod visual;

pub use backend::{
    BlitRect, ColorTableId, DisplayBackend, DisplayStats, MemoryDisplay, Rgb16, SurfaceId,
    SurfaceInfo,
};
pub use context::{DrawArea, RenderContext, RgbOptions};
pub use convert::{Conversion, Routine, RoutineSet};
pub use dither::DitherMode;
pub use error::{BackendError, RgbError};
pub use palette::{ColorCube, Colormap, PaletteBuilder, Shades};
pub use visual::{ByteOrder, ChannelMask, Visual, VisualClass, VisualId};
