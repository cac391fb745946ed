//! The format decision table.

use super::{Conversion, Routine, RoutineSet};
use crate::backend::SurfaceInfo;
use crate::error::RgbError;
use crate::palette::Shades;
use crate::visual::{ByteOrder, Visual, VisualClass};

const MASKS_565: (u32, u32, u32) = (0xf800, 0x07e0, 0x001f);
const MASKS_555: (u32, u32, u32) = (0x7c00, 0x03e0, 0x001f);
const MASKS_RGB: (u32, u32, u32) = (0xff_0000, 0x00_ff00, 0x00_00ff);
const MASKS_BGR: (u32, u32, u32) = (0x00_00ff, 0x00_ff00, 0xff_0000);

/// Everything routine selection depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatKey {
    pub class: VisualClass,
    pub depth: u8,
    pub bits_per_pixel: u8,
    pub byte_order: ByteOrder,
    /// Byte order the native 16-bit routines are tuned for.
    pub host_order: ByteOrder,
    pub masks: (u32, u32, u32),
    pub shades: Shades,
    /// Surfaces are 1-bit bitmaps.
    pub bitmap: bool,
}

impl FormatKey {
    pub fn new(visual: &Visual, info: &SurfaceInfo, shades: Shades, bitmap: bool) -> Self {
        Self {
            class: visual.class,
            depth: visual.depth,
            bits_per_pixel: info.bits_per_pixel,
            byte_order: info.byte_order,
            host_order: ByteOrder::host(),
            masks: visual.masks(),
            shades,
            bitmap,
        }
    }

    fn byte_reversed(&self) -> bool {
        self.byte_order != self.host_order
    }
}

/// Pick the routine set for a format.
///
/// Rules are tried most specific first; the first match wins. A rule that
/// provides no dithered routine reuses the plain one.
pub fn select_routines(key: &FormatKey) -> Result<RoutineSet, RgbError> {
    let truecolor = key.class.is_truecolor();
    let order = key.byte_order;
    let (bpp, depth) = (key.bits_per_pixel, key.depth);

    let mut rgb_dither = None;
    let mut gray = Conversion::StagedGray;
    let mut indexed = Conversion::StagedIndexed;
    let mut dither_by_default = false;

    let rgb = if key.bitmap {
        Routine::Mono
    } else if bpp == 16 && depth == 16 && key.masks == MASKS_565 && !key.byte_reversed() {
        rgb_dither = Some(Routine::Rgb565Dither(order));
        gray = Conversion::Direct(Routine::Rgb565Gray(order));
        Routine::Rgb565(order)
    } else if bpp == 16 && depth == 16 && truecolor && key.masks == MASKS_565 {
        Routine::Rgb565(order)
    } else if bpp == 16 && depth == 15 && truecolor && key.masks == MASKS_555 {
        Routine::Rgb555(order)
    } else if bpp == 24 && depth == 24 && truecolor && key.masks == MASKS_RGB {
        match order {
            ByteOrder::LsbFirst => Routine::Bgr888,
            ByteOrder::MsbFirst => Routine::Rgb888,
        }
    } else if bpp == 24 && depth == 24 && truecolor && key.masks == MASKS_BGR {
        match order {
            ByteOrder::LsbFirst => Routine::Rgb888,
            ByteOrder::MsbFirst => Routine::Bgr888,
        }
    } else if bpp == 32 && depth == 24 && truecolor && key.masks == MASKS_RGB {
        match order {
            ByteOrder::LsbFirst => Routine::Bgrx8888,
            ByteOrder::MsbFirst => Routine::Xrgb8888,
        }
    } else if bpp == 32 && depth == 24 && truecolor && key.masks == MASKS_BGR {
        match order {
            ByteOrder::LsbFirst => Routine::Rgbx8888,
            ByteOrder::MsbFirst => Routine::Xbgr8888,
        }
    } else if truecolor {
        rgb_dither = Some(Routine::TrueColorDither(order));
        Routine::TrueColor(order)
    } else if bpp == 8
        && depth == 8
        && matches!(key.class, VisualClass::PseudoColor | VisualClass::GrayScale)
    {
        dither_by_default = true;
        if key.class != VisualClass::GrayScale {
            rgb_dither = Some(if key.shades.is_666() {
                Routine::Cube8Dither666
            } else {
                Routine::Cube8Dither
            });
        }
        indexed = Conversion::Direct(Routine::Indexed8);
        gray = Conversion::GrayColormap;
        Routine::Cube8
    } else if bpp == 8 && depth == 8 && key.class == VisualClass::StaticGray {
        gray = Conversion::Direct(Routine::Gray8Copy);
        Routine::Gray8
    } else if bpp == 8 && (2..8).contains(&depth) && key.class.is_gray() {
        rgb_dither = Some(Routine::GrayNDither);
        Routine::GrayN
    } else if bpp == 8 && (3..8).contains(&depth) {
        Routine::Cube222Dither
    } else if bpp == 4 && (2..=4).contains(&depth) && key.class.is_gray() {
        rgb_dither = Some(Routine::GrayNPackedDither);
        Routine::GrayNPacked
    } else {
        return Err(RgbError::UnsupportedVisual {
            class: key.class,
            depth,
            bits_per_pixel: bpp,
            byte_order: order,
        });
    };

    Ok(RoutineSet {
        rgb,
        rgb_dither: rgb_dither.unwrap_or(rgb),
        rgb32: Conversion::StagedRgb32,
        rgb32_dither: Conversion::StagedRgb32,
        gray,
        gray_dither: Conversion::StagedGray,
        indexed,
        indexed_dither: Conversion::StagedIndexed,
        dither_by_default,
    })
}
