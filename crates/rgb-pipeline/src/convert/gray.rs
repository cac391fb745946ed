//! Routines for gray surfaces.
//!
//! Packed variants store two pixels per byte, the left pixel in the high
//! nibble. An odd trailing pixel leaves the low nibble zero.

use super::{Align, Source, Target};
use crate::dither::{dither_row, gray_level, threshold};

/// Gray reduced to `depth` bits by truncation.
#[inline]
fn gray_plain(px: &[u8], depth: u8) -> u8 {
    let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
    ((g + ((b + r) >> 1)) >> (9 - depth as u32)) as u8
}

/// Gray reduced to `depth` bits after adding the matrix threshold `m`.
#[inline]
fn gray_dithered(px: &[u8], depth: u8, m: u32) -> u8 {
    let prec = depth as u32;
    let mut gray = gray_level(px[0] as u32, px[1] as u32, px[2] as u32);
    gray += (m << 2) >> prec;
    ((gray - (gray >> prec)) >> (8 - prec)) as u8
}

pub(super) fn convert_gray8(target: &mut Target<'_>, source: &Source<'_>) {
    let x0 = target.x as usize;
    let width = source.width as usize;
    for y in 0..source.height {
        let src = source.row(y, 3);
        let out = target.row_mut(y, x0, width);
        for (px, dst) in src.chunks_exact(3).zip(out.iter_mut()) {
            *dst = gray_level(px[0] as u32, px[1] as u32, px[2] as u32) as u8;
        }
    }
}

pub(super) fn convert_gray8_copy(target: &mut Target<'_>, source: &Source<'_>) {
    let x0 = target.x as usize;
    let width = source.width as usize;
    for y in 0..source.height {
        target
            .row_mut(y, x0, width)
            .copy_from_slice(source.row(y, 1));
    }
}

pub(super) fn convert_gray_n(depth: u8, target: &mut Target<'_>, source: &Source<'_>) {
    let x0 = target.x as usize;
    let width = source.width as usize;
    for y in 0..source.height {
        let src = source.row(y, 3);
        let out = target.row_mut(y, x0, width);
        for (px, dst) in src.chunks_exact(3).zip(out.iter_mut()) {
            *dst = gray_plain(px, depth);
        }
    }
}

pub(super) fn convert_gray_n_dither(
    depth: u8,
    target: &mut Target<'_>,
    source: &Source<'_>,
    align: Align,
) {
    let x0 = target.x as usize;
    let width = source.width as usize;
    for y in 0..source.height {
        let row = dither_row(align.row(y));
        let src = source.row(y, 3);
        let out = target.row_mut(y, x0, width);
        for (x, (px, dst)) in src.chunks_exact(3).zip(out.iter_mut()).enumerate() {
            *dst = gray_dithered(px, depth, threshold(row, align.col(x as u32)));
        }
    }
}

pub(super) fn convert_gray_n_packed(depth: u8, target: &mut Target<'_>, source: &Source<'_>) {
    let x0 = (target.x >> 1) as usize;
    let width = source.width as usize;
    for y in 0..source.height {
        let src = source.row(y, 3);
        let out = target.row_mut(y, x0, width.div_ceil(2));
        for (pair, dst) in src.chunks(6).zip(out.iter_mut()) {
            let high = gray_plain(&pair[..3], depth);
            let low = if pair.len() == 6 {
                gray_plain(&pair[3..], depth)
            } else {
                0
            };
            *dst = (high << 4) | low;
        }
    }
}

pub(super) fn convert_gray_n_packed_dither(
    depth: u8,
    target: &mut Target<'_>,
    source: &Source<'_>,
    align: Align,
) {
    let x0 = (target.x >> 1) as usize;
    let width = source.width as usize;
    for y in 0..source.height {
        let row = dither_row(align.row(y));
        let src = source.row(y, 3);
        let out = target.row_mut(y, x0, width.div_ceil(2));
        for (i, (pair, dst)) in src.chunks(6).zip(out.iter_mut()).enumerate() {
            let x = 2 * i as u32;
            let high = gray_dithered(&pair[..3], depth, threshold(row, align.col(x)));
            let low = if pair.len() == 6 {
                gray_dithered(&pair[3..], depth, threshold(row, align.col(x + 1)))
            } else {
                0
            };
            *dst = (high << 4) | low;
        }
    }
}
