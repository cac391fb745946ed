//! Routines for true and direct color surfaces.

use super::pack::{pack_channel, PixelOrder};
use super::{Align, ConvertState, Source, Target};
use crate::dither::{dither_channel, dither_row, threshold};

#[inline]
fn pack_565(r: u32, g: u32, b: u32) -> u32 {
    ((r & 0xf8) << 8) | ((g & 0xfc) << 3) | (b >> 3)
}

pub(super) fn convert_565<O: PixelOrder>(target: &mut Target<'_>, source: &Source<'_>) {
    let x0 = target.x as usize * 2;
    let width = source.width as usize;
    for y in 0..source.height {
        let src = source.row(y, 3);
        let out = target.row_mut(y, x0, width * 2);
        for (px, dst) in src.chunks_exact(3).zip(out.chunks_exact_mut(2)) {
            O::store(dst, pack_565(px[0] as u32, px[1] as u32, px[2] as u32));
        }
    }
}

pub(super) fn convert_565_gray<O: PixelOrder>(target: &mut Target<'_>, source: &Source<'_>) {
    let x0 = target.x as usize * 2;
    let width = source.width as usize;
    for y in 0..source.height {
        let src = source.row(y, 1);
        let out = target.row_mut(y, x0, width * 2);
        for (&g, dst) in src.iter().zip(out.chunks_exact_mut(2)) {
            let g = g as u32;
            O::store(dst, pack_565(g, g, g));
        }
    }
}

pub(super) fn convert_565_dither<O: PixelOrder>(
    target: &mut Target<'_>,
    source: &Source<'_>,
    align: Align,
) {
    let x0 = target.x as usize * 2;
    let width = source.width as usize;
    for y in 0..source.height {
        let row = dither_row(align.row(y));
        let src = source.row(y, 3);
        let out = target.row_mut(y, x0, width * 2);
        for (x, (px, dst)) in src.chunks_exact(3).zip(out.chunks_exact_mut(2)).enumerate() {
            let dith = threshold(row, align.col(x as u32)) << 2;
            let r = dither_channel(px[0] as u32, dith, 5);
            let g = dither_channel(px[1] as u32, 252 - dith, 6);
            let b = dither_channel(px[2] as u32, dith, 5);
            O::store(dst, (r << 11) | (g << 5) | b);
        }
    }
}

pub(super) fn convert_555<O: PixelOrder>(target: &mut Target<'_>, source: &Source<'_>) {
    let x0 = target.x as usize * 2;
    let width = source.width as usize;
    for y in 0..source.height {
        let src = source.row(y, 3);
        let out = target.row_mut(y, x0, width * 2);
        for (px, dst) in src.chunks_exact(3).zip(out.chunks_exact_mut(2)) {
            let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
            O::store(dst, ((r & 0xf8) << 7) | ((g & 0xf8) << 2) | (b >> 3));
        }
    }
}

/// Byte shuffle for 8-bit channels: red, green and blue land at the given
/// byte offsets of each `bytes_per_pixel` wide pixel, the rest is zeroed.
pub(super) fn convert_bytes(
    target: &mut Target<'_>,
    source: &Source<'_>,
    positions: [usize; 3],
    bytes_per_pixel: usize,
) {
    let x0 = target.x as usize * bytes_per_pixel;
    let width = source.width as usize;
    for y in 0..source.height {
        let src = source.row(y, 3);
        let out = target.row_mut(y, x0, width * bytes_per_pixel);
        if bytes_per_pixel == 3 && positions == [0, 1, 2] {
            out.copy_from_slice(src);
            continue;
        }
        for (px, dst) in src.chunks_exact(3).zip(out.chunks_exact_mut(bytes_per_pixel)) {
            dst.fill(0);
            dst[positions[0]] = px[0];
            dst[positions[1]] = px[1];
            dst[positions[2]] = px[2];
        }
    }
}

/// Shift-and-mask packing for any channel layout.
pub(super) fn convert_truecolor<O: PixelOrder>(
    state: &ConvertState<'_>,
    target: &mut Target<'_>,
    source: &Source<'_>,
) {
    let bpp = state.bytes_per_pixel;
    let visual = state.visual;
    let x0 = target.x as usize * bpp;
    let width = source.width as usize;
    for y in 0..source.height {
        let src = source.row(y, 3);
        let out = target.row_mut(y, x0, width * bpp);
        for (px, dst) in src.chunks_exact(3).zip(out.chunks_exact_mut(bpp)) {
            O::store(dst, visual.encode_rgb(px[0] as u32, px[1] as u32, px[2] as u32));
        }
    }
}

pub(super) fn convert_truecolor_dither<O: PixelOrder>(
    state: &ConvertState<'_>,
    target: &mut Target<'_>,
    source: &Source<'_>,
    align: Align,
) {
    let bpp = state.bytes_per_pixel;
    let visual = state.visual;
    let (red, green, blue) = (visual.red, visual.green, visual.blue);
    let x0 = target.x as usize * bpp;
    let width = source.width as usize;
    for y in 0..source.height {
        let row = dither_row(align.row(y));
        let src = source.row(y, 3);
        let out = target.row_mut(y, x0, width * bpp);
        for (x, (px, dst)) in src.chunks_exact(3).zip(out.chunks_exact_mut(bpp)).enumerate() {
            let dith = threshold(row, align.col(x as u32)) << 2;
            let r = dither_channel(px[0] as u32, dith, red.prec);
            let g = dither_channel(px[1] as u32, 252 - dith, green.prec);
            let b = dither_channel(px[2] as u32, dith, blue.prec);
            O::store(
                dst,
                pack_channel(r, red) | pack_channel(g, green) | pack_channel(b, blue),
            );
        }
    }
}
