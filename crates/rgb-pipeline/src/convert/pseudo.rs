//! Routines for colormapped surfaces: color cube lookups and indexed images.

use super::{Align, ConvertState, Source, Target};
use crate::dither::{cube_level, dither_row, threshold};
use crate::palette::{ColorCube, Colormap};

pub(super) fn convert_cube8(cube: &ColorCube, target: &mut Target<'_>, source: &Source<'_>) {
    let x0 = target.x as usize;
    let width = source.width as usize;
    for y in 0..source.height {
        let src = source.row(y, 3);
        let out = target.row_mut(y, x0, width);
        for (px, dst) in src.chunks_exact(3).zip(out.iter_mut()) {
            *dst = cube.lookup(ColorCube::index(px[0], px[1], px[2])) as u8;
        }
    }
}

pub(super) fn convert_cube8_dither_666(
    cube: &ColorCube,
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
            let dith = (threshold(row, align.col(x as u32)) << 2) | 7;
            let r = cube_level(px[0] as u32, 6, dith);
            let g = cube_level(px[1] as u32, 6, 262 - dith);
            let b = cube_level(px[2] as u32, 6, dith);
            *dst = cube.dithered(((r << 6) | (g << 3) | b) as usize) as u8;
        }
    }
}

pub(super) fn convert_cube8_dither(
    state: &ConvertState<'_>,
    target: &mut Target<'_>,
    source: &Source<'_>,
    align: Align,
) {
    let shades = state.shades;
    let (nr, ng, nb) = (shades.red as u32, shades.green as u32, shades.blue as u32);
    let x0 = target.x as usize;
    let width = source.width as usize;
    for y in 0..source.height {
        let row = dither_row(align.row(y));
        let src = source.row(y, 3);
        let out = target.row_mut(y, x0, width);
        for (x, (px, dst)) in src.chunks_exact(3).zip(out.iter_mut()).enumerate() {
            let dith = (threshold(row, align.col(x as u32)) << 2) | 7;
            let r = cube_level(px[0] as u32, nr, dith);
            let g = cube_level(px[1] as u32, ng, 262 - dith);
            let b = cube_level(px[2] as u32, nb, dith);
            *dst = state.cube.dithered(((r << 6) | (g << 3) | b) as usize) as u8;
        }
    }
}

pub(super) fn convert_indexed8(colormap: &Colormap, target: &mut Target<'_>, source: &Source<'_>) {
    let x0 = target.x as usize;
    let width = source.width as usize;
    for y in 0..source.height {
        let src = source.row(y, 1);
        let out = target.row_mut(y, x0, width);
        for (&index, dst) in src.iter().zip(out.iter_mut()) {
            *dst = colormap.lut_entry(index);
        }
    }
}

/// One bit per channel: the threshold decides whether each channel is on.
pub(super) fn convert_cube222_dither(
    cube: &ColorCube,
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
            let dith = (threshold(row, align.col(x as u32)) << 2) | 3;
            let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
            let index = (((r + dith) & 0x100) >> 2)
                | (((g + 258 - dith) & 0x100) >> 5)
                | (((b + dith) & 0x100) >> 8);
            *dst = cube.dithered(index as usize) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Shades;
    use crate::visual::{Visual, VisualClass};

    fn identity_cube(n: u8) -> ColorCube {
        let count = n as u32 * n as u32 * n as u32;
        ColorCube::from_pixels(&(0..count).collect::<Vec<_>>(), n, n, n)
    }

    fn target(data: &mut [u8], bytes_per_line: usize) -> Target<'_> {
        Target {
            data,
            bytes_per_line,
            x: 0,
            y: 0,
        }
    }

    #[test]
    fn test_cube8_lookup() {
        let cube = identity_cube(6);
        let mut out = vec![0u8; 2];
        convert_cube8(&cube, &mut target(&mut out, 2), &Source::new(&[0, 0, 0, 255, 255, 255], 6, 2, 1));
        assert_eq!(out, vec![0, 215]);
    }

    #[test]
    fn test_dither_666_matches_general() {
        let cube = identity_cube(6);
        let visual = Visual::new(1, VisualClass::PseudoColor, 8);
        let state = ConvertState {
            visual: &visual,
            cube: &cube,
            shades: Shades::rgb(6, 6, 6),
            bytes_per_pixel: 1,
            colormap: None,
            gray_colormap: None,
        };
        let pixels: Vec<u8> = (0..8 * 8 * 3).map(|i| (i * 37 % 256) as u8).collect();
        let source = Source::new(&pixels, 24, 8, 8);
        let mut fast = vec![0u8; 64];
        let mut general = vec![0u8; 64];
        convert_cube8_dither_666(&cube, &mut target(&mut fast, 8), &source, Align::new(2, 1));
        convert_cube8_dither(&state, &mut target(&mut general, 8), &source, Align::new(2, 1));
        assert_eq!(fast, general);
    }

    #[test]
    fn test_dithered_mid_gray_mixes_levels() {
        let cube = identity_cube(6);
        let gray = [128u8; 8 * 8 * 3];
        let mut out = vec![0u8; 64];
        convert_cube8_dither_666(&cube, &mut target(&mut out, 8), &Source::new(&gray, 24, 8, 8), Align::default());
        let mut distinct = out.clone();
        distinct.sort_unstable();
        distinct.dedup();
        assert!(distinct.len() >= 2, "mid gray must dither between cube levels");
    }

    #[test]
    fn test_indexed8_uses_lut() {
        let cube = identity_cube(2);
        let colormap = Colormap::new(&[0x000000, 0xffffff], Some(&cube)).unwrap();
        let mut out = vec![9u8; 3];
        convert_indexed8(&colormap, &mut target(&mut out, 3), &Source::new(&[1, 0, 1], 3, 3, 1));
        assert_eq!(out, vec![7, 0, 7]);
    }

    #[test]
    fn test_cube222_extremes() {
        let mut cube = ColorCube::new();
        for index in 0..512 {
            cube.set_dithered(index, index as u32);
        }
        let mut out = vec![0u8; 2];
        convert_cube222_dither(
            &cube,
            &mut target(&mut out, 2),
            &Source::new(&[255, 255, 255, 0, 0, 0], 6, 2, 1),
            Align::default(),
        );
        assert_eq!(out[0] as usize, (1 << 6) | (1 << 3) | 1);
        assert_eq!(out[1], 0);
    }
}
