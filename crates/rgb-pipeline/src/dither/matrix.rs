//! The ordered-dither threshold matrix.

pub const DM_WIDTH: usize = 8;
pub const DM_HEIGHT: usize = 8;

/// 8x8 Bayer matrix holding every threshold in `0..64` exactly once.
pub const DITHER_MATRIX: [[u8; DM_WIDTH]; DM_HEIGHT] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Matrix row for destination row `y` (already offset by the alignment).
#[inline]
pub fn dither_row(y: u32) -> &'static [u8; DM_WIDTH] {
    &DITHER_MATRIX[(y as usize) & (DM_HEIGHT - 1)]
}

/// Threshold at column `x` of a row returned by [`dither_row`].
#[inline]
pub fn threshold(row: &[u8; DM_WIDTH], x: u32) -> u32 {
    row[(x as usize) & (DM_WIDTH - 1)] as u32
}
