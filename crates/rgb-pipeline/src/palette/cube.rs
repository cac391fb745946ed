/// Entries in the direct lookup cube: 4 bits per channel.
pub const CUBE_SIZE: usize = 4096;

/// Entries in the dithering cube: 3 bits per channel.
pub const DITHER_CUBE_SIZE: usize = 512;

/// Lookup tables from quantized RGB to allocated pixel values.
///
/// `lookup` is indexed by the top nibble of each channel
/// (`rrrr gggg bbbb`), `dithered` by per-channel cube levels
/// (`rrr ggg bbb`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorCube {
    lookup: Vec<u32>,
    dithered: Vec<u32>,
}

impl Default for ColorCube {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorCube {
    /// A cube mapping everything to pixel 0.
    pub fn new() -> Self {
        Self {
            lookup: vec![0; CUBE_SIZE],
            dithered: vec![0; DITHER_CUBE_SIZE],
        }
    }

    /// Build both tables from the pixels of an `nr x ng x nb` cube, stored
    /// red-major: `pixels[(r * ng + g) * nb + b]`.
    pub fn from_pixels(pixels: &[u32], nr: u8, ng: u8, nb: u8) -> Self {
        let (nr, ng, nb) = (nr as u32, ng as u32, nb as u32);
        debug_assert!(nr >= 2 && ng >= 2 && nb >= 2);
        debug_assert_eq!(pixels.len() as u32, nr * ng * nb);

        // Nearest level for a 4-bit channel value i (i * 17 widens to 8 bits).
        let level = |i: u32, n: u32| (i * 17 * (n - 1) + 128) >> 8;
        let mut rt = [0u32; 16];
        let mut gt = [0u32; 16];
        let mut bt = [0u32; 16];
        for i in 0..16u32 {
            rt[i as usize] = ng * nb * level(i, nr);
            gt[i as usize] = nb * level(i, ng);
            bt[i as usize] = level(i, nb);
        }

        let mut cube = Self::new();
        for i in 0..CUBE_SIZE {
            let index = rt[i >> 8] + gt[(i >> 4) & 15] + bt[i & 15];
            cube.lookup[i] = pixels[index as usize];
        }
        for i in 0..DITHER_CUBE_SIZE as u32 {
            let r = (nr - 1).min(i >> 6);
            let g = (ng - 1).min((i >> 3) & 7);
            let b = (nb - 1).min(i & 7);
            cube.dithered[i as usize] = pixels[((r * ng + g) * nb + b) as usize];
        }
        cube
    }

    /// Fake cube for gray-scale tables: every RGB maps to the pixel of its
    /// gray level, `gray_pixels[(g + (r + b) / 2) / 2]`.
    pub fn from_gray_pixels(gray_pixels: &[u32; 256]) -> Self {
        let mut cube = Self::new();
        for i in 0..CUBE_SIZE {
            let r = (i >> 4) & 0xf0;
            let r = r | (r >> 4);
            let g = i & 0xf0;
            let g = g | (g >> 4);
            let b = (i << 4) & 0xf0;
            let b = b | (b >> 4);
            let gray = (g + ((r + b) >> 1)) >> 1;
            cube.lookup[i] = gray_pixels[gray];
        }
        cube
    }

    /// Lookup index of an 8-bit RGB triple.
    #[inline]
    pub fn index(r: u8, g: u8, b: u8) -> usize {
        (((r & 0xf0) as usize) << 4) | (g & 0xf0) as usize | (b >> 4) as usize
    }

    /// Lookup index of a packed `0xRRGGBB` value.
    #[inline]
    pub fn index_rgb24(rgb: u32) -> usize {
        (((rgb & 0xf0_0000) >> 12) | ((rgb & 0xf000) >> 8) | ((rgb & 0xf0) >> 4)) as usize
    }

    /// Dithering index of the 2x2x2 cube for a packed `0xRRGGBB` value,
    /// taking the top bit of each channel.
    #[inline]
    pub fn index_222_rgb24(rgb: u32) -> usize {
        (((rgb & 0x80_0000) >> 17) | ((rgb & 0x8000) >> 12) | ((rgb & 0x80) >> 7)) as usize
    }

    #[inline]
    pub fn lookup(&self, index: usize) -> u32 {
        self.lookup[index]
    }

    #[inline]
    pub fn dithered(&self, index: usize) -> u32 {
        self.dithered[index]
    }

    pub fn set_dithered(&mut self, index: usize, pixel: u32) {
        self.dithered[index] = pixel;
    }

    pub fn lookup_table(&self) -> &[u32] {
        &self.lookup
    }

    pub fn dithered_table(&self) -> &[u32] {
        &self.dithered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_pixels(n: u32) -> Vec<u32> {
        (0..n).collect()
    }

    #[test]
    fn test_table_sizes() {
        let cube = ColorCube::from_pixels(&identity_pixels(216), 6, 6, 6);
        assert_eq!(cube.lookup_table().len(), CUBE_SIZE);
        assert_eq!(cube.dithered_table().len(), DITHER_CUBE_SIZE);
    }

    #[test]
    fn test_lookup_corners() {
        let cube = ColorCube::from_pixels(&identity_pixels(6 * 6 * 4), 6, 6, 4);
        assert_eq!(cube.lookup(ColorCube::index(0, 0, 0)), 0);
        assert_eq!(cube.lookup(ColorCube::index(255, 255, 255)), 6 * 6 * 4 - 1);
        assert_eq!(cube.lookup(ColorCube::index(0, 0, 255)), 3);
        assert_eq!(cube.lookup(ColorCube::index(255, 0, 0)), 5 * 6 * 4);
    }

    #[test]
    fn test_lookup_rounds_to_nearest_level() {
        let cube = ColorCube::from_pixels(&identity_pixels(8), 2, 2, 2);
        // Nibble 7 widens to 119 (< 128): level 0. Nibble 8 widens to 136: level 1.
        assert_eq!(cube.lookup(ColorCube::index(0x70, 0, 0)), 0);
        assert_eq!(cube.lookup(ColorCube::index(0x80, 0, 0)), 4);
    }

    #[test]
    fn test_dithered_clamps_levels() {
        let cube = ColorCube::from_pixels(&identity_pixels(6 * 6 * 4), 6, 6, 4);
        // Blue level 7 clamps to the last of 4 blue levels.
        assert_eq!(cube.dithered(7), 3);
        assert_eq!(cube.dithered((5 << 6) | (5 << 3) | 3), 6 * 6 * 4 - 1);
    }

    #[test]
    fn test_index_helpers_agree() {
        assert_eq!(ColorCube::index(0x12, 0x34, 0x56), ColorCube::index_rgb24(0x123456));
        assert_eq!(ColorCube::index_222_rgb24(0xff00ff), (1 << 6) | 1);
        assert_eq!(ColorCube::index_222_rgb24(0x008000), 1 << 3);
    }

    #[test]
    fn test_gray_cube_uses_gray_level() {
        let mut pixels = [0u32; 256];
        for (i, p) in pixels.iter_mut().enumerate() {
            *p = 1000 + i as u32;
        }
        let cube = ColorCube::from_gray_pixels(&pixels);
        assert_eq!(cube.lookup(ColorCube::index(255, 255, 255)), 1255);
        assert_eq!(cube.lookup(ColorCube::index(0, 0, 0)), 1000);
        // Pure green: (255 + 0) / 2
        assert_eq!(cube.lookup(ColorCube::index(0, 255, 0)), 1127);
    }
}
