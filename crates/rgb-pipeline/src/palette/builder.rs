//! Color cube allocation.
//!
//! Allocating a cube is a negotiation with whatever else already lives in
//! the color table. [`PaletteBuilder::try_build_cube`] makes one attempt at
//! a given size:
//!
//! 1. On a shared table, refuse cubes smaller than the minimum-colors
//!    threshold outright, before touching the table.
//! 2. Claim existing cells that lie close to a cube cell (squared distance
//!    below 192), keeping only the closest claim per cell.
//! 3. Probe that the remaining cells fit by bulk-allocating and freeing them.
//! 4. Allocate the remaining cells at their exact grid colors.
//!
//! Any failure releases everything claimed during the attempt, so a failed
//! attempt never leaks table entries. [`PaletteBuilder::build_best_cube`]
//! walks [`CUBE_SIZES`] from largest to smallest.

use super::ColorCube;
use crate::backend::{ColorTableId, DisplayBackend, Rgb16};

/// Cube sizes tried in order, largest first.
pub const CUBE_SIZES: [(u8, u8, u8); 9] = [
    (6, 6, 6),
    (6, 6, 5),
    (6, 6, 4),
    (5, 5, 5),
    (5, 5, 4),
    (4, 4, 4),
    (4, 4, 3),
    (3, 3, 3),
    (2, 2, 2),
];

/// Smallest cube worth building in a shared table.
pub const DEFAULT_MIN_COLORS: u32 = 125;

/// Existing cells farther than this (squared, 8-bit units) are not reused.
const REUSE_THRESHOLD: u32 = 192;

/// A successfully allocated cube.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltCube {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub cube: ColorCube,
    /// Allocated pixels, red-major.
    pub pixels: Vec<u32>,
}

/// Allocates color cubes in one color table.
pub struct PaletteBuilder<'a, B: DisplayBackend> {
    backend: &'a mut B,
    table: ColorTableId,
    private: bool,
    install: bool,
    min_colors: u32,
}

impl<'a, B: DisplayBackend> PaletteBuilder<'a, B> {
    /// Builder for `table`; `private` marks a table this context owns.
    pub fn new(backend: &'a mut B, table: ColorTableId, private: bool) -> Self {
        Self {
            backend,
            table,
            private,
            install: false,
            min_colors: DEFAULT_MIN_COLORS,
        }
    }

    /// Skip reuse of existing cells and allocate every cube color fresh.
    #[inline]
    pub fn install(mut self, install: bool) -> Self {
        self.install = install;
        self
    }

    #[inline]
    pub fn min_colors(mut self, min_colors: u32) -> Self {
        self.min_colors = min_colors;
        self
    }

    /// Try to allocate an `nr x ng x nb` cube. `None` leaves the table as
    /// it was before the attempt.
    pub fn try_build_cube(&mut self, nr: u8, ng: u8, nb: u8) -> Option<BuiltCube> {
        if nr < 2 || ng < 2 || nb < 2 {
            return None;
        }
        let n = nr as usize * ng as usize * nb as usize;
        if !self.private && (n as u32) < self.min_colors {
            tracing::debug!(nr, ng, nb, min_colors = self.min_colors, "Cube below minimum for shared table");
            return None;
        }

        self.backend.sync_color_table(self.table, false);

        let mut best = vec![REUSE_THRESHOLD; n];
        let mut pixels: Vec<Option<u32>> = vec![None; n];
        let mut colors_needed = n;

        if !self.install && !cfg!(feature = "gamma") {
            let existing = self.backend.table_colors(self.table);
            let (nr32, ng32, nb32) = (nr as u32, ng as u32, nb as u32);
            for color in existing.iter().take(256) {
                let [r, g, b] = color.to_rgb8().map(u32::from);
                let ri = (r * (nr32 - 1) + 128) >> 8;
                let gi = (g * (ng32 - 1) + 128) >> 8;
                let bi = (b * (nb32 - 1) + 128) >> 8;
                let r0 = ri * 255 / (nr32 - 1);
                let g0 = gi * 255 / (ng32 - 1);
                let b0 = bi * 255 / (nb32 - 1);
                let idx = ((ri * ng32 + gi) * nb32 + bi) as usize;
                let d2 = r.abs_diff(r0).pow(2) + g.abs_diff(g0).pow(2) + b.abs_diff(b0).pow(2);
                if d2 >= best[idx] {
                    continue;
                }
                match pixels[idx].take() {
                    Some(previous) => self.backend.free_colors(self.table, &[previous]),
                    None => colors_needed -= 1,
                }
                match self.backend.alloc_color(self.table, *color) {
                    Some(pixel) => {
                        pixels[idx] = Some(pixel);
                        best[idx] = d2;
                    }
                    None => {
                        tracing::debug!(nr, ng, nb, "Error allocating existing color");
                        self.release(&pixels);
                        return None;
                    }
                }
            }
        }

        if colors_needed > 0 {
            match self.backend.alloc_colors(self.table, colors_needed) {
                Some(junk) => self.backend.free_colors(self.table, &junk),
                None => {
                    tracing::debug!(nr, ng, nb, colors_needed, "Not enough free cells for cube");
                    self.release(&pixels);
                    return None;
                }
            }
        }

        let mut i = 0;
        for r in 0..nr as u32 {
            for g in 0..ng as u32 {
                for b in 0..nb as u32 {
                    if pixels[i].is_none() {
                        let color = grid_color(r, nr, g, ng, b, nb);
                        match self.backend.alloc_color(self.table, color) {
                            Some(pixel) => pixels[i] = Some(pixel),
                            None => {
                                tracing::debug!(nr, ng, nb, "Cube allocation failed");
                                self.release(&pixels);
                                return None;
                            }
                        }
                    }
                    tracing::trace!(index = i, pixel = ?pixels[i], "Cube cell");
                    i += 1;
                }
            }
        }

        let pixels: Vec<u32> = pixels.into_iter().flatten().collect();
        Some(BuiltCube {
            red: nr,
            green: ng,
            blue: nb,
            cube: ColorCube::from_pixels(&pixels, nr, ng, nb),
            pixels,
        })
    }

    /// Try every size in [`CUBE_SIZES`] and return the first that fits.
    pub fn build_best_cube(&mut self) -> Option<BuiltCube> {
        CUBE_SIZES
            .iter()
            .find_map(|&(nr, ng, nb)| self.try_build_cube(nr, ng, nb))
    }

    /// Eight corner colors for 3 to 7 bit displays, placed in the
    /// dithering table. Allocation failures are tolerated.
    pub fn build_cube_222(&mut self) -> ColorCube {
        let mut cube = ColorCube::new();
        for i in 0..8u32 {
            let color = Rgb16::new(
                (((i & 4) >> 2) * 65535) as u16,
                (((i & 2) >> 1) * 65535) as u16,
                ((i & 1) * 65535) as u16,
            );
            let pixel = self.backend.alloc_color(self.table, color).unwrap_or(0);
            let index = ((i & 4) << 4) | ((i & 2) << 2) | (i & 1);
            cube.set_dithered(index as usize, pixel);
        }
        cube
    }

    /// Fill a gray-scale table with 256 grays and build the matching cube.
    pub fn build_gray_cube(&mut self) -> ColorCube {
        let mut gray_pixels = [0u32; 256];
        for (i, pixel) in gray_pixels.iter_mut().enumerate() {
            let v = (i * 257) as u16;
            *pixel = self
                .backend
                .alloc_color(self.table, Rgb16::new(v, v, v))
                .unwrap_or(i as u32);
        }
        ColorCube::from_gray_pixels(&gray_pixels)
    }

    fn release(&mut self, pixels: &[Option<u32>]) {
        let claimed: Vec<u32> = pixels.iter().flatten().copied().collect();
        if !claimed.is_empty() {
            self.backend.free_colors(self.table, &claimed);
        }
    }
}

/// Exact color of a grid cell, in 16-bit channels.
fn grid_color(r: u32, nr: u8, g: u32, ng: u8, b: u32, nb: u8) -> Rgb16 {
    let scale = |level: u32, n: u8| gamma_correct((level * 65535 / (n as u32 - 1)) as u16);
    Rgb16::new(scale(r, nr), scale(g, ng), scale(b, nb))
}

#[cfg(feature = "gamma")]
fn gamma_correct(value: u16) -> u16 {
    (65535.0 * (value as f64 / 65535.0).powf(0.5)) as u16
}

#[cfg(not(feature = "gamma"))]
#[inline]
fn gamma_correct(value: u16) -> u16 {
    value
}
