//! The 24-bit staging buffer.
//!
//! Sources without a dedicated routine are expanded here into packed RGB,
//! one region-sized tile at a time, and then converted by the RGB routine.

use super::Source;
use crate::palette::Colormap;
use crate::scratch::{REGION_HEIGHT, REGION_WIDTH};

/// Row stride of the stage: one region width of packed RGB.
pub const STAGE_ROWSTRIDE: usize = REGION_WIDTH as usize * 3;

/// Scratch RGB tile, allocated on first use.
#[derive(Debug, Default)]
pub struct StageBuffer {
    data: Vec<u8>,
}

impl StageBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_allocated(&self) -> bool {
        !self.data.is_empty()
    }

    fn ensure(&mut self) -> &mut [u8] {
        if self.data.is_empty() {
            self.data = vec![0; REGION_HEIGHT as usize * STAGE_ROWSTRIDE];
        }
        &mut self.data
    }

    fn staged(&self, width: u32, height: u32) -> Source<'_> {
        Source::new(&self.data, STAGE_ROWSTRIDE, width, height)
    }

    /// Drop the pad byte of each RGBx pixel.
    pub fn stage_rgb32(&mut self, source: &Source<'_>) -> Source<'_> {
        let stage = self.ensure();
        for y in 0..source.height {
            let out = &mut stage[y as usize * STAGE_ROWSTRIDE..];
            for (px, dst) in source.row(y, 4).chunks_exact(4).zip(out.chunks_exact_mut(3)) {
                dst.copy_from_slice(&px[..3]);
            }
        }
        self.staged(source.width, source.height)
    }

    /// Replicate each gray value into all three channels.
    pub fn stage_gray(&mut self, source: &Source<'_>) -> Source<'_> {
        let stage = self.ensure();
        for y in 0..source.height {
            let out = &mut stage[y as usize * STAGE_ROWSTRIDE..];
            for (&gray, dst) in source.row(y, 1).iter().zip(out.chunks_exact_mut(3)) {
                dst.fill(gray);
            }
        }
        self.staged(source.width, source.height)
    }

    /// Resolve indices through the colormap's RGB table.
    pub fn stage_indexed(&mut self, source: &Source<'_>, colormap: &Colormap) -> Source<'_> {
        let stage = self.ensure();
        for y in 0..source.height {
            let out = &mut stage[y as usize * STAGE_ROWSTRIDE..];
            for (&index, dst) in source.row(y, 1).iter().zip(out.chunks_exact_mut(3)) {
                let rgb = colormap.color(index);
                dst[0] = (rgb >> 16) as u8;
                dst[1] = (rgb >> 8) as u8;
                dst[2] = rgb as u8;
            }
        }
        self.staged(source.width, source.height)
    }
}
