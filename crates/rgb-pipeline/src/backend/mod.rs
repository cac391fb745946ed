//! The display layer the pipeline renders through.
//!
//! [`DisplayBackend`] is the narrow interface the pipeline consumes: visual
//! enumeration, color table allocation, surfaces with writable memory, and
//! blits. [`MemoryDisplay`] implements it entirely in memory.

mod memory;

pub use memory::{DisplayStats, MemoryDisplay};

use crate::error::BackendError;
use crate::visual::{ByteOrder, Visual};

/// Handle of a color table (colormap) owned by the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorTableId(pub u32);

/// Handle of a surface owned by the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

/// A color with 16 bits per channel, as stored in color tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb16 {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl Rgb16 {
    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }

    /// Widen a packed `0xRRGGBB` value.
    pub const fn from_rgb24(rgb: u32) -> Self {
        let r = ((rgb >> 16) & 0xff) as u16;
        let g = ((rgb >> 8) & 0xff) as u16;
        let b = (rgb & 0xff) as u16;
        Self::new(r * 257, g * 257, b * 257)
    }

    pub const fn to_rgb24(self) -> u32 {
        ((self.red as u32 >> 8) << 16) | ((self.green as u32 >> 8) << 8) | (self.blue as u32 >> 8)
    }

    pub const fn to_rgb8(self) -> [u8; 3] {
        [
            (self.red >> 8) as u8,
            (self.green >> 8) as u8,
            (self.blue >> 8) as u8,
        ]
    }
}

/// Memory layout of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceInfo {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u8,
    pub bytes_per_line: usize,
    pub byte_order: ByteOrder,
}

/// Source rectangle and destination origin of a blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlitRect {
    pub src_x: u32,
    pub src_y: u32,
    pub dst_x: i32,
    pub dst_y: i32,
    pub width: u32,
    pub height: u32,
}

/// Operations the pipeline needs from a display.
///
/// Color allocation failures are ordinary outcomes (`None`), since the
/// palette builder probes the table and retries with smaller cubes.
pub trait DisplayBackend {
    /// All visuals the display supports.
    fn visuals(&self) -> Vec<Visual>;

    /// The visual of the root window.
    fn default_visual(&self) -> Visual;

    /// The shared system table for `visual`, or a fresh private one.
    fn create_color_table(&mut self, visual: &Visual, private: bool) -> ColorTableId;

    /// Refresh the cached cell values of a table.
    fn sync_color_table(&mut self, table: ColorTableId, force: bool);

    /// Current cell values of a table, indexed by pixel.
    fn table_colors(&self, table: ColorTableId) -> Vec<Rgb16>;

    /// Allocate a read-only cell holding `color`, sharing an identical one.
    fn alloc_color(&mut self, table: ColorTableId, color: Rgb16) -> Option<u32>;

    /// Allocate `count` private cells at once, all or nothing.
    fn alloc_colors(&mut self, table: ColorTableId, count: usize) -> Option<Vec<u32>>;

    fn free_colors(&mut self, table: ColorTableId, pixels: &[u32]);

    /// Create a surface for `visual`; `shared` requests shared memory.
    fn create_surface(
        &mut self,
        visual: &Visual,
        width: u32,
        height: u32,
        shared: bool,
    ) -> Option<SurfaceId>;

    fn destroy_surface(&mut self, surface: SurfaceId);

    fn surface_info(&self, surface: SurfaceId) -> Option<SurfaceInfo>;

    fn surface_data_mut(&mut self, surface: SurfaceId) -> Option<&mut [u8]>;

    /// Copy a rectangle of `src` onto `dest`, clipping at the destination edges.
    fn blit(&mut self, dest: SurfaceId, src: SurfaceId, rect: BlitRect)
        -> Result<(), BackendError>;

    /// Wait until all queued drawing has reached the display.
    fn flush(&mut self) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb16_round_trip_extremes() {
        assert_eq!(Rgb16::from_rgb24(0xffffff), Rgb16::new(65535, 65535, 65535));
        assert_eq!(Rgb16::from_rgb24(0x000000), Rgb16::default());
        assert_eq!(Rgb16::from_rgb24(0x80ff01).to_rgb24(), 0x80ff01);
        assert_eq!(Rgb16::new(0x1234, 0xff00, 0x00ff).to_rgb8(), [0x12, 0xff, 0x00]);
    }
}
