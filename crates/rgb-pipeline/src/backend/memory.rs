//! In-memory display.
//!
//! Models the parts of a display server the pipeline touches: visuals with
//! their pixel formats, reference-counted color tables, surfaces with a
//! shared-memory budget, and blits. Pixel memory uses the real layouts
//! (MSB-first bits for 1 bpp, high nibble first for 4 bpp, and the visual
//! byte order for whole-byte pixels), so converted output can be inspected
//! byte for byte.

use std::collections::HashMap;

use super::{BlitRect, ColorTableId, DisplayBackend, Rgb16, SurfaceId, SurfaceInfo};
use crate::error::BackendError;
use crate::visual::{ByteOrder, Visual, VisualClass, VisualId};

/// Call counters, for tests and diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayStats {
    /// Calls to `alloc_color` and `alloc_colors`.
    pub color_allocations: usize,
    pub table_syncs: usize,
    pub surfaces_created: usize,
    pub blits: usize,
    pub flushes: usize,
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    color: Rgb16,
    refs: u32,
    shareable: bool,
}

impl Cell {
    const FREE: Cell = Cell {
        color: Rgb16::new(0, 0, 0),
        refs: 0,
        shareable: false,
    };

    fn fixed(color: Rgb16) -> Self {
        Self {
            color,
            refs: 0,
            shareable: true,
        }
    }
}

#[derive(Debug, Clone)]
struct ColorTable {
    visual: Visual,
    cells: Vec<Cell>,
}

impl ColorTable {
    fn new(visual: Visual) -> Self {
        let size = visual.colormap_size();
        let cells = match visual.class {
            VisualClass::StaticGray => gray_ramp(size),
            VisualClass::StaticColor if visual.depth >= 3 => static_color_cells(visual.depth),
            VisualClass::StaticColor => gray_ramp(size),
            _ => vec![Cell::FREE; size],
        };
        Self { visual, cells }
    }

    fn is_static(&self) -> bool {
        matches!(
            self.visual.class,
            VisualClass::StaticGray | VisualClass::StaticColor
        )
    }

    fn alloc(&mut self, color: Rgb16) -> Option<u32> {
        if self.visual.class.is_truecolor() {
            let [r, g, b] = color.to_rgb8();
            return Some(self.visual.encode_rgb(r as u32, g as u32, b as u32));
        }
        if self.is_static() {
            return self.nearest(color);
        }
        if let Some(pixel) = self
            .cells
            .iter()
            .position(|c| c.refs > 0 && c.shareable && c.color == color)
        {
            self.cells[pixel].refs += 1;
            return Some(pixel as u32);
        }
        let pixel = self.cells.iter().position(|c| c.refs == 0)?;
        self.cells[pixel] = Cell {
            color,
            refs: 1,
            shareable: true,
        };
        Some(pixel as u32)
    }

    fn alloc_many(&mut self, count: usize) -> Option<Vec<u32>> {
        if !self.visual.class.is_writable() || self.visual.class.is_truecolor() {
            return None;
        }
        let free: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.refs == 0)
            .map(|(i, _)| i)
            .take(count)
            .collect();
        if free.len() < count {
            return None;
        }
        for &i in &free {
            self.cells[i].refs = 1;
            self.cells[i].shareable = false;
        }
        Some(free.into_iter().map(|i| i as u32).collect())
    }

    fn free(&mut self, pixels: &[u32]) {
        if self.is_static() {
            return;
        }
        for &pixel in pixels {
            if let Some(cell) = self.cells.get_mut(pixel as usize) {
                cell.refs = cell.refs.saturating_sub(1);
            }
        }
    }

    fn nearest(&self, color: Rgb16) -> Option<u32> {
        let distance = |c: &Rgb16| {
            let dr = c.red as i64 - color.red as i64;
            let dg = c.green as i64 - color.green as i64;
            let db = c.blue as i64 - color.blue as i64;
            dr * dr + dg * dg + db * db
        };
        self.cells
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| distance(&c.color))
            .map(|(i, _)| i as u32)
    }

    fn rgb_of(&self, pixel: u32) -> [u8; 3] {
        if self.visual.class.is_truecolor() {
            return self.visual.decode_rgb(pixel);
        }
        self.cells
            .get(pixel as usize)
            .map(|c| c.color.to_rgb8())
            .unwrap_or([0, 0, 0])
    }
}

fn gray_ramp(size: usize) -> Vec<Cell> {
    let max = size.saturating_sub(1).max(1) as u32;
    (0..size as u32)
        .map(|i| {
            let v = (i * 65535 / max) as u16;
            Cell::fixed(Rgb16::new(v, v, v))
        })
        .collect()
}

/// Fixed RGB cube splitting the depth bits between channels, blue smallest.
fn static_color_cells(depth: u8) -> Vec<Cell> {
    let depth = depth.min(8) as u32;
    let blue_bits = depth / 3;
    let red_bits = (depth - blue_bits) / 2;
    let green_bits = depth - blue_bits - red_bits;
    let scale = |level: u32, bits: u32| -> u16 { (level * 65535 / ((1 << bits) - 1)) as u16 };
    (0..1u32 << depth)
        .map(|pixel| {
            let r = pixel >> (green_bits + blue_bits);
            let g = (pixel >> blue_bits) & ((1 << green_bits) - 1);
            let b = pixel & ((1 << blue_bits) - 1);
            Cell::fixed(Rgb16::new(
                scale(r, red_bits),
                scale(g, green_bits),
                scale(b, blue_bits),
            ))
        })
        .collect()
}

#[derive(Debug, Clone)]
struct Surface {
    visual: Visual,
    info: SurfaceInfo,
    data: Vec<u8>,
}

fn read_pixel(info: &SurfaceInfo, data: &[u8], x: u32, y: u32) -> u32 {
    let row = y as usize * info.bytes_per_line;
    match info.bits_per_pixel {
        1 => {
            let byte = data[row + x as usize / 8];
            ((byte >> (7 - (x % 8))) & 1) as u32
        }
        4 => {
            let byte = data[row + x as usize / 2];
            if x % 2 == 0 {
                (byte >> 4) as u32
            } else {
                (byte & 0x0f) as u32
            }
        }
        bits => {
            let n = bits as usize / 8;
            let start = row + x as usize * n;
            let bytes = &data[start..start + n];
            match info.byte_order {
                ByteOrder::LsbFirst => bytes.iter().rev().fold(0, |acc, &b| (acc << 8) | b as u32),
                ByteOrder::MsbFirst => bytes.iter().fold(0, |acc, &b| (acc << 8) | b as u32),
            }
        }
    }
}

fn write_pixel(info: &SurfaceInfo, data: &mut [u8], x: u32, y: u32, value: u32) {
    let row = y as usize * info.bytes_per_line;
    match info.bits_per_pixel {
        1 => {
            let byte = &mut data[row + x as usize / 8];
            let bit = 0x80u8 >> (x % 8);
            if value & 1 != 0 {
                *byte |= bit;
            } else {
                *byte &= !bit;
            }
        }
        4 => {
            let byte = &mut data[row + x as usize / 2];
            let nibble = (value & 0x0f) as u8;
            if x % 2 == 0 {
                *byte = (*byte & 0x0f) | (nibble << 4);
            } else {
                *byte = (*byte & 0xf0) | nibble;
            }
        }
        bits => {
            let n = bits as usize / 8;
            let start = row + x as usize * n;
            for (i, out) in data[start..start + n].iter_mut().enumerate() {
                let shift = match info.byte_order {
                    ByteOrder::LsbFirst => 8 * i,
                    ByteOrder::MsbFirst => 8 * (n - 1 - i),
                };
                *out = (value >> shift) as u8;
            }
        }
    }
}

/// A display that lives in memory.
#[derive(Debug, Clone)]
pub struct MemoryDisplay {
    visuals: Vec<(Visual, u8)>,
    default_visual: VisualId,
    tables: Vec<ColorTable>,
    system_tables: HashMap<VisualId, ColorTableId>,
    surfaces: HashMap<u32, Surface>,
    next_surface: u32,
    shared_memory: bool,
    max_shared_bytes: usize,
    stats: DisplayStats,
}

impl MemoryDisplay {
    /// Display offering `visuals`, each paired with its bits per pixel.
    pub fn new(visuals: Vec<(Visual, u8)>, default_visual: VisualId) -> Self {
        Self {
            visuals,
            default_visual,
            tables: Vec::new(),
            system_tables: HashMap::new(),
            surfaces: HashMap::new(),
            next_surface: 1,
            shared_memory: true,
            max_shared_bytes: usize::MAX,
            stats: DisplayStats::default(),
        }
    }

    /// Allow or refuse shared-memory surfaces.
    #[inline]
    pub fn with_shared_memory(mut self, enabled: bool) -> Self {
        self.shared_memory = enabled;
        self
    }

    /// Largest shared-memory surface, in bytes.
    #[inline]
    pub fn with_max_shared_bytes(mut self, bytes: usize) -> Self {
        self.max_shared_bytes = bytes;
        self
    }

    pub fn stats(&self) -> DisplayStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = DisplayStats::default();
    }

    fn bits_per_pixel(&self, visual: VisualId) -> Option<u8> {
        self.visuals
            .iter()
            .find(|(v, _)| v.id == visual)
            .map(|&(_, bpp)| bpp)
    }

    fn system_table(&mut self, visual: &Visual) -> ColorTableId {
        if let Some(&id) = self.system_tables.get(&visual.id) {
            return id;
        }
        let id = self.push_table(*visual);
        self.system_tables.insert(visual.id, id);
        id
    }

    fn push_table(&mut self, visual: Visual) -> ColorTableId {
        self.tables.push(ColorTable::new(visual));
        ColorTableId((self.tables.len() - 1) as u32)
    }

    /// Pre-allocate colors in the system table of `visual`, as other
    /// clients would. Returns how many were allocated.
    pub fn reserve_colors(&mut self, visual: VisualId, colors: &[Rgb16]) -> usize {
        let Some(visual) = self
            .visuals
            .iter()
            .find(|(v, _)| v.id == visual)
            .map(|&(v, _)| v)
        else {
            return 0;
        };
        let id = self.system_table(&visual);
        let table = &mut self.tables[id.0 as usize];
        colors.iter().filter(|&&c| table.alloc(c).is_some()).count()
    }

    /// Number of cells with at least one reference.
    pub fn allocated_cells(&self, table: ColorTableId) -> usize {
        self.tables
            .get(table.0 as usize)
            .map(|t| t.cells.iter().filter(|c| c.refs > 0).count())
            .unwrap_or(0)
    }

    /// Value stored in a table cell.
    pub fn lookup_color(&self, table: ColorTableId, pixel: u32) -> Option<Rgb16> {
        self.tables
            .get(table.0 as usize)?
            .cells
            .get(pixel as usize)
            .map(|c| c.color)
    }

    /// Raw pixel value at `(x, y)`.
    pub fn pixel(&self, surface: SurfaceId, x: u32, y: u32) -> Option<u32> {
        let s = self.surfaces.get(&surface.0)?;
        if x >= s.info.width || y >= s.info.height {
            return None;
        }
        Some(read_pixel(&s.info, &s.data, x, y))
    }

    /// Resolve every pixel of `surface` to 8-bit RGB through `table`.
    pub fn read_rgb(&self, surface: SurfaceId, table: ColorTableId) -> Result<Vec<u8>, BackendError> {
        let s = self
            .surfaces
            .get(&surface.0)
            .ok_or(BackendError::UnknownSurface(surface.0))?;
        let table = self
            .tables
            .get(table.0 as usize)
            .ok_or(BackendError::UnknownColorTable(table.0))?;
        let pixels = (s.info.width as usize).saturating_mul(s.info.height as usize);
        let mut out = Vec::with_capacity(pixels.saturating_mul(3));
        for y in 0..s.info.height {
            for x in 0..s.info.width {
                out.extend_from_slice(&table.rgb_of(read_pixel(&s.info, &s.data, x, y)));
            }
        }
        Ok(out)
    }

    /// Number of live surfaces.
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }
}

impl DisplayBackend for MemoryDisplay {
    fn visuals(&self) -> Vec<Visual> {
        self.visuals.iter().map(|&(v, _)| v).collect()
    }

    fn default_visual(&self) -> Visual {
        self.visuals
            .iter()
            .find(|(v, _)| v.id == self.default_visual)
            .or_else(|| self.visuals.first())
            .map(|&(v, _)| v)
            .unwrap_or_else(|| Visual::new(self.default_visual.0, VisualClass::StaticGray, 1))
    }

    fn create_color_table(&mut self, visual: &Visual, private: bool) -> ColorTableId {
        if private {
            self.push_table(*visual)
        } else {
            self.system_table(visual)
        }
    }

    fn sync_color_table(&mut self, _table: ColorTableId, _force: bool) {
        self.stats.table_syncs += 1;
    }

    fn table_colors(&self, table: ColorTableId) -> Vec<Rgb16> {
        self.tables
            .get(table.0 as usize)
            .map(|t| t.cells.iter().map(|c| c.color).collect())
            .unwrap_or_default()
    }

    fn alloc_color(&mut self, table: ColorTableId, color: Rgb16) -> Option<u32> {
        self.stats.color_allocations += 1;
        self.tables.get_mut(table.0 as usize)?.alloc(color)
    }

    fn alloc_colors(&mut self, table: ColorTableId, count: usize) -> Option<Vec<u32>> {
        self.stats.color_allocations += 1;
        self.tables.get_mut(table.0 as usize)?.alloc_many(count)
    }

    fn free_colors(&mut self, table: ColorTableId, pixels: &[u32]) {
        if let Some(t) = self.tables.get_mut(table.0 as usize) {
            t.free(pixels);
        }
    }

    fn create_surface(
        &mut self,
        visual: &Visual,
        width: u32,
        height: u32,
        shared: bool,
    ) -> Option<SurfaceId> {
        let bits_per_pixel = self.bits_per_pixel(visual.id)?;
        if !matches!(bits_per_pixel, 1 | 4 | 8 | 16 | 24 | 32) {
            return None;
        }
        let bytes_per_line = (width as usize * bits_per_pixel as usize).div_ceil(32) * 4;
        let len = bytes_per_line.checked_mul(height as usize)?;
        if shared && (!self.shared_memory || len > self.max_shared_bytes) {
            tracing::trace!(width, height, len, "Shared surface refused");
            return None;
        }
        let id = self.next_surface;
        self.next_surface += 1;
        self.surfaces.insert(
            id,
            Surface {
                visual: *visual,
                info: SurfaceInfo {
                    width,
                    height,
                    bits_per_pixel,
                    bytes_per_line,
                    byte_order: visual.byte_order,
                },
                data: vec![0; len],
            },
        );
        self.stats.surfaces_created += 1;
        Some(SurfaceId(id))
    }

    fn destroy_surface(&mut self, surface: SurfaceId) {
        self.surfaces.remove(&surface.0);
    }

    fn surface_info(&self, surface: SurfaceId) -> Option<SurfaceInfo> {
        self.surfaces.get(&surface.0).map(|s| s.info)
    }

    fn surface_data_mut(&mut self, surface: SurfaceId) -> Option<&mut [u8]> {
        self.surfaces.get_mut(&surface.0).map(|s| s.data.as_mut_slice())
    }

    fn blit(&mut self, dest: SurfaceId, src: SurfaceId, rect: BlitRect) -> Result<(), BackendError> {
        let source = self
            .surfaces
            .get(&src.0)
            .ok_or(BackendError::UnknownSurface(src.0))?;
        let dst_info = self
            .surfaces
            .get(&dest.0)
            .ok_or(BackendError::UnknownSurface(dest.0))?
            .info;
        if source.info.bits_per_pixel != dst_info.bits_per_pixel {
            return Err(BackendError::IncompatibleSurfaces {
                src_bpp: source.info.bits_per_pixel,
                dst_bpp: dst_info.bits_per_pixel,
            });
        }
        let fits = |start: u32, len: u32, limit: u32| start.checked_add(len).is_some_and(|end| end <= limit);
        if !fits(rect.src_x, rect.width, source.info.width)
            || !fits(rect.src_y, rect.height, source.info.height)
        {
            return Err(BackendError::OutOfBounds {
                x: rect.src_x,
                y: rect.src_y,
                width: rect.width,
                height: rect.height,
            });
        }

        let mut pixels = Vec::with_capacity((rect.width as usize).saturating_mul(rect.height as usize));
        for dy in 0..rect.height {
            let ty = rect.dst_y as i64 + dy as i64;
            if ty < 0 || ty >= dst_info.height as i64 {
                continue;
            }
            for dx in 0..rect.width {
                let tx = rect.dst_x as i64 + dx as i64;
                if tx < 0 || tx >= dst_info.width as i64 {
                    continue;
                }
                let value = read_pixel(&source.info, &source.data, rect.src_x + dx, rect.src_y + dy);
                pixels.push((tx as u32, ty as u32, value));
            }
        }

        if let Some(target) = self.surfaces.get_mut(&dest.0) {
            for (x, y, value) in pixels {
                write_pixel(&target.info, &mut target.data, x, y, value);
            }
        }
        self.stats.blits += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), BackendError> {
        self.stats.flushes += 1;
        Ok(())
    }
}

impl MemoryDisplay {
    /// Visual a surface was created for.
    pub fn surface_visual(&self, surface: SurfaceId) -> Option<Visual> {
        self.surfaces.get(&surface.0).map(|s| s.visual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pseudo8() -> (Visual, MemoryDisplay) {
        let visual = Visual::new(0x22, VisualClass::PseudoColor, 8);
        (visual, MemoryDisplay::new(vec![(visual, 8)], visual.id))
    }

    #[test]
    fn test_alloc_color_shares_identical_cells() {
        let (visual, mut display) = pseudo8();
        let table = display.create_color_table(&visual, false);
        let red = Rgb16::from_rgb24(0xff0000);
        let a = display.alloc_color(table, red).unwrap();
        let b = display.alloc_color(table, red).unwrap();
        assert_eq!(a, b, "identical read-only colors share a cell");
        assert_eq!(display.allocated_cells(table), 1);

        display.free_colors(table, &[a]);
        assert_eq!(display.allocated_cells(table), 1, "one reference remains");
        display.free_colors(table, &[b]);
        assert_eq!(display.allocated_cells(table), 0);
    }

    #[test]
    fn test_alloc_colors_all_or_nothing() {
        let visual = Visual::new(1, VisualClass::PseudoColor, 4);
        let mut display = MemoryDisplay::new(vec![(visual, 8)], visual.id);
        let table = display.create_color_table(&visual, true);
        assert!(display.alloc_colors(table, 17).is_none());
        assert_eq!(display.allocated_cells(table), 0);
        let pixels = display.alloc_colors(table, 16).unwrap();
        assert_eq!(pixels.len(), 16);
        assert!(display.alloc_color(table, Rgb16::default()).is_none(), "table is full");
    }

    #[test]
    fn test_system_table_is_shared_private_is_not() {
        let (visual, mut display) = pseudo8();
        let system_a = display.create_color_table(&visual, false);
        let system_b = display.create_color_table(&visual, false);
        let private = display.create_color_table(&visual, true);
        assert_eq!(system_a, system_b);
        assert_ne!(system_a, private);
    }

    #[test]
    fn test_reserve_colors_occupies_system_table() {
        let (visual, mut display) = pseudo8();
        let colors: Vec<Rgb16> = (0..40u32).map(|i| Rgb16::from_rgb24(i * 0x010203)).collect();
        assert_eq!(display.reserve_colors(visual.id, &colors), 40);
        let table = display.create_color_table(&visual, false);
        assert_eq!(display.allocated_cells(table), 40);
    }

    #[test]
    fn test_truecolor_alloc_uses_masks() {
        let visual = Visual::new(1, VisualClass::TrueColor, 16).with_masks(0xf800, 0x7e0, 0x1f);
        let mut display = MemoryDisplay::new(vec![(visual, 16)], visual.id);
        let table = display.create_color_table(&visual, false);
        assert_eq!(display.alloc_color(table, Rgb16::from_rgb24(0xff0000)), Some(0xf800));
        assert!(display.alloc_colors(table, 1).is_none());
    }

    #[test]
    fn test_static_color_returns_nearest() {
        let visual = Visual::new(1, VisualClass::StaticColor, 3);
        let mut display = MemoryDisplay::new(vec![(visual, 8)], visual.id);
        let table = display.create_color_table(&visual, false);
        let pixel = display
            .alloc_color(table, Rgb16::from_rgb24(0xf01010))
            .unwrap();
        assert_eq!(display.lookup_color(table, pixel), Some(Rgb16::from_rgb24(0xff0000)));
    }

    #[test]
    fn test_shared_memory_limit() {
        let (visual, display) = pseudo8();
        let mut display = display.with_max_shared_bytes(256 * 64);
        assert!(display.create_surface(&visual, 256, 64, true).is_some());
        assert!(display.create_surface(&visual, 512, 64, true).is_none());
        assert!(display.create_surface(&visual, 512, 64, false).is_some());

        let mut no_shm = display.with_shared_memory(false);
        assert!(no_shm.create_surface(&visual, 8, 8, true).is_none());
    }

    #[test]
    fn test_bytes_per_line_padding() {
        let visual = Visual::new(1, VisualClass::StaticGray, 1);
        let mut display = MemoryDisplay::new(vec![(visual, 1)], visual.id);
        let s = display.create_surface(&visual, 33, 2, false).unwrap();
        assert_eq!(display.surface_info(s).unwrap().bytes_per_line, 8);
    }

    #[test]
    fn test_pixel_layouts() {
        let visual = Visual::new(1, VisualClass::TrueColor, 16)
            .with_masks(0xf800, 0x7e0, 0x1f)
            .with_byte_order(ByteOrder::MsbFirst);
        let mut display = MemoryDisplay::new(vec![(visual, 16)], visual.id);
        let s = display.create_surface(&visual, 2, 1, false).unwrap();
        let data = display.surface_data_mut(s).unwrap();
        data[..4].copy_from_slice(&[0xf8, 0x00, 0x00, 0x1f]);
        assert_eq!(display.pixel(s, 0, 0), Some(0xf800));
        assert_eq!(display.pixel(s, 1, 0), Some(0x001f));
        assert_eq!(display.pixel(s, 2, 0), None);
    }

    #[test]
    fn test_blit_clips_and_converts_byte_order() {
        let lsb = Visual::new(1, VisualClass::TrueColor, 16).with_masks(0xf800, 0x7e0, 0x1f);
        let msb = Visual::new(2, VisualClass::TrueColor, 16)
            .with_masks(0xf800, 0x7e0, 0x1f)
            .with_byte_order(ByteOrder::MsbFirst);
        let mut display = MemoryDisplay::new(vec![(lsb, 16), (msb, 16)], lsb.id);
        let src = display.create_surface(&lsb, 4, 1, false).unwrap();
        let dst = display.create_surface(&msb, 2, 1, false).unwrap();
        display.surface_data_mut(src).unwrap()[..8]
            .copy_from_slice(&[0x00, 0xf8, 0xe0, 0x07, 0x1f, 0x00, 0xff, 0xff]);

        let rect = BlitRect {
            src_x: 0,
            src_y: 0,
            dst_x: -1,
            dst_y: 0,
            width: 4,
            height: 1,
        };
        display.blit(dst, src, rect).unwrap();
        assert_eq!(display.pixel(dst, 0, 0), Some(0x07e0));
        assert_eq!(display.pixel(dst, 1, 0), Some(0x001f));
        assert_eq!(display.stats().blits, 1);
    }

    #[test]
    fn test_oversized_surface_is_refused() {
        let visual = Visual::new(1, VisualClass::TrueColor, 24).with_masks(0xff0000, 0xff00, 0xff);
        let mut display = MemoryDisplay::new(vec![(visual, 32)], visual.id);
        assert_eq!(
            display.create_surface(&visual, u32::MAX, u32::MAX, false),
            None,
            "byte size overflows usize"
        );
        assert_eq!(display.surface_count(), 0);
    }

    #[test]
    fn test_blit_large_rect_onto_small_destination() {
        let (visual, mut display) = pseudo8();
        let src = display.create_surface(&visual, 512, 64, false).unwrap();
        let dst = display.create_surface(&visual, 2, 2, false).unwrap();
        display.surface_data_mut(src).unwrap().fill(7);
        let rect = BlitRect {
            src_x: 0,
            src_y: 0,
            dst_x: -510,
            dst_y: -62,
            width: 512,
            height: 64,
        };
        display.blit(dst, src, rect).unwrap();
        assert_eq!(display.pixel(dst, 1, 1), Some(7));
        assert_eq!(display.pixel(dst, 0, 0), Some(7));
    }

    #[test]
    fn test_blit_rejects_bad_source() {
        let (visual, mut display) = pseudo8();
        let src = display.create_surface(&visual, 4, 4, false).unwrap();
        let dst = display.create_surface(&visual, 4, 4, false).unwrap();
        let rect = BlitRect {
            src_x: 2,
            src_y: 0,
            dst_x: 0,
            dst_y: 0,
            width: 4,
            height: 1,
        };
        assert!(matches!(
            display.blit(dst, src, rect),
            Err(BackendError::OutOfBounds { .. })
        ));
        assert_eq!(
            display.blit(dst, SurfaceId(99), rect),
            Err(BackendError::UnknownSurface(99))
        );
    }

    #[test]
    fn test_packed_pixels() {
        let visual = Visual::new(1, VisualClass::StaticGray, 4);
        let mut display = MemoryDisplay::new(vec![(visual, 4)], visual.id);
        let s = display.create_surface(&visual, 3, 1, false).unwrap();
        display.surface_data_mut(s).unwrap()[..2].copy_from_slice(&[0xa5, 0xf0]);
        assert_eq!(display.pixel(s, 0, 0), Some(0xa));
        assert_eq!(display.pixel(s, 1, 0), Some(0x5));
        assert_eq!(display.pixel(s, 2, 0), Some(0xf));

        let table = display.create_color_table(&visual, false);
        let rgb = display.read_rgb(s, table).unwrap();
        assert_eq!(&rgb[6..9], &[255, 255, 255]);
    }
}
