//! The render context: one display, one chosen visual, one routine set.
//!
//! A [`RenderContext`] owns its [`DisplayBackend`] and sets itself up on the
//! first call that needs display state. Setup picks the best visual, builds
//! the color cube or gray ramp the visual needs, allocates the scratch
//! surfaces, and selects the conversion routines. Every draw call after that
//! only tiles, converts, and blits.

use crate::backend::{BlitRect, ColorTableId, DisplayBackend, SurfaceId};
use crate::convert::{
    execute, select_routines, Align, Conversion, ConvertState, FormatKey, RoutineSet,
    StageBuffer, Source, Target,
};
use crate::dither::DitherMode;
use crate::error::{BackendError, RgbError};
use crate::palette::{ColorCube, Colormap, PaletteBuilder, Shades, DEFAULT_MIN_COLORS};
use crate::scratch::{ScratchPool, REGION_HEIGHT, REGION_WIDTH};
use crate::visual::{choose_visual, Visual, VisualClass};

/// Gamma the cube colors are allocated for.
const GAMMA: f64 = if cfg!(feature = "gamma") { 0.5 } else { 1.0 };

/// Options applied when the context initializes.
///
/// Changing them after the first draw has no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbOptions {
    /// Log setup decisions at info level instead of debug.
    pub verbose: bool,
    /// Always build the cube in a private color table.
    pub install_private_table: bool,
    /// Smallest cube worth carving out of a shared color table.
    pub min_colors: u32,
}

impl Default for RgbOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            install_private_table: false,
            min_colors: DEFAULT_MIN_COLORS,
        }
    }
}

impl RgbOptions {
    #[inline]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[inline]
    pub fn install_private_table(mut self, install: bool) -> Self {
        self.install_private_table = install;
        self
    }

    #[inline]
    pub fn min_colors(mut self, min_colors: u32) -> Self {
        self.min_colors = min_colors;
        self
    }
}

/// Destination rectangle of a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawArea {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl DrawArea {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Rgb,
    Rgb32,
    Gray,
    Indexed,
}

impl SourceKind {
    fn channels(self) -> usize {
        match self {
            SourceKind::Rgb => 3,
            SourceKind::Rgb32 => 4,
            SourceKind::Gray | SourceKind::Indexed => 1,
        }
    }

    fn conversion(self, set: &RoutineSet, dithered: bool) -> Conversion {
        match (self, dithered) {
            (SourceKind::Rgb, false) => Conversion::Direct(set.rgb),
            (SourceKind::Rgb, true) => Conversion::Direct(set.rgb_dither),
            (SourceKind::Rgb32, false) => set.rgb32,
            (SourceKind::Rgb32, true) => set.rgb32_dither,
            (SourceKind::Gray, false) => set.gray,
            (SourceKind::Gray, true) => set.gray_dither,
            (SourceKind::Indexed, false) => set.indexed,
            (SourceKind::Indexed, true) => set.indexed_dither,
        }
    }
}

/// Everything decided at initialization.
#[derive(Debug)]
struct ContextState {
    visual: Visual,
    table: ColorTableId,
    private_table: bool,
    shades: Shades,
    cube: ColorCube,
    bitmap: bool,
    bytes_per_pixel: usize,
    routines: RoutineSet,
    pool: ScratchPool,
    stage: StageBuffer,
    gray_colormap: Option<Colormap>,
}

impl ContextState {
    /// Bytes-per-pixel colormapped displays resolve indices through a
    /// colormap lookup table built from the cube.
    fn uses_colormap_lut(&self) -> bool {
        self.bytes_per_pixel == 1
            && matches!(
                self.visual.class,
                VisualClass::PseudoColor | VisualClass::GrayScale
            )
    }
}

/// Renders caller pixel buffers onto surfaces of one display.
#[derive(Debug)]
pub struct RenderContext<B: DisplayBackend> {
    backend: B,
    options: RgbOptions,
    state: Option<ContextState>,
}

impl<B: DisplayBackend> RenderContext<B> {
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, RgbOptions::default())
    }

    pub fn with_options(backend: B, options: RgbOptions) -> Self {
        Self {
            backend,
            options,
            state: None,
        }
    }

    pub fn options(&self) -> RgbOptions {
        self.options
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.options.verbose = verbose;
    }

    pub fn set_install_private_table(&mut self, install: bool) {
        self.options.install_private_table = install;
    }

    pub fn set_min_colors_threshold(&mut self, min_colors: u32) {
        self.options.min_colors = min_colors;
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Run setup if it has not happened yet. Later calls do nothing.
    pub fn initialize(&mut self) -> Result<(), RgbError> {
        if self.state.is_none() {
            let state = init_state(&mut self.backend, &self.options)?;
            self.state = Some(state);
        }
        Ok(())
    }

    fn parts(&mut self) -> Result<(&mut B, &mut ContextState), RgbError> {
        self.initialize()?;
        match self.state.as_mut() {
            Some(state) => Ok((&mut self.backend, state)),
            None => Err(RgbError::NoVisuals),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn visual(&self) -> Option<&Visual> {
        self.state.as_ref().map(|s| &s.visual)
    }

    pub fn color_table(&self) -> Option<ColorTableId> {
        self.state.as_ref().map(|s| s.table)
    }

    pub fn is_private_table(&self) -> Option<bool> {
        self.state.as_ref().map(|s| s.private_table)
    }

    pub fn shades(&self) -> Option<Shades> {
        self.state.as_ref().map(|s| s.shades)
    }

    pub fn cube(&self) -> Option<&ColorCube> {
        self.state.as_ref().map(|s| &s.cube)
    }

    pub fn bytes_per_pixel(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.bytes_per_pixel)
    }

    pub fn routines(&self) -> Option<&RoutineSet> {
        self.state.as_ref().map(|s| &s.routines)
    }

    /// Number of scratch surfaces backing the regions.
    pub fn scratch_images(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.pool.n_images())
    }

    pub fn gamma(&self) -> f64 {
        GAMMA
    }

    /// Create a destination surface in the chosen visual.
    pub fn create_window(&mut self, width: u32, height: u32) -> Result<SurfaceId, RgbError> {
        let (backend, state) = self.parts()?;
        backend
            .create_surface(&state.visual, width, height, false)
            .ok_or(RgbError::SurfaceUnavailable { width, height })
    }

    /// Whether dithering can change the output on this display.
    pub fn is_ditherable(&mut self) -> Result<bool, RgbError> {
        let (_, state) = self.parts()?;
        Ok(state.routines.is_ditherable())
    }

    /// Draw packed 24-bit RGB.
    pub fn draw_rgb(
        &mut self,
        dest: SurfaceId,
        area: DrawArea,
        dither: DitherMode,
        buf: &[u8],
        rowstride: usize,
    ) -> Result<(), RgbError> {
        self.draw(dest, area, dither, buf, rowstride, SourceKind::Rgb, None, (0, 0))
    }

    /// Draw packed 24-bit RGB with the dither pattern shifted by `align`.
    ///
    /// Use this when `buf` is part of a larger image drawn in pieces, so the
    /// pattern stays continuous across the pieces.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_rgb_aligned(
        &mut self,
        dest: SurfaceId,
        area: DrawArea,
        dither: DitherMode,
        buf: &[u8],
        rowstride: usize,
        align: (i32, i32),
    ) -> Result<(), RgbError> {
        self.draw(dest, area, dither, buf, rowstride, SourceKind::Rgb, None, align)
    }

    /// Draw RGBx pixels; the fourth byte is ignored.
    pub fn draw_rgb32(
        &mut self,
        dest: SurfaceId,
        area: DrawArea,
        dither: DitherMode,
        buf: &[u8],
        rowstride: usize,
    ) -> Result<(), RgbError> {
        self.draw(dest, area, dither, buf, rowstride, SourceKind::Rgb32, None, (0, 0))
    }

    /// Draw 8-bit gray.
    pub fn draw_gray(
        &mut self,
        dest: SurfaceId,
        area: DrawArea,
        dither: DitherMode,
        buf: &[u8],
        rowstride: usize,
    ) -> Result<(), RgbError> {
        self.draw(dest, area, dither, buf, rowstride, SourceKind::Gray, None, (0, 0))
    }

    /// Draw 8-bit indices into `colormap`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_indexed(
        &mut self,
        dest: SurfaceId,
        area: DrawArea,
        dither: DitherMode,
        buf: &[u8],
        rowstride: usize,
        colormap: &Colormap,
    ) -> Result<(), RgbError> {
        self.draw(
            dest,
            area,
            dither,
            buf,
            rowstride,
            SourceKind::Indexed,
            Some(colormap),
            (0, 0),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn draw(
        &mut self,
        dest: SurfaceId,
        area: DrawArea,
        dither: DitherMode,
        buf: &[u8],
        rowstride: usize,
        kind: SourceKind,
        colormap: Option<&Colormap>,
        align: (i32, i32),
    ) -> Result<(), RgbError> {
        let verbose = self.options.verbose;
        let (backend, state) = self.parts()?;

        let channels = kind.channels();
        let needed = Source::new(buf, rowstride, area.width, area.height)
            .required_len(channels)
            .ok_or(RgbError::BufferOverflow {
                width: area.width,
                height: area.height,
                rowstride,
            })?;
        if buf.len() < needed {
            return Err(RgbError::BufferTooSmall {
                needed,
                actual: buf.len(),
            });
        }
        if needed == 0 {
            return Ok(());
        }

        if kind == SourceKind::Gray && state.gray_colormap.is_none() && state.uses_colormap_lut() {
            let grays: Vec<u32> = (0..256u32).map(|i| i * 0x010101).collect();
            state.gray_colormap = Some(Colormap::new(&grays, Some(&state.cube))?);
            tracing::debug!("Built gray colormap");
        }

        let dithered = dither.enabled(state.routines.dither_by_default);
        let conversion = kind.conversion(&state.routines, dithered);
        tracing::trace!(
            conversion = conversion.name(),
            dithered,
            width = area.width,
            height = area.height,
            "Drawing"
        );

        for y0 in (0..area.height).step_by(REGION_HEIGHT as usize) {
            let height = (area.height - y0).min(REGION_HEIGHT);
            for x0 in (0..area.width).step_by(REGION_WIDTH as usize) {
                let width = (area.width - x0).min(REGION_WIDTH);
                let offset = y0 as usize * rowstride + x0 as usize * channels;
                let tile = Source::new(&buf[offset..], rowstride, width, height);

                let region = state.pool.alloc(backend, width, height, verbose)?;
                let info = backend
                    .surface_info(region.surface)
                    .ok_or(BackendError::UnknownSurface(region.surface.0))?;
                let tile_align = Align::new(
                    area.x.wrapping_add(x0 as i32).wrapping_add(align.0) as u32,
                    area.y.wrapping_add(y0 as i32).wrapping_add(align.1) as u32,
                );

                let data = backend
                    .surface_data_mut(region.surface)
                    .ok_or(BackendError::UnknownSurface(region.surface.0))?;
                let mut target = Target {
                    data,
                    bytes_per_line: info.bytes_per_line,
                    x: region.x,
                    y: region.y,
                };
                let convert_state = ConvertState {
                    visual: &state.visual,
                    cube: &state.cube,
                    shades: state.shades,
                    bytes_per_pixel: state.bytes_per_pixel,
                    colormap,
                    gray_colormap: state.gray_colormap.as_ref(),
                };
                execute(
                    &state.routines,
                    conversion,
                    dithered,
                    &convert_state,
                    &mut target,
                    &tile,
                    tile_align,
                    &mut state.stage,
                )?;

                backend.blit(
                    dest,
                    region.surface,
                    BlitRect {
                        src_x: region.x,
                        src_y: region.y,
                        dst_x: area.x + x0 as i32,
                        dst_y: area.y + y0 as i32,
                        width,
                        height,
                    },
                )?;
            }
        }
        Ok(())
    }

    /// Build a colormap for [`draw_indexed`](Self::draw_indexed).
    pub fn create_colormap(&mut self, colors: &[u32]) -> Result<Colormap, RgbError> {
        let (_, state) = self.parts()?;
        let cube = state.uses_colormap_lut().then_some(&state.cube);
        Colormap::new(colors, cube)
    }

    pub fn free_colormap(&self, colormap: Colormap) {
        drop(colormap);
    }

    /// Native pixel value closest to `rgb` (`0xRRGGBB`), without dithering.
    pub fn rgb_to_pixel(&mut self, rgb: u32) -> Result<u32, RgbError> {
        let (_, state) = self.parts()?;
        let (r, g, b) = ((rgb >> 16) & 0xff, (rgb >> 8) & 0xff, rgb & 0xff);
        let visual = &state.visual;
        let pixel = if state.bitmap {
            u32::from(r + (g << 1) + b > 510)
        } else if visual.class.is_colormapped() && visual.depth < 8 {
            state.cube.dithered(ColorCube::index_222_rgb24(rgb))
        } else if visual.class == VisualClass::PseudoColor {
            state.cube.lookup(ColorCube::index_rgb24(rgb))
        } else if visual.class.is_truecolor() {
            visual.encode_rgb(r, g, b)
        } else if visual.class.is_gray() {
            (r + (g << 1) + b) >> (10 - u32::from(visual.depth.min(10)))
        } else {
            0
        };
        Ok(pixel)
    }
}

fn init_state<B: DisplayBackend>(
    backend: &mut B,
    options: &RgbOptions,
) -> Result<ContextState, RgbError> {
    let default_visual = backend.default_visual();
    let (visual, score) = choose_visual(&backend.visuals(), default_visual.id)?;
    verbose_event!(
        options.verbose,
        visual = %visual.id,
        class = %visual.class,
        depth = visual.depth,
        score = format_args!("{score:#06x}"),
        "Chose visual"
    );

    let is_default = visual.id == default_visual.id;
    let mut shades = Shades::default();
    let (table, private_table, cube) =
        if visual.class.is_colormapped() && (3..8).contains(&visual.depth) {
            let table = backend.create_color_table(&visual, false);
            let cube = PaletteBuilder::new(backend, table, false).build_cube_222();
            (table, false, cube)
        } else if visual.class == VisualClass::PseudoColor && visual.depth > 1 {
            let private = options.install_private_table || !is_default;
            let (table, private, built) = build_color_cube(backend, &visual, private, options)?;
            shades = Shades::rgb(built.red, built.green, built.blue);
            verbose_event!(
                options.verbose,
                red = built.red,
                green = built.green,
                blue = built.blue,
                private,
                "Color cube"
            );
            (table, private, built.cube)
        } else if visual.class == VisualClass::GrayScale {
            let table = backend.create_color_table(&visual, true);
            let cube = PaletteBuilder::new(backend, table, true).build_gray_cube();
            (table, true, cube)
        } else {
            let private = visual.class == VisualClass::DirectColor || !is_default;
            (backend.create_color_table(&visual, private), private, ColorCube::new())
        };

    let bitmap = visual.depth == 1;
    let pool = ScratchPool::allocate(backend, &visual, bitmap)?;
    let Some(info) = backend.surface_info(pool.first_surface()) else {
        pool.release(backend);
        return Err(RgbError::ScratchUnavailable);
    };
    let key = FormatKey::new(&visual, &info, shades, bitmap);
    let routines = match select_routines(&key) {
        Ok(routines) => routines,
        Err(e) => {
            pool.release(backend);
            return Err(e);
        }
    };
    verbose_event!(
        options.verbose,
        bits_per_pixel = info.bits_per_pixel,
        byte_order = %info.byte_order,
        rgb = routines.rgb.name(),
        rgb_dither = routines.rgb_dither.name(),
        gray = routines.gray.name(),
        indexed = routines.indexed.name(),
        dither_by_default = routines.dither_by_default,
        scratch_images = pool.n_images(),
        "Selected conversion routines"
    );

    Ok(ContextState {
        visual,
        table,
        private_table,
        shades,
        cube,
        bitmap,
        bytes_per_pixel: (usize::from(info.bits_per_pixel) + 7) / 8,
        routines,
        pool,
        stage: StageBuffer::new(),
        gray_colormap: None,
    })
}

/// Build the best cube in the requested table, retrying once in a fresh
/// private table.
fn build_color_cube<B: DisplayBackend>(
    backend: &mut B,
    visual: &Visual,
    private: bool,
    options: &RgbOptions,
) -> Result<(ColorTableId, bool, crate::palette::BuiltCube), RgbError> {
    let table = backend.create_color_table(visual, private);
    let built = PaletteBuilder::new(backend, table, private)
        .install(options.install_private_table)
        .min_colors(options.min_colors)
        .build_best_cube();
    if let Some(built) = built {
        return Ok((table, private, built));
    }
    if private {
        return Err(RgbError::PaletteExhausted);
    }

    verbose_event!(options.verbose, "Shared color table too full, using a private one");
    let table = backend.create_color_table(visual, true);
    PaletteBuilder::new(backend, table, true)
        .install(options.install_private_table)
        .min_colors(options.min_colors)
        .build_best_cube()
        .map(|built| (table, true, built))
        .ok_or(RgbError::PaletteExhausted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryDisplay, Rgb16};
    use crate::convert::Routine;

    fn display(visual: Visual, bits_per_pixel: u8) -> MemoryDisplay {
        MemoryDisplay::new(vec![(visual, bits_per_pixel)], visual.id)
    }

    fn rgb565() -> Visual {
        Visual::new(0x21, VisualClass::TrueColor, 16).with_masks(0xf800, 0x07e0, 0x001f)
    }

    fn pseudo8() -> Visual {
        Visual::new(0x22, VisualClass::PseudoColor, 8)
    }

    #[test]
    fn test_initialize_is_lazy_and_idempotent() {
        let mut ctx = RenderContext::new(display(rgb565(), 16));
        assert!(!ctx.is_initialized());
        assert!(ctx.visual().is_none());
        ctx.initialize().unwrap();
        let surfaces = ctx.backend().surface_count();
        ctx.initialize().unwrap();
        assert_eq!(ctx.backend().surface_count(), surfaces, "second init allocates nothing");
        assert_eq!(ctx.visual().map(|v| v.depth), Some(16));
    }

    #[test]
    fn test_picks_best_visual() {
        let pseudo = pseudo8();
        let deep = Visual::new(0x30, VisualClass::TrueColor, 24)
            .with_masks(0xff0000, 0x00ff00, 0x0000ff);
        let backend = MemoryDisplay::new(vec![(pseudo, 8), (deep, 32)], pseudo.id);
        let mut ctx = RenderContext::new(backend);
        ctx.initialize().unwrap();
        assert_eq!(ctx.visual().map(|v| v.id), Some(deep.id));
        assert_eq!(ctx.is_private_table(), Some(true), "non-default visual");
    }

    #[test]
    fn test_no_usable_visual() {
        let odd = Visual::new(1, VisualClass::TrueColor, 12);
        let mut ctx = RenderContext::new(display(odd, 16));
        assert!(matches!(ctx.initialize(), Err(RgbError::NoVisuals)));
        assert!(!ctx.is_initialized());
    }

    #[test]
    fn test_pseudo_color_builds_full_cube() {
        let mut ctx = RenderContext::new(display(pseudo8(), 8));
        ctx.initialize().unwrap();
        assert_eq!(ctx.shades().map(|s| s.is_666()), Some(true));
        assert_eq!(ctx.is_private_table(), Some(false));
        let routines = ctx.routines().unwrap();
        assert!(routines.dither_by_default);
        assert_eq!(routines.rgb_dither, Routine::Cube8Dither666);
    }

    #[test]
    fn test_crowded_shared_table_falls_back_to_private() {
        let visual = pseudo8();
        let mut backend = display(visual, 8);
        let crowd: Vec<Rgb16> = (0..200u32)
            .map(|i| Rgb16::from_rgb24(i * 0x010203 + 0x0a0000))
            .collect();
        backend.reserve_colors(visual.id, &crowd);
        let mut ctx = RenderContext::with_options(backend, RgbOptions::default().min_colors(125));
        ctx.initialize().unwrap();
        assert_eq!(ctx.is_private_table(), Some(true));
        assert_eq!(ctx.shades().map(|s| s.is_666()), Some(true));
    }

    #[test]
    fn test_install_forces_private_table() {
        let options = RgbOptions::default().install_private_table(true);
        let mut ctx = RenderContext::with_options(display(pseudo8(), 8), options);
        ctx.initialize().unwrap();
        assert_eq!(ctx.is_private_table(), Some(true));
    }

    #[test]
    fn test_setters_update_options() {
        let mut ctx = RenderContext::new(display(rgb565(), 16));
        ctx.set_verbose(true);
        ctx.set_install_private_table(true);
        ctx.set_min_colors_threshold(64);
        assert_eq!(
            ctx.options(),
            RgbOptions {
                verbose: true,
                install_private_table: true,
                min_colors: 64
            }
        );
    }

    #[test]
    fn test_draw_rgb_565() {
        let mut ctx = RenderContext::new(display(rgb565(), 16));
        let window = ctx.create_window(4, 1).unwrap();
        let pixels = [255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        ctx.draw_rgb(window, DrawArea::new(0, 0, 4, 1), DitherMode::Off, &pixels, 12)
            .unwrap();
        let row: Vec<u32> = (0..4).map(|x| ctx.backend().pixel(window, x, 0).unwrap()).collect();
        assert_eq!(row, vec![0xf800, 0x07e0, 0x001f, 0xffff]);
    }

    #[test]
    fn test_draw_rejects_short_buffer() {
        let mut ctx = RenderContext::new(display(rgb565(), 16));
        let window = ctx.create_window(4, 4).unwrap();
        let result = ctx.draw_rgb(window, DrawArea::new(0, 0, 4, 2), DitherMode::Off, &[0; 20], 12);
        assert!(matches!(
            result,
            Err(RgbError::BufferTooSmall {
                needed: 24,
                actual: 20
            })
        ));
    }

    #[test]
    fn test_draw_rejects_overflowing_rowstride() {
        let mut ctx = RenderContext::new(display(rgb565(), 16));
        let window = ctx.create_window(4, 4).unwrap();
        let rowstride = usize::MAX / 2 + 1;
        let result = ctx.draw_rgb(window, DrawArea::new(0, 0, 1, 3), DitherMode::Off, &[0; 20], rowstride);
        assert!(
            matches!(result, Err(RgbError::BufferOverflow { width: 1, height: 3, .. })),
            "oversized rowstride must be rejected, got {result:?}"
        );
        assert_eq!(ctx.backend().stats().blits, 0);
    }

    #[test]
    fn test_empty_area_draws_nothing() {
        let mut ctx = RenderContext::new(display(rgb565(), 16));
        let window = ctx.create_window(4, 4).unwrap();
        ctx.backend_mut().reset_stats();
        ctx.draw_rgb(window, DrawArea::new(0, 0, 0, 4), DitherMode::Off, &[], 0)
            .unwrap();
        assert_eq!(ctx.backend().stats().blits, 0);
    }

    #[test]
    fn test_large_draw_is_tiled() {
        let mut ctx = RenderContext::new(display(rgb565(), 16));
        let (width, height) = (600u32, 130u32);
        let window = ctx.create_window(width, height).unwrap();
        ctx.backend_mut().reset_stats();
        let pixels = vec![255u8; (width * height * 3) as usize];
        ctx.draw_rgb(
            window,
            DrawArea::new(0, 0, width, height),
            DitherMode::Off,
            &pixels,
            width as usize * 3,
        )
        .unwrap();
        // 3 columns x 3 rows of tiles.
        assert_eq!(ctx.backend().stats().blits, 9);
        assert_eq!(ctx.backend().pixel(window, width - 1, height - 1), Some(0xffff));
    }

    #[test]
    fn test_draw_rgb32_and_gray_match_rgb() {
        let mut ctx = RenderContext::new(display(rgb565(), 16));
        let window = ctx.create_window(2, 3).unwrap();
        ctx.draw_rgb(window, DrawArea::new(0, 0, 2, 1), DitherMode::Off, &[10, 20, 30, 200, 100, 50], 6)
            .unwrap();
        ctx.draw_rgb32(
            window,
            DrawArea::new(0, 1, 2, 1),
            DitherMode::Off,
            &[10, 20, 30, 0, 200, 100, 50, 0],
            8,
        )
        .unwrap();
        assert_eq!(ctx.backend().pixel(window, 0, 0), ctx.backend().pixel(window, 0, 1));
        assert_eq!(ctx.backend().pixel(window, 1, 0), ctx.backend().pixel(window, 1, 1));

        ctx.draw_gray(window, DrawArea::new(0, 2, 2, 1), DitherMode::Off, &[0, 255], 2)
            .unwrap();
        assert_eq!(ctx.backend().pixel(window, 0, 2), Some(0));
        assert_eq!(ctx.backend().pixel(window, 1, 2), Some(0xffff));
    }

    #[test]
    fn test_draw_indexed_resolves_colormap() {
        let mut ctx = RenderContext::new(display(rgb565(), 16));
        let window = ctx.create_window(3, 1).unwrap();
        let colormap = ctx.create_colormap(&[0xff0000, 0x00ff00, 0x0000ff]).unwrap();
        ctx.draw_indexed(window, DrawArea::new(0, 0, 3, 1), DitherMode::Off, &[2, 0, 1], 3, &colormap)
            .unwrap();
        let row: Vec<u32> = (0..3).map(|x| ctx.backend().pixel(window, x, 0).unwrap()).collect();
        assert_eq!(row, vec![0x001f, 0xf800, 0x07e0]);
        ctx.free_colormap(colormap);
    }

    #[test]
    fn test_pseudo_colormap_resolves_through_cube() {
        let mut ctx = RenderContext::new(display(pseudo8(), 8));
        let colormap = ctx.create_colormap(&[0x000000, 0xffffff]).unwrap();
        assert_ne!(
            colormap.lut_entry(0),
            colormap.lut_entry(1),
            "black and white must map to different cube cells"
        );
        let window = ctx.create_window(2, 1).unwrap();
        ctx.draw_indexed(window, DrawArea::new(0, 0, 2, 1), DitherMode::Off, &[1, 0], 2, &colormap)
            .unwrap();
        let table = ctx.color_table().unwrap();
        let rgb = ctx.backend().read_rgb(window, table).unwrap();
        assert_eq!(rgb, vec![255, 255, 255, 0, 0, 0]);
    }

    #[test]
    fn test_pseudo_gray_uses_gray_colormap() {
        let mut ctx = RenderContext::new(display(pseudo8(), 8));
        let window = ctx.create_window(2, 1).unwrap();
        ctx.draw_gray(window, DrawArea::new(0, 0, 2, 1), DitherMode::Off, &[0, 255], 2)
            .unwrap();
        let table = ctx.color_table().unwrap();
        let rgb = ctx.backend().read_rgb(window, table).unwrap();
        assert_eq!(rgb, vec![0, 0, 0, 255, 255, 255]);
    }

    #[test]
    fn test_dither_auto_follows_default() {
        let mut ctx = RenderContext::new(display(rgb565(), 16));
        let window = ctx.create_window(8, 1).unwrap();
        let gray = [0x84u8; 24];
        ctx.draw_rgb(window, DrawArea::new(0, 0, 8, 1), DitherMode::Auto, &gray, 24)
            .unwrap();
        let auto: Vec<u32> = (0..8).map(|x| ctx.backend().pixel(window, x, 0).unwrap()).collect();
        assert!(auto.windows(2).all(|w| w[0] == w[1]), "565 does not dither by default");
        assert!(ctx.is_ditherable().unwrap());
    }

    #[test]
    fn test_rgb_to_pixel() {
        let mut ctx = RenderContext::new(display(rgb565(), 16));
        assert_eq!(ctx.rgb_to_pixel(0xff0000).unwrap(), 0xf800);
        assert_eq!(ctx.rgb_to_pixel(0xffffff).unwrap(), 0xffff);

        let mono = Visual::new(1, VisualClass::StaticGray, 1);
        let mut ctx = RenderContext::new(display(mono, 1));
        assert_eq!(ctx.rgb_to_pixel(0xffffff).unwrap(), 1);
        assert_eq!(ctx.rgb_to_pixel(0x404040).unwrap(), 0);

        let gray = Visual::new(2, VisualClass::StaticGray, 8);
        let mut ctx = RenderContext::new(display(gray, 8));
        assert_eq!(ctx.rgb_to_pixel(0xffffff).unwrap(), 255);
    }

    #[test]
    fn test_rgb_to_pixel_pseudo_matches_table() {
        let mut ctx = RenderContext::new(display(pseudo8(), 8));
        let pixel = ctx.rgb_to_pixel(0xff0000).unwrap();
        let table = ctx.color_table().unwrap();
        assert_eq!(
            ctx.backend().lookup_color(table, pixel),
            Some(Rgb16::from_rgb24(0xff0000))
        );
    }

    #[test]
    fn test_mono_draw_sets_white_bits() {
        let mono = Visual::new(1, VisualClass::StaticGray, 1);
        let mut ctx = RenderContext::new(display(mono, 1));
        let window = ctx.create_window(2, 1).unwrap();
        ctx.draw_rgb(window, DrawArea::new(0, 0, 2, 1), DitherMode::On, &[255, 255, 255, 0, 0, 0], 6)
            .unwrap();
        assert_eq!(ctx.backend().pixel(window, 0, 0), Some(1));
        assert_eq!(ctx.backend().pixel(window, 1, 0), Some(0));
    }

    #[test]
    fn test_gamma_default() {
        let ctx = RenderContext::new(display(rgb565(), 16));
        if cfg!(feature = "gamma") {
            assert_eq!(ctx.gamma(), 0.5);
        } else {
            assert_eq!(ctx.gamma(), 1.0);
        }
    }
}
