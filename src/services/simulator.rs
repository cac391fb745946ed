use std::collections::BTreeSet;

use rgb_pipeline::visual::{choose_visual, score_visual};
use rgb_pipeline::{
    Conversion, DisplayBackend, DitherMode, DrawArea, MemoryDisplay, RenderContext, RoutineSet,
    Visual, VisualClass, VisualId,
};
use serde::Serialize;

use crate::error::SimError;
use crate::models::DisplayConfig;
use crate::rendering::{prepare_source, RgbImage, SourceFormat};

/// What to draw and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRequest {
    pub source: SourceFormat,
    pub dither: DitherMode,
    /// Destination of the image's top-left corner in the window.
    pub x: i32,
    pub y: i32,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            source: SourceFormat::Rgb,
            dither: DitherMode::Auto,
            x: 0,
            y: 0,
        }
    }
}

impl RenderRequest {
    #[inline]
    pub fn source(mut self, source: SourceFormat) -> Self {
        self.source = source;
        self
    }

    #[inline]
    pub fn dither(mut self, dither: DitherMode) -> Self {
        self.dither = dither;
        self
    }

    #[inline]
    pub fn origin(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderSummary {
    pub visual: String,
    pub class: String,
    pub depth: u8,
    pub conversion: String,
    pub dithered: bool,
    pub blits: usize,
    pub flushes: usize,
}

/// The window as the display would show it.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: RgbImage,
    pub summary: RenderSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualReport {
    pub id: String,
    pub class: String,
    pub depth: u8,
    pub bits_per_pixel: u8,
    pub score: u32,
    pub default: bool,
    pub chosen: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteReport {
    pub visual: String,
    pub class: String,
    pub depth: u8,
    pub bytes_per_pixel: usize,
    pub private_table: bool,
    /// Red, green and blue shade counts of a pseudo color cube.
    pub shades: Option<[u8; 3]>,
    /// Distinct pixels the cube maps colors to.
    pub cube_pixels: Option<usize>,
    pub allocated_cells: usize,
    pub rgb_routine: String,
    pub rgb_dither_routine: String,
    pub dither_by_default: bool,
    pub ditherable: bool,
    pub scratch_images: usize,
}

/// A simulated display and the render context drawing on it.
#[derive(Debug)]
pub struct Simulator {
    ctx: RenderContext<MemoryDisplay>,
    visuals: Vec<(Visual, u8)>,
    default_visual: VisualId,
}

fn conversion_for(set: &RoutineSet, source: SourceFormat, dithered: bool) -> Conversion {
    match (source, dithered) {
        (SourceFormat::Rgb, false) => Conversion::Direct(set.rgb),
        (SourceFormat::Rgb, true) => Conversion::Direct(set.rgb_dither),
        (SourceFormat::Rgb32, false) => set.rgb32,
        (SourceFormat::Rgb32, true) => set.rgb32_dither,
        (SourceFormat::Gray, false) => set.gray,
        (SourceFormat::Gray, true) => set.gray_dither,
        (SourceFormat::Indexed, false) => set.indexed,
        (SourceFormat::Indexed, true) => set.indexed_dither,
    }
}

impl Simulator {
    pub fn new(config: &DisplayConfig) -> Result<Self, SimError> {
        let (visuals, default_visual) = config.visuals()?;
        let display = config.build_display()?;
        Ok(Self {
            ctx: RenderContext::with_options(display, config.options()),
            visuals,
            default_visual,
        })
    }

    pub fn context(&self) -> &RenderContext<MemoryDisplay> {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut RenderContext<MemoryDisplay> {
        &mut self.ctx
    }

    pub fn initialize(&mut self) -> Result<(), SimError> {
        self.ctx.initialize()?;
        Ok(())
    }

    fn chosen_visual(&mut self) -> Result<Visual, SimError> {
        self.initialize()?;
        self.ctx
            .visual()
            .copied()
            .ok_or(SimError::Pipeline(rgb_pipeline::RgbError::NoVisuals))
    }

    /// Draw `image` into a fresh window and read the window back.
    pub fn render(
        &mut self,
        image: &RgbImage,
        request: RenderRequest,
    ) -> Result<RenderOutput, SimError> {
        let visual = self.chosen_visual()?;
        let source = prepare_source(image, request.source)?;

        let width = image.width.saturating_add_signed(request.x).max(1);
        let height = image.height.saturating_add_signed(request.y).max(1);
        let window = self.ctx.create_window(width, height)?;
        self.ctx.backend_mut().reset_stats();

        let area = DrawArea::new(request.x, request.y, image.width, image.height);
        let (buf, stride) = (&source.data, source.rowstride);
        match request.source {
            SourceFormat::Rgb => self.ctx.draw_rgb(window, area, request.dither, buf, stride)?,
            SourceFormat::Rgb32 => self.ctx.draw_rgb32(window, area, request.dither, buf, stride)?,
            SourceFormat::Gray => self.ctx.draw_gray(window, area, request.dither, buf, stride)?,
            SourceFormat::Indexed => {
                let colormap = self.ctx.create_colormap(&source.palette)?;
                self.ctx
                    .draw_indexed(window, area, request.dither, buf, stride, &colormap)?;
                self.ctx.free_colormap(colormap);
            }
        }

        let routines = self
            .ctx
            .routines()
            .copied()
            .ok_or(SimError::Pipeline(rgb_pipeline::RgbError::NoVisuals))?;
        let dithered = request.dither.enabled(routines.dither_by_default);
        let stats = self.ctx.backend().stats();
        let table = self
            .ctx
            .color_table()
            .ok_or(SimError::Pipeline(rgb_pipeline::RgbError::NoVisuals))?;
        let pixels = self.ctx.backend().read_rgb(window, table)?;
        self.ctx.backend_mut().destroy_surface(window);

        let summary = RenderSummary {
            visual: visual.id.to_string(),
            class: visual.class.to_string(),
            depth: visual.depth,
            conversion: conversion_for(&routines, request.source, dithered)
                .name()
                .to_string(),
            dithered,
            blits: stats.blits,
            flushes: stats.flushes,
        };
        tracing::info!(
            visual = %summary.visual,
            conversion = %summary.conversion,
            dithered,
            blits = summary.blits,
            "Rendered image"
        );
        Ok(RenderOutput {
            image: RgbImage::new(width, height, pixels),
            summary,
        })
    }

    /// Score every visual without initializing the context.
    pub fn visual_report(&self) -> Vec<VisualReport> {
        let plain: Vec<Visual> = self.visuals.iter().map(|(v, _)| *v).collect();
        let chosen = choose_visual(&plain, self.default_visual)
            .ok()
            .map(|(visual, _)| visual.id);
        self.visuals
            .iter()
            .map(|&(visual, bits_per_pixel)| VisualReport {
                id: visual.id.to_string(),
                class: visual.class.to_string(),
                depth: visual.depth,
                bits_per_pixel,
                score: score_visual(&visual, self.default_visual),
                default: visual.id == self.default_visual,
                chosen: Some(visual.id) == chosen,
            })
            .collect()
    }

    /// Initialize and describe the color setup the pipeline arrived at.
    pub fn palette_report(&mut self) -> Result<PaletteReport, SimError> {
        let visual = self.chosen_visual()?;
        let ditherable = self.ctx.is_ditherable()?;
        let ctx = &self.ctx;
        let missing = || SimError::Pipeline(rgb_pipeline::RgbError::NoVisuals);

        let routines = ctx.routines().copied().ok_or_else(missing)?;
        let table = ctx.color_table().ok_or_else(missing)?;
        let has_cube = visual.class.is_colormapped() || visual.class == VisualClass::GrayScale;
        let shades = ctx
            .shades()
            .filter(|_| visual.class == VisualClass::PseudoColor && visual.depth == 8)
            .map(|s| [s.red, s.green, s.blue]);
        let cube_pixels = if has_cube {
            ctx.cube().map(|cube| {
                let table = if visual.depth < 8 {
                    cube.dithered_table()
                } else {
                    cube.lookup_table()
                };
                table.iter().collect::<BTreeSet<_>>().len()
            })
        } else {
            None
        };

        Ok(PaletteReport {
            visual: visual.id.to_string(),
            class: visual.class.to_string(),
            depth: visual.depth,
            bytes_per_pixel: ctx.bytes_per_pixel().unwrap_or(0),
            private_table: ctx.is_private_table().unwrap_or(false),
            shades,
            cube_pixels,
            allocated_cells: ctx.backend().allocated_cells(table),
            rgb_routine: routines.rgb.name().to_string(),
            rgb_dither_routine: routines.rgb_dither.name().to_string(),
            dither_by_default: routines.dither_by_default,
            ditherable,
            scratch_images: ctx.scratch_images().unwrap_or(0),
        })
    }
}
