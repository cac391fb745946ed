use super::{RegionPacker, IMAGE_COUNTS, N_REGIONS, REGION_HEIGHT, REGION_WIDTH};
use crate::backend::{DisplayBackend, SurfaceId};
use crate::error::RgbError;
use crate::visual::Visual;

/// A region ready to be converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScratchRegion {
    pub surface: SurfaceId,
    pub x: u32,
    pub y: u32,
}

/// The scratch surfaces backing the logical regions.
#[derive(Debug)]
pub struct ScratchPool {
    surfaces: Vec<SurfaceId>,
    n_images: usize,
    packer: RegionPacker,
}

impl ScratchPool {
    /// Create the surfaces, preferring few large shared ones. Bitmap
    /// displays never use shared memory.
    pub fn allocate<B: DisplayBackend>(
        backend: &mut B,
        visual: &Visual,
        bitmap: bool,
    ) -> Result<Self, RgbError> {
        for &n_images in &IMAGE_COUNTS {
            if let Some(surfaces) = create_surfaces(backend, visual, n_images, !bitmap) {
                tracing::debug!(n_images, shared = !bitmap, "Allocated scratch surfaces");
                return Ok(Self::from_surfaces(surfaces, n_images));
            }
        }
        let surfaces = create_surfaces(backend, visual, N_REGIONS, false)
            .ok_or(RgbError::ScratchUnavailable)?;
        tracing::debug!(n_images = N_REGIONS, shared = false, "Allocated scratch surfaces");
        Ok(Self::from_surfaces(surfaces, N_REGIONS))
    }

    fn from_surfaces(surfaces: Vec<SurfaceId>, n_images: usize) -> Self {
        Self {
            surfaces,
            n_images,
            packer: RegionPacker::new(),
        }
    }

    pub fn n_images(&self) -> usize {
        self.n_images
    }

    pub fn surfaces(&self) -> &[SurfaceId] {
        &self.surfaces
    }

    /// Any surface of the pool; they all share one format.
    pub fn first_surface(&self) -> SurfaceId {
        self.surfaces[0]
    }

    /// Reserve a `width x height` region, flushing the display first when
    /// the pool has run out.
    pub fn alloc<B: DisplayBackend>(
        &mut self,
        backend: &mut B,
        width: u32,
        height: u32,
        verbose: bool,
    ) -> Result<ScratchRegion, RgbError> {
        let placement = self.packer.place(width, height);
        if placement.flush_first {
            verbose_event!(verbose, regions = N_REGIONS, "Scratch regions exhausted, flushing");
            backend.flush()?;
        }
        let per_surface = N_REGIONS / self.n_images;
        let region = ScratchRegion {
            surface: self.surfaces[placement.region * self.n_images / N_REGIONS],
            x: placement.x + REGION_WIDTH * (placement.region % per_surface) as u32,
            y: placement.y,
        };
        tracing::trace!(
            region = placement.region,
            x = region.x,
            y = region.y,
            width,
            height,
            "Scratch region"
        );
        Ok(region)
    }

    pub fn release<B: DisplayBackend>(self, backend: &mut B) {
        for surface in self.surfaces {
            backend.destroy_surface(surface);
        }
    }
}

/// Create `n_images` surfaces, or none at all.
fn create_surfaces<B: DisplayBackend>(
    backend: &mut B,
    visual: &Visual,
    n_images: usize,
    shared: bool,
) -> Option<Vec<SurfaceId>> {
    let width = REGION_WIDTH * (N_REGIONS / n_images) as u32;
    let mut surfaces = Vec::with_capacity(n_images);
    for _ in 0..n_images {
        match backend.create_surface(visual, width, REGION_HEIGHT, shared) {
            Some(surface) => surfaces.push(surface),
            None => {
                for surface in surfaces {
                    backend.destroy_surface(surface);
                }
                return None;
            }
        }
    }
    Some(surfaces)
}
