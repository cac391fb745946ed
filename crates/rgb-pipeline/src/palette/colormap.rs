use super::ColorCube;
use crate::error::RgbError;

/// Most entries an indexed image palette may carry.
pub const MAX_COLORMAP_SIZE: usize = 256;

/// Palette of an indexed image, built by
/// [`RenderContext::create_colormap`](crate::RenderContext::create_colormap).
///
/// Colors are packed `0xRRGGBB`. When built against a color cube, `lut`
/// holds the pixel each index resolves to, so pseudo-color conversion
/// becomes a single table lookup per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colormap {
    colors: [u32; MAX_COLORMAP_SIZE],
    len: usize,
    lut: [u8; MAX_COLORMAP_SIZE],
}

impl Colormap {
    /// Entries past `colors.len()` read as black.
    pub(crate) fn new(colors: &[u32], cube: Option<&ColorCube>) -> Result<Self, RgbError> {
        if colors.len() > MAX_COLORMAP_SIZE {
            return Err(RgbError::TooManyColors {
                count: colors.len(),
            });
        }
        let mut map = Self {
            colors: [0; MAX_COLORMAP_SIZE],
            len: colors.len(),
            lut: [0; MAX_COLORMAP_SIZE],
        };
        for (slot, &rgb) in map.colors.iter_mut().zip(colors) {
            *slot = rgb & 0xff_ffff;
        }
        if let Some(cube) = cube {
            for (entry, &rgb) in map.lut.iter_mut().zip(map.colors.iter()) {
                *entry = cube.lookup(ColorCube::index_rgb24(rgb)) as u8;
            }
        }
        Ok(map)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn colors(&self) -> &[u32] {
        &self.colors[..self.len]
    }

    #[inline]
    pub fn color(&self, index: u8) -> u32 {
        self.colors[index as usize]
    }

    #[inline]
    pub fn lut_entry(&self, index: u8) -> u8 {
        self.lut[index as usize]
    }
}
