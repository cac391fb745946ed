use std::collections::HashMap;

use super::RgbImage;
use crate::error::SimError;

/// Pixel layout handed to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFormat {
    #[default]
    Rgb,
    Rgb32,
    Gray,
    Indexed,
}

impl SourceFormat {
    pub fn name(self) -> &'static str {
        match self {
            SourceFormat::Rgb => "rgb",
            SourceFormat::Rgb32 => "rgb32",
            SourceFormat::Gray => "gray",
            SourceFormat::Indexed => "indexed",
        }
    }

    pub fn channels(self) -> usize {
        match self {
            SourceFormat::Rgb => 3,
            SourceFormat::Rgb32 => 4,
            SourceFormat::Gray | SourceFormat::Indexed => 1,
        }
    }
}

/// An image converted into one [`SourceFormat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSource {
    pub format: SourceFormat,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub rowstride: usize,
    /// `0xRRGGBB` entries for indexed sources, in order of first use.
    pub palette: Vec<u32>,
}

/// Rec. 601 luma in 8.8 fixed point.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((77 * u32::from(r) + 150 * u32::from(g) + 29 * u32::from(b) + 128) >> 8) as u8
}

pub fn prepare_source(image: &RgbImage, format: SourceFormat) -> Result<PreparedSource, SimError> {
    let (data, palette) = match format {
        SourceFormat::Rgb => (image.pixels.clone(), Vec::new()),
        SourceFormat::Rgb32 => {
            let data = image
                .pixels
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 0xff])
                .collect();
            (data, Vec::new())
        }
        SourceFormat::Gray => {
            let data = image
                .pixels
                .chunks_exact(3)
                .map(|px| luminance(px[0], px[1], px[2]))
                .collect();
            (data, Vec::new())
        }
        SourceFormat::Indexed => index_colors(image)?,
    };
    Ok(PreparedSource {
        format,
        width: image.width,
        height: image.height,
        data,
        rowstride: image.width as usize * format.channels(),
        palette,
    })
}

/// Map each distinct color to an index; fails past 256 colors.
fn index_colors(image: &RgbImage) -> Result<(Vec<u8>, Vec<u32>), SimError> {
    let mut lookup: HashMap<u32, usize> = HashMap::new();
    let mut palette = Vec::new();
    let mut indices = Vec::with_capacity(image.pixels.len() / 3);
    for px in image.pixels.chunks_exact(3) {
        let rgb = (u32::from(px[0]) << 16) | (u32::from(px[1]) << 8) | u32::from(px[2]);
        let index = *lookup.entry(rgb).or_insert_with(|| {
            palette.push(rgb);
            palette.len() - 1
        });
        indices.push(index);
    }
    if palette.len() > 256 {
        return Err(SimError::TooManyColors {
            count: palette.len(),
        });
    }
    let indices = indices.into_iter().map(|i| i as u8).collect();
    Ok((indices, palette))
}
