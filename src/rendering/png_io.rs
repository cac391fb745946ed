use std::io::Cursor;
use std::path::Path;

use crate::error::SimError;

/// Packed 8-bit RGB pixels, no row padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 3);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Image filled by `f(x, y)`.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 3]) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y));
            }
        }
        Self::new(width, height, pixels)
    }

    #[inline]
    pub fn rowstride(&self) -> usize {
        self.width as usize * 3
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = y as usize * self.rowstride() + x as usize * 3;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks_exact(self.rowstride().max(1))
    }
}

/// Decode any 8- or 16-bit PNG into RGB. Alpha is dropped, gray is
/// replicated into all three channels, palettes are expanded.
pub fn decode_png(bytes: &[u8]) -> Result<RgbImage, SimError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| SimError::PngDecode(e.to_string()))?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| SimError::PngDecode(e.to_string()))?;

    if info.bit_depth != png::BitDepth::Eight {
        return Err(SimError::PngDecode(format!(
            "unexpected bit depth {:?} after normalization",
            info.bit_depth
        )));
    }
    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        png::ColorType::Indexed => {
            return Err(SimError::PngDecode(
                "palette was not expanded".to_string(),
            ))
        }
    };

    let width = info.width as usize;
    let mut pixels = Vec::with_capacity(width * info.height as usize * 3);
    for row in buf[..info.buffer_size()].chunks_exact(info.line_size) {
        for px in row[..width * channels].chunks_exact(channels) {
            if channels < 3 {
                pixels.extend_from_slice(&[px[0]; 3]);
            } else {
                pixels.extend_from_slice(&px[..3]);
            }
        }
    }
    tracing::debug!(
        width = info.width,
        height = info.height,
        color_type = ?info.color_type,
        "Decoded PNG"
    );
    Ok(RgbImage::new(info.width, info.height, pixels))
}

pub fn read_png(path: &Path) -> Result<RgbImage, SimError> {
    let bytes = std::fs::read(path)?;
    decode_png(&bytes)
}

/// Encode an RGB image as an 8-bit RGB PNG.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, SimError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width, image.height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| SimError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&image.pixels)
            .map_err(|e| SimError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

pub fn write_png(path: &Path, image: &RgbImage) -> Result<usize, SimError> {
    let bytes = encode_png(image)?;
    std::fs::write(path, &bytes)?;
    Ok(bytes.len())
}
