//! Test fixtures and constants.

use std::path::{Path, PathBuf};

use rgbsim::models::{DisplayConfig, DisplayPreset};
use rgbsim::rendering::{write_png, RgbImage};
use rgbsim::services::Simulator;

/// Presets grouped by what a rendered image can be checked against
pub mod presets {
    use rgbsim::models::DisplayPreset;

    /// Displays that reproduce every 8-bit RGB color exactly
    pub const LOSSLESS: [DisplayPreset; 4] = [
        DisplayPreset::Rgb888,
        DisplayPreset::Bgr888,
        DisplayPreset::Xrgb32,
        DisplayPreset::Bgrx32,
    ];

    /// Static gray displays whose ramp ends in pure black and white
    pub const STATIC_GRAY: [DisplayPreset; 4] = [
        DisplayPreset::Gray8,
        DisplayPreset::Gray4,
        DisplayPreset::Gray4Packed,
        DisplayPreset::Mono,
    ];
}

/// Horizontal red ramp, vertical green ramp, constant blue
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        [
            (x * 255 / width.saturating_sub(1).max(1)) as u8,
            (y * 255 / height.saturating_sub(1).max(1)) as u8,
            0x80,
        ]
    })
}

/// Black, white and the six primaries and secondaries in one row
pub fn primaries() -> RgbImage {
    const COLORS: [[u8; 3]; 8] = [
        [0, 0, 0],
        [255, 255, 255],
        [255, 0, 0],
        [0, 255, 0],
        [0, 0, 255],
        [255, 255, 0],
        [0, 255, 255],
        [255, 0, 255],
    ];
    RgbImage::from_fn(COLORS.len() as u32, 1, |x, _| COLORS[x as usize])
}

/// Single-color image
pub fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_fn(width, height, |_, _| color)
}

pub fn simulator(preset: DisplayPreset) -> Simulator {
    Simulator::new(&DisplayConfig::default().with_preset(preset))
        .unwrap_or_else(|e| panic!("Simulator for {preset} should build: {e}"))
}

/// Write `image` as `name` inside `dir` and return its path
pub fn write_fixture_png(dir: &Path, name: &str, image: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    write_png(&path, image).expect("Should write fixture PNG");
    path
}

/// Config with two explicit visuals: 8-bit pseudo color (default) and
/// 16-bit 5-6-5 true color.
pub const TWO_VISUAL_YAML: &str = r#"
visuals:
  - id: 0x40
    class: pseudo-color
    depth: 8
    bits_per_pixel: 8
  - id: 0x41
    class: true-color
    depth: 16
    bits_per_pixel: 16
    masks: [0xf800, 0x07e0, 0x001f]
    byte_order: msb
default_visual: 0x40
pipeline:
  verbose: true
"#;

/// One black and one white pixel
pub fn black_white() -> RgbImage {
    RgbImage::new(2, 1, vec![0, 0, 0, 255, 255, 255])
}
