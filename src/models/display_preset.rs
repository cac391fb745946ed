use std::fmt;
use std::str::FromStr;

use rgb_pipeline::{ByteOrder, Visual, VisualClass, VisualId};

use crate::error::SimError;

/// Built-in simulated displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayPreset {
    Pseudo8,
    Rgb565,
    Rgb565Swapped,
    Rgb555,
    Rgb888,
    Bgr888,
    Xrgb32,
    Bgrx32,
    TrueColor12,
    Gray8,
    Gray4,
    Gray4Packed,
    GrayScale8,
    Color4,
    Mono,
    Workstation,
}

const MASKS_565: (u32, u32, u32) = (0xf800, 0x07e0, 0x001f);
const MASKS_555: (u32, u32, u32) = (0x7c00, 0x03e0, 0x001f);
const MASKS_444: (u32, u32, u32) = (0x0f00, 0x00f0, 0x000f);
const MASKS_RGB: (u32, u32, u32) = (0xff0000, 0x00ff00, 0x0000ff);
const MASKS_BGR: (u32, u32, u32) = (0x0000ff, 0x00ff00, 0xff0000);

fn truecolor(id: u32, depth: u8, masks: (u32, u32, u32)) -> Visual {
    Visual::new(id, VisualClass::TrueColor, depth).with_masks(masks.0, masks.1, masks.2)
}

fn swapped(order: ByteOrder) -> ByteOrder {
    match order {
        ByteOrder::LsbFirst => ByteOrder::MsbFirst,
        ByteOrder::MsbFirst => ByteOrder::LsbFirst,
    }
}

impl DisplayPreset {
    pub const ALL: [DisplayPreset; 16] = [
        DisplayPreset::Pseudo8,
        DisplayPreset::Rgb565,
        DisplayPreset::Rgb565Swapped,
        DisplayPreset::Rgb555,
        DisplayPreset::Rgb888,
        DisplayPreset::Bgr888,
        DisplayPreset::Xrgb32,
        DisplayPreset::Bgrx32,
        DisplayPreset::TrueColor12,
        DisplayPreset::Gray8,
        DisplayPreset::Gray4,
        DisplayPreset::Gray4Packed,
        DisplayPreset::GrayScale8,
        DisplayPreset::Color4,
        DisplayPreset::Mono,
        DisplayPreset::Workstation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DisplayPreset::Pseudo8 => "pseudo8",
            DisplayPreset::Rgb565 => "rgb565",
            DisplayPreset::Rgb565Swapped => "rgb565-swapped",
            DisplayPreset::Rgb555 => "rgb555",
            DisplayPreset::Rgb888 => "rgb888",
            DisplayPreset::Bgr888 => "bgr888",
            DisplayPreset::Xrgb32 => "xrgb32",
            DisplayPreset::Bgrx32 => "bgrx32",
            DisplayPreset::TrueColor12 => "truecolor12",
            DisplayPreset::Gray8 => "gray8",
            DisplayPreset::Gray4 => "gray4",
            DisplayPreset::Gray4Packed => "gray4-packed",
            DisplayPreset::GrayScale8 => "grayscale8",
            DisplayPreset::Color4 => "color4",
            DisplayPreset::Mono => "mono",
            DisplayPreset::Workstation => "workstation",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DisplayPreset::Pseudo8 => "8-bit pseudo color, 256-entry writable color table",
            DisplayPreset::Rgb565 => "16-bit true color, 5-6-5, host byte order",
            DisplayPreset::Rgb565Swapped => "16-bit true color, 5-6-5, foreign byte order",
            DisplayPreset::Rgb555 => "15-bit true color in 16-bit pixels",
            DisplayPreset::Rgb888 => "24-bit true color, packed, LSB first",
            DisplayPreset::Bgr888 => "24-bit true color, blue in the high byte",
            DisplayPreset::Xrgb32 => "24-bit true color in 32-bit pixels, MSB first",
            DisplayPreset::Bgrx32 => "24-bit true color in 32-bit pixels, LSB first",
            DisplayPreset::TrueColor12 => "16-bit pixels with 4 bits per channel",
            DisplayPreset::Gray8 => "8-bit static gray",
            DisplayPreset::Gray4 => "4-bit static gray in 8-bit pixels",
            DisplayPreset::Gray4Packed => "4-bit static gray, two pixels per byte",
            DisplayPreset::GrayScale8 => "8-bit gray scale with a writable table",
            DisplayPreset::Color4 => "4-bit pseudo color in 8-bit pixels",
            DisplayPreset::Mono => "1-bit monochrome",
            DisplayPreset::Workstation => "pseudo color default plus gray, mono and 24-bit visuals",
        }
    }

    /// Visuals with their bits per pixel, default visual first.
    pub fn visuals(self) -> Vec<(Visual, u8)> {
        let host = ByteOrder::host();
        match self {
            DisplayPreset::Pseudo8 => vec![(Visual::new(0x22, VisualClass::PseudoColor, 8), 8)],
            DisplayPreset::Rgb565 => vec![(truecolor(0x21, 16, MASKS_565), 16)],
            DisplayPreset::Rgb565Swapped => vec![(
                truecolor(0x21, 16, MASKS_565).with_byte_order(swapped(host)),
                16,
            )],
            DisplayPreset::Rgb555 => vec![(truecolor(0x23, 15, MASKS_555), 16)],
            DisplayPreset::Rgb888 => vec![(
                truecolor(0x24, 24, MASKS_RGB).with_byte_order(ByteOrder::LsbFirst),
                24,
            )],
            DisplayPreset::Bgr888 => vec![(
                truecolor(0x25, 24, MASKS_BGR).with_byte_order(ByteOrder::LsbFirst),
                24,
            )],
            DisplayPreset::Xrgb32 => vec![(
                truecolor(0x26, 24, MASKS_RGB).with_byte_order(ByteOrder::MsbFirst),
                32,
            )],
            DisplayPreset::Bgrx32 => vec![(
                truecolor(0x27, 24, MASKS_RGB).with_byte_order(ByteOrder::LsbFirst),
                32,
            )],
            DisplayPreset::TrueColor12 => vec![(truecolor(0x28, 16, MASKS_444), 16)],
            DisplayPreset::Gray8 => vec![(Visual::new(0x30, VisualClass::StaticGray, 8), 8)],
            DisplayPreset::Gray4 => vec![(Visual::new(0x31, VisualClass::StaticGray, 4), 8)],
            DisplayPreset::Gray4Packed => {
                vec![(Visual::new(0x32, VisualClass::StaticGray, 4), 4)]
            }
            DisplayPreset::GrayScale8 => vec![(Visual::new(0x33, VisualClass::GrayScale, 8), 8)],
            DisplayPreset::Color4 => vec![(Visual::new(0x34, VisualClass::PseudoColor, 4), 8)],
            DisplayPreset::Mono => vec![(Visual::new(0x35, VisualClass::StaticGray, 1), 1)],
            DisplayPreset::Workstation => vec![
                (Visual::new(0x22, VisualClass::PseudoColor, 8), 8),
                (Visual::new(0x30, VisualClass::StaticGray, 8), 8),
                (Visual::new(0x35, VisualClass::StaticGray, 1), 1),
                (
                    truecolor(0x26, 24, MASKS_RGB).with_byte_order(ByteOrder::MsbFirst),
                    32,
                ),
            ],
        }
    }

    pub fn default_visual(self) -> VisualId {
        self.visuals()
            .first()
            .map(|(visual, _)| visual.id)
            .unwrap_or(VisualId(0))
    }
}

impl fmt::Display for DisplayPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DisplayPreset {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        DisplayPreset::ALL
            .into_iter()
            .find(|preset| preset.name() == wanted)
            .ok_or_else(|| SimError::UnknownPreset(s.to_string()))
    }
}
