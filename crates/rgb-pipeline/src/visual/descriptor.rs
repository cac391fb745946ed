use std::fmt;

use crate::dither::truncate_channel;

/// Visual class of a display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualClass {
    /// Fixed gray ramp, pixel value is the intensity.
    StaticGray,
    /// Writable gray ramp.
    GrayScale,
    /// Fixed, read-only color table.
    StaticColor,
    /// Writable color table shared between clients.
    PseudoColor,
    /// Pixel value carries the channels directly.
    TrueColor,
    /// Like true color, but each channel goes through a writable table.
    DirectColor,
}

impl VisualClass {
    pub const ALL: [VisualClass; 6] = [
        VisualClass::StaticGray,
        VisualClass::GrayScale,
        VisualClass::StaticColor,
        VisualClass::PseudoColor,
        VisualClass::TrueColor,
        VisualClass::DirectColor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            VisualClass::StaticGray => "static gray",
            VisualClass::GrayScale => "grayscale",
            VisualClass::StaticColor => "static color",
            VisualClass::PseudoColor => "pseudo color",
            VisualClass::TrueColor => "true color",
            VisualClass::DirectColor => "direct color",
        }
    }

    #[inline]
    pub fn is_gray(self) -> bool {
        matches!(self, VisualClass::StaticGray | VisualClass::GrayScale)
    }

    /// True and direct color are handled identically by the converters.
    #[inline]
    pub fn is_truecolor(self) -> bool {
        matches!(self, VisualClass::TrueColor | VisualClass::DirectColor)
    }

    #[inline]
    pub fn is_colormapped(self) -> bool {
        matches!(self, VisualClass::PseudoColor | VisualClass::StaticColor)
    }

    /// Classes whose color table can be written by clients.
    #[inline]
    pub fn is_writable(self) -> bool {
        matches!(
            self,
            VisualClass::PseudoColor | VisualClass::GrayScale | VisualClass::DirectColor
        )
    }
}

impl fmt::Display for VisualClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Byte order of multi-byte pixels in surface memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    LsbFirst,
    MsbFirst,
}

impl ByteOrder {
    /// Byte order of the machine we are running on.
    pub const fn host() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::MsbFirst
        } else {
            ByteOrder::LsbFirst
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ByteOrder::LsbFirst => "lsb",
            ByteOrder::MsbFirst => "msb",
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::host()
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One channel of a true-color pixel: mask, shift and precision in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelMask {
    pub mask: u32,
    pub shift: u8,
    pub prec: u8,
}

impl ChannelMask {
    /// Derive shift and precision from a contiguous bit mask.
    pub const fn new(mask: u32) -> Self {
        if mask == 0 {
            return Self {
                mask: 0,
                shift: 0,
                prec: 0,
            };
        }
        Self {
            mask,
            shift: mask.trailing_zeros() as u8,
            prec: mask.count_ones() as u8,
        }
    }

    /// Place an 8-bit channel value in this channel, keeping the top bits.
    #[inline]
    pub fn encode(self, value: u32) -> u32 {
        if self.prec == 0 {
            return 0;
        }
        truncate_channel(value, self.prec) << self.shift
    }

    /// Extract this channel from `pixel` and widen it to 8 bits by bit
    /// replication, so full intensity maps back to 255.
    pub fn decode(self, pixel: u32) -> u8 {
        if self.prec == 0 {
            return 0;
        }
        let value = (pixel & self.mask) >> self.shift;
        let prec = self.prec as i32;
        if prec >= 8 {
            return (value >> (prec - 8)) as u8;
        }
        let mut out = 0u32;
        let mut shift = 8 - prec;
        while shift > -prec {
            out |= if shift >= 0 {
                value << shift
            } else {
                value >> -shift
            };
            shift -= prec;
        }
        (out & 0xff) as u8
    }
}

/// Identifier of a visual, unique per display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualId(pub u32);

impl fmt::Display for VisualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Immutable description of a display format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visual {
    pub id: VisualId,
    pub class: VisualClass,
    pub depth: u8,
    pub byte_order: ByteOrder,
    pub red: ChannelMask,
    pub green: ChannelMask,
    pub blue: ChannelMask,
}

impl Visual {
    /// Visual with no channel masks, in host byte order.
    pub fn new(id: u32, class: VisualClass, depth: u8) -> Self {
        Self {
            id: VisualId(id),
            class,
            depth,
            byte_order: ByteOrder::host(),
            red: ChannelMask::default(),
            green: ChannelMask::default(),
            blue: ChannelMask::default(),
        }
    }

    #[inline]
    pub fn with_masks(mut self, red: u32, green: u32, blue: u32) -> Self {
        self.red = ChannelMask::new(red);
        self.green = ChannelMask::new(green);
        self.blue = ChannelMask::new(blue);
        self
    }

    #[inline]
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn masks(&self) -> (u32, u32, u32) {
        (self.red.mask, self.green.mask, self.blue.mask)
    }

    /// Number of color table cells a colormapped visual exposes.
    pub fn colormap_size(&self) -> usize {
        if self.class.is_truecolor() {
            0
        } else {
            1usize << self.depth.min(8)
        }
    }

    /// Pack 8-bit channels with this visual's masks.
    #[inline]
    pub fn encode_rgb(&self, r: u32, g: u32, b: u32) -> u32 {
        self.red.encode(r) | self.green.encode(g) | self.blue.encode(b)
    }

    /// Inverse of [`encode_rgb`](Self::encode_rgb), widening with bit replication.
    pub fn decode_rgb(&self, pixel: u32) -> [u8; 3] {
        [
            self.red.decode(pixel),
            self.green.decode(pixel),
            self.blue.decode(pixel),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_mask_565() {
        let red = ChannelMask::new(0xf800);
        let green = ChannelMask::new(0x07e0);
        let blue = ChannelMask::new(0x001f);
        assert_eq!((red.shift, red.prec), (11, 5));
        assert_eq!((green.shift, green.prec), (5, 6));
        assert_eq!((blue.shift, blue.prec), (0, 5));
    }

    #[test]
    fn test_empty_mask() {
        let mask = ChannelMask::new(0);
        assert_eq!(mask.prec, 0);
        assert_eq!(mask.encode(255), 0);
        assert_eq!(mask.decode(0xffff_ffff), 0);
    }

    #[test]
    fn test_decode_replicates_bits() {
        let red = ChannelMask::new(0xf800);
        assert_eq!(red.decode(0xf800), 255);
        assert_eq!(red.decode(0x8000), 132, "10000 replicates to 10000100");
        assert_eq!(red.decode(0), 0);

        let one_bit = ChannelMask::new(0x4);
        assert_eq!(one_bit.decode(0x4), 255);
    }

    #[test]
    fn test_encode_rgb_888() {
        let visual = Visual::new(1, VisualClass::TrueColor, 24).with_masks(0xff0000, 0xff00, 0xff);
        assert_eq!(visual.encode_rgb(0x12, 0x34, 0x56), 0x123456);
        assert_eq!(visual.decode_rgb(0x123456), [0x12, 0x34, 0x56]);
    }

    #[test]
    fn test_class_names() {
        let names: Vec<_> = VisualClass::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(
            names,
            [
                "static gray",
                "grayscale",
                "static color",
                "pseudo color",
                "true color",
                "direct color"
            ]
        );
    }

    #[test]
    fn test_colormap_size() {
        assert_eq!(Visual::new(1, VisualClass::PseudoColor, 8).colormap_size(), 256);
        assert_eq!(Visual::new(2, VisualClass::StaticColor, 4).colormap_size(), 16);
        assert_eq!(Visual::new(3, VisualClass::TrueColor, 24).colormap_size(), 0);
    }
}
