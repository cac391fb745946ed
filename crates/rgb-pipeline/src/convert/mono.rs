use super::{Align, Source, Target};
use crate::dither::{dither_row, threshold};

/// 1-bit output, MSB first, bit set for light pixels. A partial last byte
/// is left-justified.
pub(super) fn convert_mono(target: &mut Target<'_>, source: &Source<'_>, align: Align) {
    let x0 = (target.x >> 3) as usize;
    let width = source.width as usize;
    for y in 0..source.height {
        let row = dither_row(align.row(y));
        let src = source.row(y, 3);
        let out = target.row_mut(y, x0, width.div_ceil(8));
        for (i, (chunk, dst)) in src.chunks(24).zip(out.iter_mut()).enumerate() {
            let mut byte = 0u8;
            let mut bits = 0;
            for (j, px) in chunk.chunks_exact(3).enumerate() {
                let x = (i * 8 + j) as u32;
                let dith = (threshold(row, align.col(x)) << 4) | 4;
                let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
                byte = (byte << 1) | (r + g + g + b + dith > 1020) as u8;
                bits += 1;
            }
            *dst = byte << (8 - bits);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_and_white() {
        let mut src = vec![255u8; 8 * 3];
        src.extend_from_slice(&[0u8; 8 * 3]);
        let mut out = vec![0x55u8; 2];
        let mut target = Target {
            data: &mut out,
            bytes_per_line: 2,
            x: 0,
            y: 0,
        };
        convert_mono(&mut target, &Source::new(&src, 48, 16, 1), Align::default());
        assert_eq!(out, vec![0xff, 0x00]);
    }

    #[test]
    fn test_partial_byte_left_justified() {
        let src = [255u8; 3 * 3];
        let mut out = vec![0u8; 1];
        let mut target = Target {
            data: &mut out,
            bytes_per_line: 1,
            x: 0,
            y: 0,
        };
        convert_mono(&mut target, &Source::new(&src, 9, 3, 1), Align::default());
        assert_eq!(out, vec![0b1110_0000]);
    }

    #[test]
    fn test_mid_gray_mixes() {
        let src = [128u8; 8 * 3 * 8];
        let mut out = vec![0u8; 8];
        let mut target = Target {
            data: &mut out,
            bytes_per_line: 1,
            x: 0,
            y: 0,
        };
        convert_mono(&mut target, &Source::new(&src, 24, 8, 8), Align::default());
        let ones: u32 = out.iter().map(|b| b.count_ones()).sum();
        assert!(ones > 0 && ones < 64, "mid gray must give a pattern, got {ones} set bits");
    }
}
