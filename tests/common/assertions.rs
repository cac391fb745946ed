//! Assertion helpers for tests.

use pretty_assertions::assert_eq;

use rgbsim::rendering::RgbImage;

/// Assert two images have the same size
pub fn assert_same_size(actual: &RgbImage, expected: &RgbImage) {
    assert_eq!(
        (actual.width, actual.height),
        (expected.width, expected.height),
        "Image size mismatch"
    );
}

/// Assert every channel of every pixel is within `tolerance` of the
/// expected image
pub fn assert_close(actual: &RgbImage, expected: &RgbImage, tolerance: u8) {
    assert_same_size(actual, expected);
    for y in 0..expected.height {
        for x in 0..expected.width {
            let (a, e) = (actual.pixel(x, y), expected.pixel(x, y));
            let worst = a
                .iter()
                .zip(e.iter())
                .map(|(a, e)| a.abs_diff(*e))
                .max()
                .unwrap_or(0);
            assert!(
                worst <= tolerance,
                "Pixel ({x}, {y}) is {a:?}, expected {e:?} within {tolerance}"
            );
        }
    }
}

/// Assert every pixel has equal red, green and blue
pub fn assert_gray(image: &RgbImage) {
    for (i, px) in image.pixels.chunks_exact(3).enumerate() {
        assert!(
            px[0] == px[1] && px[1] == px[2],
            "Pixel {i} is {px:?}, expected a gray"
        );
    }
}

/// Assert bytes start with the PNG signature
pub fn assert_png_bytes(bytes: &[u8]) {
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "Expected PNG data, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Number of distinct colors in an image
pub fn distinct_colors(image: &RgbImage) -> usize {
    let mut colors: Vec<[u8; 3]> = image
        .pixels
        .chunks_exact(3)
        .map(|px| [px[0], px[1], px[2]])
        .collect();
    colors.sort_unstable();
    colors.dedup();
    colors.len()
}
