//! Rendering images through every built-in display.

mod common;

use common::{fixtures, fixtures::presets};
use pretty_assertions::assert_eq;
use rgb_pipeline::DitherMode;
use rgbsim::models::DisplayPreset;
use rgbsim::rendering::SourceFormat;
use rgbsim::services::RenderRequest;

fn undithered() -> RenderRequest {
    RenderRequest::default().dither(DitherMode::Off)
}

#[test]
fn test_every_preset_renders_gradient() {
    let image = fixtures::gradient(40, 24);
    for preset in DisplayPreset::ALL {
        let mut sim = fixtures::simulator(preset);
        let output = sim
            .render(&image, RenderRequest::default())
            .unwrap_or_else(|e| panic!("{preset} should render: {e}"));
        common::assert_same_size(&output.image, &image);
        assert!(!output.summary.conversion.is_empty(), "{preset} names its conversion");
        assert_eq!(output.summary.blits, 1, "{preset}: one tile for a small image");
    }
}

#[test]
fn test_lossless_presets_reproduce_input() {
    let image = fixtures::gradient(33, 17);
    for preset in presets::LOSSLESS {
        let mut sim = fixtures::simulator(preset);
        let output = sim.render(&image, undithered()).unwrap();
        assert_eq!(output.image, image, "{preset} should be lossless");
    }
}

#[test]
fn test_lossless_presets_accept_every_source_layout() {
    let image = fixtures::primaries();
    for preset in presets::LOSSLESS {
        for source in [SourceFormat::Rgb, SourceFormat::Rgb32, SourceFormat::Indexed] {
            let mut sim = fixtures::simulator(preset);
            let output = sim.render(&image, undithered().source(source)).unwrap();
            assert_eq!(output.image, image, "{preset} with {} source", source.name());
        }
    }
}

#[test]
fn test_gray_source_stays_gray_on_color_display() {
    let mut sim = fixtures::simulator(DisplayPreset::Xrgb32);
    let output = sim
        .render(&fixtures::gradient(16, 8), undithered().source(SourceFormat::Gray))
        .unwrap();
    common::assert_gray(&output.image);
}

#[test]
fn test_16bit_presets_keep_primaries() {
    let image = fixtures::primaries();
    for preset in [
        DisplayPreset::Rgb565,
        DisplayPreset::Rgb565Swapped,
        DisplayPreset::Rgb555,
        DisplayPreset::TrueColor12,
    ] {
        let mut sim = fixtures::simulator(preset);
        let output = sim.render(&image, undithered()).unwrap();
        assert_eq!(output.image, image, "{preset} reproduces full-intensity channels");
    }
}

#[test]
fn test_565_gradient_error_is_bounded() {
    let image = fixtures::gradient(64, 64);
    let mut sim = fixtures::simulator(DisplayPreset::Rgb565);
    let output = sim.render(&image, undithered()).unwrap();
    common::assert_close(&output.image, &image, 8);
}

#[test]
fn test_static_gray_presets() {
    let image = fixtures::gradient(20, 10);
    for preset in presets::STATIC_GRAY {
        let mut sim = fixtures::simulator(preset);
        let output = sim.render(&image, RenderRequest::default()).unwrap();
        common::assert_gray(&output.image);

        let black_white = fixtures::black_white();
        let output = sim.render(&black_white, undithered()).unwrap();
        assert_eq!(output.image, black_white, "{preset} keeps black and white");
    }
}

#[test]
fn test_mono_is_two_colors() {
    let mut sim = fixtures::simulator(DisplayPreset::Mono);
    let output = sim.render(&fixtures::gradient(32, 32), RenderRequest::default()).unwrap();
    assert_eq!(common::distinct_colors(&output.image), 2);
}

#[test]
fn test_pseudo8_primaries_undithered() {
    let image = fixtures::primaries();
    let mut sim = fixtures::simulator(DisplayPreset::Pseudo8);
    let output = sim.render(&image, undithered()).unwrap();
    common::assert_close(&output.image, &image, 2);
    assert!(!output.summary.dithered);
}

#[test]
fn test_pseudo8_dithers_by_default() {
    let image = fixtures::solid(16, 16, [0x60, 0x60, 0x60]);
    let mut sim = fixtures::simulator(DisplayPreset::Pseudo8);

    let dithered = sim.render(&image, RenderRequest::default()).unwrap();
    assert!(dithered.summary.dithered, "auto dithers on a pseudo color cube");
    assert!(
        common::distinct_colors(&dithered.image) >= 2,
        "mid gray between cube levels should mix two cells"
    );

    let flat = sim.render(&image, undithered()).unwrap();
    assert_eq!(common::distinct_colors(&flat.image), 1);
}

#[test]
fn test_pseudo8_limits_palette() {
    let mut sim = fixtures::simulator(DisplayPreset::Pseudo8);
    let output = sim.render(&fixtures::gradient(128, 128), RenderRequest::default()).unwrap();
    assert!(common::distinct_colors(&output.image) <= 256);
}

#[test]
fn test_color4_fits_in_sixteen_cells() {
    let mut sim = fixtures::simulator(DisplayPreset::Color4);
    let output = sim.render(&fixtures::gradient(48, 48), RenderRequest::default()).unwrap();
    assert!(common::distinct_colors(&output.image) <= 16);
}

#[test]
fn test_workstation_renders_through_truecolor() {
    let image = fixtures::gradient(10, 10);
    let mut sim = fixtures::simulator(DisplayPreset::Workstation);
    let output = sim.render(&image, undithered()).unwrap();
    assert_eq!(output.summary.depth, 24);
    assert_eq!(output.image, image);
}

#[test]
fn test_large_image_is_tiled() {
    let image = fixtures::gradient(300, 100);
    let mut sim = fixtures::simulator(DisplayPreset::Rgb888);
    let output = sim.render(&image, undithered()).unwrap();
    assert_eq!(output.summary.blits, 4, "300x100 splits into 2x2 tiles");
    assert_eq!(output.summary.flushes, 1);
    assert_eq!(output.image, image);
}

#[test]
fn test_render_at_origin_offsets_image() {
    let image = fixtures::solid(2, 2, [255, 255, 255]);
    let mut sim = fixtures::simulator(DisplayPreset::Xrgb32);
    let output = sim.render(&image, undithered().origin(3, 1)).unwrap();
    assert_eq!((output.image.width, output.image.height), (5, 3));
    assert_eq!(output.image.pixel(0, 0), [0, 0, 0]);
    assert_eq!(output.image.pixel(3, 1), [255, 255, 255]);
    assert_eq!(output.image.pixel(4, 2), [255, 255, 255]);
}

#[test]
fn test_indexed_source_rejects_too_many_colors() {
    let mut sim = fixtures::simulator(DisplayPreset::Rgb888);
    let result = sim.render(
        &fixtures::gradient(32, 32),
        undithered().source(SourceFormat::Indexed),
    );
    assert!(result.is_err(), "1024 distinct colors cannot be indexed");
}
