//! Visual scoring.
//!
//! A score packs four criteria into one integer, most significant first:
//!
//! ```text
//! 0xQS_DP
//!   Q  quality: 9 = 24-bit true color ... 1 = 1 bpp, 0 = unusable
//!   S  speed: always 1
//!   D  1 when the visual is the display default
//!   P  1 for pseudo color and true color classes
//! ```
//!
//! Comparing scores as integers therefore orders by quality first and uses
//! the remaining fields as tie breakers.

use super::{Visual, VisualClass, VisualId};
use crate::error::RgbError;

/// Quality rank of a class/depth combination; 0 means unusable.
pub fn quality(class: VisualClass, depth: u8) -> u32 {
    use VisualClass::*;

    match (class, depth) {
        (TrueColor | DirectColor, 24) => 9,
        (TrueColor | DirectColor, 16) => 8,
        (TrueColor | DirectColor, 15) => 7,
        (_, 8) => 4,
        (PseudoColor | StaticColor | StaticGray | GrayScale, 4) => 2,
        (PseudoColor | StaticColor | StaticGray | GrayScale, 1) => 1,
        _ => 0,
    }
}

pub fn score_visual(visual: &Visual, default_visual: VisualId) -> u32 {
    let quality = quality(visual.class, visual.depth);
    if quality == 0 {
        return 0;
    }
    let speed = 1;
    let system = u32::from(visual.id == default_visual);
    let preferred = u32::from(matches!(
        visual.class,
        VisualClass::PseudoColor | VisualClass::TrueColor
    ));
    (quality << 12) | (speed << 8) | (system << 4) | preferred
}

/// Pick the highest scoring visual; the first of equal scores wins.
pub fn choose_visual(
    visuals: &[Visual],
    default_visual: VisualId,
) -> Result<(Visual, u32), RgbError> {
    let mut best: Option<(Visual, u32)> = None;
    for visual in visuals {
        let score = score_visual(visual, default_visual);
        tracing::trace!(visual = %visual.id, class = %visual.class, depth = visual.depth, score, "Scored visual");
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((*visual, score)),
        }
    }
    match best {
        Some((visual, score)) if score > 0 => Ok((visual, score)),
        _ => Err(RgbError::NoVisuals),
    }
}
