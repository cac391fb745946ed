//! Visual descriptors and visual selection.
//!
//! A [`Visual`] describes the native pixel encoding of a display surface:
//! its class, bit depth, channel masks and byte order. The display layer
//! supplies the list; [`choose_visual`] picks the one that renders best.

mod descriptor;
mod score;

pub use descriptor::{ByteOrder, ChannelMask, Visual, VisualClass, VisualId};
pub use score::{choose_visual, quality, score_visual};
