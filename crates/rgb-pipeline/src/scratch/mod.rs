//! Scratch surfaces for batched conversion.
//!
//! Draw requests are converted into small regions of a few reusable
//! surfaces and blitted from there. [`RegionPacker`] decides where each
//! request goes; [`ScratchPool`] owns the surfaces and flushes the display
//! when every region has been used.

mod packer;
mod pool;

pub use packer::{Placement, RegionPacker};
pub use pool::{ScratchPool, ScratchRegion};

pub const REGION_WIDTH: u32 = 256;
pub const REGION_HEIGHT: u32 = 64;
pub const N_REGIONS: usize = 6;

/// Surface counts to try, fewest first. Each divides [`N_REGIONS`].
pub const IMAGE_COUNTS: [usize; 4] = [1, 2, 3, 6];
