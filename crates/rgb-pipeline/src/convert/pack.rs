//! Byte order primitives for multi-byte pixels.
//!
//! Routines are generic over [`PixelOrder`] so the byte order is fixed at
//! selection time and the inner loops never branch on it.

use crate::visual::{ByteOrder, ChannelMask};

/// Stores a pixel value into its bytes in one fixed byte order.
pub trait PixelOrder {
    const ORDER: ByteOrder;

    /// Write the low `out.len()` bytes of `value`.
    fn store(out: &mut [u8], value: u32);
}

/// Least significant byte first.
pub struct Lsb;

/// Most significant byte first.
pub struct Msb;

impl PixelOrder for Lsb {
    const ORDER: ByteOrder = ByteOrder::LsbFirst;

    #[inline]
    fn store(out: &mut [u8], value: u32) {
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = (value >> (8 * i)) as u8;
        }
    }
}

impl PixelOrder for Msb {
    const ORDER: ByteOrder = ByteOrder::MsbFirst;

    #[inline]
    fn store(out: &mut [u8], value: u32) {
        let last = out.len().saturating_sub(1);
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = (value >> (8 * (last - i))) as u8;
        }
    }
}

/// Place an already reduced channel value (`mask.prec` bits wide) into
/// its position in the pixel.
#[inline]
pub fn pack_channel(bits: u32, mask: ChannelMask) -> u32 {
    if mask.prec == 0 {
        0
    } else {
        bits << mask.shift
    }
}

/// Call a routine generic over [`PixelOrder`] with the type matching a
/// runtime [`ByteOrder`].
macro_rules! by_order {
    ($order:expr, $func:ident ( $($arg:expr),* $(,)? )) => {
        match $order {
            $crate::visual::ByteOrder::LsbFirst => $func::<$crate::convert::pack::Lsb>($($arg),*),
            $crate::visual::ByteOrder::MsbFirst => $func::<$crate::convert::pack::Msb>($($arg),*),
        }
    };
}

pub(crate) use by_order;
