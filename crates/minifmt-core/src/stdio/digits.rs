//! Arbitrary-base digit encoder.
//!
//! [`ksprintn`] renders a magnitude into a scratch buffer back to front:
//! `nbuf[0]` holds the NUL terminator and `nbuf[1..=len]` the digits, least
//! significant first. Walking the buffer from `nbuf[len]` down to the
//! terminator yields the number in reading order, which is exactly how the
//! formatter emits it.

use crate::ctype::to_upper;

/// 64 base-2 digits plus the terminator.
pub const MAXNBUF: usize = 65;

const HEX2ASCII: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Render `num` in `base` (2..=36) into `nbuf`, reversed, and return the
/// digit count. Zero renders as a single `0`.
pub fn ksprintn(nbuf: &mut [u8; MAXNBUF], mut num: u64, base: u32, upper: bool) -> usize {
    debug_assert!((2..=36).contains(&base), "base {base} out of range");
    let base = u64::from(base);
    nbuf[0] = 0;
    let mut len = 0;
    loop {
        let c = HEX2ASCII[(num % base) as usize];
        len += 1;
        nbuf[len] = if upper { to_upper(c) } else { c };
        num /= base;
        if num == 0 {
            break;
        }
    }
    len
}

/// The digits written by [`ksprintn`], most significant first.
pub fn digits_forward(nbuf: &[u8; MAXNBUF], len: usize) -> impl Iterator<Item = u8> + '_ {
    nbuf[1..=len].iter().rev().copied()
}
