//! Numeric conversion functions (strtoul, strtoq, strtouq).
//!
//! All three share one accumulator: skip whitespace, take an optional sign,
//! resolve the base (`0x` prefix, leading-`0` octal), then fold digits while
//! comparing against a precomputed cutoff/cutlim pair so that overflow is seen
//! before it can happen. Overflow saturates; digits after the overflow point
//! are still consumed.
//!
//! Input is treated as NUL-terminated: reading stops at the first NUL byte or
//! at the end of the slice, whichever comes first. Each function returns
//! `(value, end)` where `end` is the offset one past the last consumed byte,
//! or `0` when no digits were found.

use crate::ctype::{digit_value, is_space};

/// Sign, magnitude and end offset of a scanned number.
struct Accumulated {
    magnitude: u64,
    negative: bool,
    overflow: bool,
    end: usize,
}

#[inline]
fn byte_at(s: &[u8], i: usize) -> u8 {
    s.get(i).copied().unwrap_or(0)
}

/// Shared scanning loop. `limit(negative)` is the largest magnitude the
/// caller's result type can hold for that sign.
fn accumulate(s: &[u8], base: u32, limit: impl Fn(bool) -> u64) -> Accumulated {
    let nothing = Accumulated {
        magnitude: 0,
        negative: false,
        overflow: false,
        end: 0,
    };
    if base == 1 || base > 36 {
        return nothing;
    }

    let mut i = 0;
    while is_space(byte_at(s, i)) {
        i += 1;
    }

    let mut negative = false;
    match byte_at(s, i) {
        b'-' => {
            negative = true;
            i += 1;
        }
        b'+' => i += 1,
        _ => {}
    }

    let mut base = base;
    if (base == 0 || base == 16)
        && byte_at(s, i) == b'0'
        && matches!(byte_at(s, i + 1), b'x' | b'X')
    {
        i += 2;
        base = 16;
    }
    if base == 0 {
        base = if byte_at(s, i) == b'0' { 8 } else { 10 };
    }

    let qbase = u64::from(base);
    let max = limit(negative);
    let cutoff = max / qbase;
    let cutlim = max % qbase;

    let mut acc = 0_u64;
    let mut any = false;
    let mut overflow = false;
    while let Some(digit) = digit_value(byte_at(s, i)) {
        let digit = u64::from(digit);
        if digit >= qbase {
            break;
        }
        if overflow || acc > cutoff || (acc == cutoff && digit > cutlim) {
            overflow = true;
        } else {
            acc = acc * qbase + digit;
        }
        any = true;
        i += 1;
    }

    if !any {
        return nothing;
    }
    Accumulated {
        magnitude: acc,
        negative,
        overflow,
        end: i,
    }
}

/// Convert to an unsigned machine word.
///
/// A leading `-` negates through wraparound, as C's `strtoul` does. Overflow
/// yields `usize::MAX` regardless of sign.
pub fn strtoul(s: &[u8], base: u32) -> (usize, usize) {
    let r = accumulate(s, base, |_| usize::MAX as u64);
    let value = if r.overflow {
        usize::MAX
    } else if r.negative {
        (r.magnitude as usize).wrapping_neg()
    } else {
        r.magnitude as usize
    };
    (value, r.end)
}

/// Convert to a signed 64-bit ("quad") integer, clamping to
/// `i64::MIN`/`i64::MAX` on overflow.
pub fn strtoq(s: &[u8], base: u32) -> (i64, usize) {
    // The negative limit is MIN's own magnitude, never -MAX.
    let r = accumulate(s, base, |negative| {
        if negative {
            i64::MIN.unsigned_abs()
        } else {
            i64::MAX as u64
        }
    });
    let value = if r.overflow {
        if r.negative { i64::MIN } else { i64::MAX }
    } else if r.negative {
        (r.magnitude as i64).wrapping_neg()
    } else {
        r.magnitude as i64
    };
    (value, r.end)
}

/// Convert to an unsigned 64-bit integer. Same sign rules as [`strtoul`].
pub fn strtouq(s: &[u8], base: u32) -> (u64, usize) {
    let r = accumulate(s, base, |_| u64::MAX);
    let value = if r.overflow {
        u64::MAX
    } else if r.negative {
        r.magnitude.wrapping_neg()
    } else {
        r.magnitude
    };
    (value, r.end)
}
