//! Character classification and conversion.
//!
//! The handful of `<ctype.h>` predicates the formatting engines lean on.
//! C locale only.

/// Returns `true` if `c` is a 7-bit ASCII byte.
#[inline]
pub fn is_ascii(c: u8) -> bool {
    c < 0x80
}

/// Returns `true` if `c` is an alphabetic character (`[A-Za-z]`).
#[inline]
pub fn is_alpha(c: u8) -> bool {
    c.is_ascii_alphabetic()
}

/// Returns `true` if `c` is a decimal digit (`[0-9]`).
#[inline]
pub fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

/// Returns `true` if `c` is a whitespace character.
///
/// Whitespace: space, tab, newline, vertical tab, form feed, carriage return.
#[inline]
pub fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

/// Returns `true` if `c` is an uppercase letter (`[A-Z]`).
#[inline]
pub fn is_upper(c: u8) -> bool {
    c.is_ascii_uppercase()
}

/// Converts `c` to uppercase if it is a lowercase letter.
#[inline]
pub fn to_upper(c: u8) -> u8 {
    if c.is_ascii_lowercase() { c - 32 } else { c }
}

/// Value of `c` as a digit in bases up to 36, if it is one.
#[inline]
pub fn digit_value(c: u8) -> Option<u8> {
    if !is_ascii(c) {
        None
    } else if is_digit(c) {
        Some(c - b'0')
    } else if is_alpha(c) {
        Some(if is_upper(c) { c - b'A' + 10 } else { c - b'a' + 10 })
    } else {
        None
    }
}
