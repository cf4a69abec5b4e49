//! printf formatting engine.
//!
//! Interprets a byte format string against a slice of [`FormatArg`]s and
//! streams the result through a [`Sink`]. Integers, characters, strings,
//! pointers and `%n` are supported; there is no floating point and no
//! locale. The return value is always the full logical length, whatever the
//! sink actually kept.
//!
//! Behaviour worth knowing before reading the code:
//!
//! - `+` never prints a plus sign. Its only effect is to make `%r` signed.
//! - `%y` is signed hexadecimal, `%r` is decimal in the sign selected by `+`.
//! - `#` adds `0` (octal) or `0x` (hex, also for `%X`) only to nonzero values.
//! - `%c` ignores width; `%s` pads with `0` when the `0` flag is present.
//! - An unknown conversion is echoed verbatim and every later `%` becomes
//!   ordinary text.

use super::args::{Cursor, FormatArg};
use super::digits::{MAXNBUF, digits_forward, ksprintn};
use super::length::LengthFlags;
use super::sink::{BoundedBuf, Sink};
use crate::error::FormatError;

// ---------------------------------------------------------------------------
// Directive state
// ---------------------------------------------------------------------------

/// Flags collected while scanning one directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FormatFlags {
    left_justify: bool, // '-', toggled by a negative '*' width
    alt_form: bool,     // '#'
    plus: bool,         // '+'
    zero_pad: bool,     // '0' before any '.'
    dot: bool,          // '.' seen
}

/// One directive after its conversion byte has been read.
#[derive(Debug, Clone, Copy, Default)]
struct Directive {
    flags: FormatFlags,
    width: i64,
    /// Precision. Negative values come only from `.*` and act like zero for
    /// strings and like "no minimum" for integers.
    precision: i64,
    length: LengthFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Percent,
    Char,
    Signed { base: u32 },
    Unsigned { base: u32, upper: bool },
    Pointer,
    Str,
    Count,
    /// Unknown conversion byte, or the format ended mid-directive.
    Invalid,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

#[inline]
fn byte_at(fmt: &[u8], i: usize) -> u8 {
    fmt.get(i).copied().unwrap_or(0)
}

/// Read modifiers starting just after a `%` until a conversion byte decides
/// the directive. `pos` is left just past that byte, or on the terminator
/// when the format runs out. `*` operands are taken from `args` here.
fn parse_directive(
    fmt: &[u8],
    pos: &mut usize,
    d: &mut Directive,
    args: &mut Cursor<'_, FormatArg<'_>>,
) -> Result<Conversion, FormatError> {
    loop {
        let ch = byte_at(fmt, *pos);
        if ch == 0 {
            return Ok(Conversion::Invalid);
        }
        *pos += 1;
        match ch {
            b'.' => d.flags.dot = true,
            b'#' => d.flags.alt_form = true,
            b'+' => d.flags.plus = true,
            b'-' => d.flags.left_justify = true,
            b'%' => return Ok(Conversion::Percent),
            b'*' => {
                let n = i64::from(args.next_int()?);
                if d.flags.dot {
                    d.precision = n;
                } else if n < 0 {
                    d.flags.left_justify = !d.flags.left_justify;
                    d.width = -n;
                } else {
                    d.width = n;
                }
            }
            b'0' if !d.flags.dot => d.flags.zero_pad = true,
            b'0'..=b'9' => {
                let mut n = i64::from(ch - b'0');
                while let c @ b'0'..=b'9' = byte_at(fmt, *pos) {
                    n = n.saturating_mul(10).saturating_add(i64::from(c - b'0'));
                    *pos += 1;
                }
                if d.flags.dot {
                    d.precision = n;
                } else {
                    d.width = n;
                }
            }
            b'h' => d.length.toggle_h(),
            b'l' => d.length.toggle_l(),
            b'q' => d.length.q = true,
            b'j' => d.length.j = true,
            b't' => d.length.t = true,
            b'z' => d.length.z = true,
            b'c' => return Ok(Conversion::Char),
            b'd' | b'i' => return Ok(Conversion::Signed { base: 10 }),
            b'y' => return Ok(Conversion::Signed { base: 16 }),
            b'r' if d.flags.plus => return Ok(Conversion::Signed { base: 10 }),
            b'r' | b'u' => return Ok(Conversion::Unsigned { base: 10, upper: false }),
            b'o' => return Ok(Conversion::Unsigned { base: 8, upper: false }),
            b'x' => return Ok(Conversion::Unsigned { base: 16, upper: false }),
            b'X' => return Ok(Conversion::Unsigned { base: 16, upper: true }),
            b'p' => return Ok(Conversion::Pointer),
            b's' => return Ok(Conversion::Str),
            b'n' => return Ok(Conversion::Count),
            _ => return Ok(Conversion::Invalid),
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

struct Formatter<'k, S: ?Sized> {
    sink: &'k mut S,
    produced: usize,
}

impl<'k, S: Sink + ?Sized> Formatter<'k, S> {
    #[inline]
    fn pchar(&mut self, c: u8) {
        self.sink.put(c);
        self.produced = self.produced.saturating_add(1);
    }

    /// Emit `count` copies of `c`. Bytes the sink has no room for are only
    /// counted.
    fn pad(&mut self, c: u8, count: i64) {
        if count <= 0 {
            return;
        }
        let count = usize::try_from(count).unwrap_or(usize::MAX);
        let stored = self.sink.room().map_or(count, |room| room.min(count));
        for _ in 0..stored {
            self.sink.put(c);
        }
        self.produced = self.produced.saturating_add(count);
    }

    fn run(&mut self, fmt: &[u8], args: &mut Cursor<'_, FormatArg<'_>>) -> Result<(), FormatError> {
        let mut pos = 0;
        let mut stop = false;
        loop {
            // Literal run up to the next live '%'.
            loop {
                let ch = byte_at(fmt, pos);
                if ch == 0 {
                    return Ok(());
                }
                pos += 1;
                if ch == b'%' && !stop {
                    break;
                }
                self.pchar(ch);
            }
            let percent = pos - 1;

            let mut d = Directive::default();
            match parse_directive(fmt, &mut pos, &mut d, args)? {
                Conversion::Percent => self.pchar(b'%'),
                Conversion::Char => {
                    let c = args.next_int()? as u8;
                    self.pchar(c);
                }
                Conversion::Count => {
                    let slot = args.next_count()?;
                    *slot = d.length.for_count().sign_extend(self.produced as u64) as i64;
                }
                Conversion::Str => {
                    let s = args.next_str()?;
                    self.string(s, &d);
                }
                Conversion::Pointer => {
                    let num = args.next_bits()?;
                    d.flags.alt_form = d.width == 0;
                    self.number(num, 16, false, false, &d);
                }
                Conversion::Signed { base } => {
                    let num = d.length.for_operand().sign_extend(args.next_bits()?);
                    self.number(num, base, false, true, &d);
                }
                Conversion::Unsigned { base, upper } => {
                    let num = d.length.for_operand().zero_extend(args.next_bits()?);
                    self.number(num, base, upper, false, &d);
                }
                Conversion::Invalid => {
                    for &b in &fmt[percent..pos] {
                        self.pchar(b);
                    }
                    stop = true;
                }
            }
        }
    }

    fn string(&mut self, s: Option<&[u8]>, d: &Directive) {
        let s = s.unwrap_or(b"(null)");
        let s = &s[..s.iter().position(|&b| b == 0).unwrap_or(s.len())];
        let n = if d.flags.dot {
            usize::try_from(d.precision).unwrap_or(0).min(s.len())
        } else {
            s.len()
        };
        let padc = if d.flags.zero_pad { b'0' } else { b' ' };
        let width = d.width.saturating_sub(n as i64);

        if !d.flags.left_justify {
            self.pad(padc, width);
        }
        for &b in &s[..n] {
            self.pchar(b);
        }
        if d.flags.left_justify {
            self.pad(padc, width);
        }
    }

    /// Lay out `[spaces][-][prefix][zeros]digits[spaces]`.
    fn number(&mut self, mut num: u64, base: u32, upper: bool, signed: bool, d: &Directive) {
        let neg = signed && (num as i64) < 0;
        if neg {
            num = (num as i64).wrapping_neg() as u64;
        }

        let mut nbuf = [0u8; MAXNBUF];
        let len = ksprintn(&mut nbuf, num, base, upper);
        let n = len as i64;

        let prefix: &[u8] = match base {
            8 if d.flags.alt_form && num != 0 => b"0",
            16 if d.flags.alt_form && num != 0 => b"0x",
            _ => b"",
        };
        let tmp = prefix.len() as i64 + i64::from(neg);

        let mut width = d.width;
        let mut zeros = d.precision;
        if !d.flags.left_justify && d.flags.zero_pad {
            zeros = width.saturating_sub(tmp);
        }
        width = width.saturating_sub(tmp.saturating_add(zeros.max(n)));
        zeros = zeros.saturating_sub(n);

        if !d.flags.left_justify {
            self.pad(b' ', width);
        }
        if neg {
            self.pchar(b'-');
        }
        for &b in prefix {
            self.pchar(b);
        }
        self.pad(b'0', zeros);
        for b in digits_forward(&nbuf, len) {
            self.pchar(b);
        }
        if d.flags.left_justify {
            self.pad(b' ', width);
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Format into any sink. Returns the number of bytes the output would have
/// without truncation.
///
/// The sink is finished even when an argument error cuts formatting short, so
/// a [`BoundedBuf`] always ends up terminated.
pub fn sprintf<S: Sink + ?Sized>(
    out: &mut S,
    fmt: &[u8],
    args: &mut [FormatArg<'_>],
) -> Result<usize, FormatError> {
    let mut f = Formatter {
        sink: &mut *out,
        produced: 0,
    };
    let result = f.run(fmt, &mut Cursor::new(args));
    let produced = f.produced;
    out.finish();
    result.map(|()| produced)
}

/// Bounded formatting into `dst`.
///
/// At most `dst.len() - 1` bytes are stored and followed by a NUL; an empty
/// `dst` is never written. The return value is the untruncated length, so
/// `result >= dst.len()` means the output was cut.
pub fn snprintf(dst: &mut [u8], fmt: &[u8], args: &mut [FormatArg<'_>]) -> Result<usize, FormatError> {
    sprintf(&mut BoundedBuf::new(dst), fmt, args)
}
