//! scanf input engine.
//!
//! Walks a format string against a fixed input and assigns parsed values
//! into [`ScanArg`] targets in directive order. The input is read up to its
//! first NUL (or the end of the slice).
//!
//! Two failure classes are kept apart. Running out of input before any
//! conversion directive was reached yields [`ScanOutcome::Eof`]; running out
//! later, or meeting input that does not fit the current directive, yields
//! the number of assignments made so far. `%n` counts as a reached
//! conversion even when suppressed, so `"%n%d"` against empty input reports
//! zero assignments rather than end-of-input.

use super::args::{Cursor, ScanArg, mismatch};
use super::length::LengthFlags;
use super::scanset::ScanSet;
use crate::ctype::is_space;
use crate::error::FormatError;
use crate::stdlib::{strtoq, strtouq};

/// Longest numeric field collected, plus room for a terminator.
const BUF: usize = 32;

/// Base after the first nonzero digit: `%i` (base 0) becomes decimal,
/// explicit bases stay as they are.
const BASEFIX: [u32; 17] = [10, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];

/// Result of a completed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Input ran out before any conversion was reached (C's `EOF`).
    Eof,
    /// Number of targets assigned.
    Assigned(usize),
}

impl ScanOutcome {
    /// The C return value: `-1` for [`ScanOutcome::Eof`], else the count.
    #[must_use]
    pub fn as_c_int(self) -> i32 {
        match self {
            Self::Eof => -1,
            Self::Assigned(n) => i32::try_from(n).unwrap_or(i32::MAX),
        }
    }

    /// Assignment count, treating end-of-input as zero.
    #[must_use]
    pub fn assigned(self) -> usize {
        match self {
            Self::Eof => 0,
            Self::Assigned(n) => n,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ScanFlags {
    suppress: bool,  // '*'
    pointer: bool,   // %p
    noskip: bool,    // %c and %[ keep leading whitespace
    prefix_ok: bool, // 0x accepted
    length: LengthFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanKind {
    Char,
    Class,
    Str,
    Int { base: u32, signed: bool },
}

/// What one `%...` turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parsed {
    Percent,
    Count,
    Convert(ScanKind),
    Unknown,
    /// Format ended inside the directive.
    End,
}

/// Why scanning stopped early.
#[derive(Debug)]
enum Halt {
    Input,
    Match,
    Format(FormatError),
}

impl From<FormatError> for Halt {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

#[inline]
fn byte_at(s: &[u8], i: usize) -> u8 {
    s.get(i).copied().unwrap_or(0)
}

fn parse_directive(
    fmt: &[u8],
    fpos: &mut usize,
    flags: &mut ScanFlags,
    width: &mut usize,
    ccl: &mut ScanSet,
) -> Result<Parsed, FormatError> {
    loop {
        let c = byte_at(fmt, *fpos);
        if c == 0 {
            return Ok(Parsed::End);
        }
        *fpos += 1;
        let kind = match c {
            b'%' => return Ok(Parsed::Percent),
            b'*' => {
                flags.suppress = true;
                continue;
            }
            b'h' => {
                flags.length.toggle_h();
                continue;
            }
            b'l' => {
                flags.length.toggle_l();
                continue;
            }
            b'q' | b'j' | b't' | b'z' => {
                flags.length.q = true;
                continue;
            }
            b'0'..=b'9' => {
                *width = width.saturating_mul(10).saturating_add(usize::from(c - b'0'));
                continue;
            }
            b'd' => ScanKind::Int { base: 10, signed: true },
            b'i' => ScanKind::Int { base: 0, signed: true },
            b'o' => ScanKind::Int { base: 8, signed: false },
            b'u' => ScanKind::Int { base: 10, signed: false },
            b'x' => {
                flags.prefix_ok = true;
                ScanKind::Int { base: 16, signed: false }
            }
            b'p' => {
                flags.pointer = true;
                flags.prefix_ok = true;
                ScanKind::Int { base: 16, signed: false }
            }
            b's' => ScanKind::Str,
            b'[' => {
                *fpos = ccl.compile(fmt, *fpos)?;
                flags.noskip = true;
                ScanKind::Class
            }
            b'c' => {
                flags.noskip = true;
                ScanKind::Char
            }
            b'n' => return Ok(Parsed::Count),
            _ => return Ok(Parsed::Unknown),
        };
        return Ok(Parsed::Convert(kind));
    }
}

impl<'s> Cursor<'s, ScanArg<'_>> {
    fn next_chars(&mut self) -> Result<&'s mut [u8], FormatError> {
        let (index, arg) = self.next()?;
        match arg {
            ScanArg::Chars(buf) => Ok(&mut **buf),
            other => Err(mismatch(index, "byte buffer", other.kind())),
        }
    }

    fn store_count(&mut self, nread: usize, length: LengthFlags) -> Result<(), FormatError> {
        let (index, arg) = self.next()?;
        let value = length.for_target().sign_extend(nread as u64) as i64;
        match arg {
            ScanArg::Count(slot) | ScanArg::Int(slot) => **slot = value,
            other => return Err(mismatch(index, "count slot", other.kind())),
        }
        Ok(())
    }

    fn store_int(&mut self, bits: u64, flags: &ScanFlags) -> Result<(), FormatError> {
        let (index, arg) = self.next()?;
        if flags.pointer {
            match arg {
                ScanArg::Ptr(p) => **p = bits as usize,
                ScanArg::Uint(u) => **u = bits,
                other => return Err(mismatch(index, "pointer", other.kind())),
            }
        } else {
            let length = flags.length.for_target();
            match arg {
                ScanArg::Int(v) => **v = length.sign_extend(bits) as i64,
                ScanArg::Uint(u) => **u = length.zero_extend(bits),
                other => return Err(mismatch(index, "integer", other.kind())),
            }
        }
        Ok(())
    }
}

/// Copy `text` into `dst` and NUL-terminate, truncating to fit.
fn store_text(dst: &mut [u8], text: &[u8]) {
    let Some(room) = dst.len().checked_sub(1) else {
        return;
    };
    let n = text.len().min(room);
    dst[..n].copy_from_slice(&text[..n]);
    dst[n] = 0;
}

struct Scanner<'i> {
    input: &'i [u8],
    pos: usize,
    nread: usize,
    nassigned: usize,
    nconversions: usize,
}

impl<'i> Scanner<'i> {
    fn new(input: &'i [u8]) -> Self {
        let end = input.iter().position(|&b| b == 0).unwrap_or(input.len());
        Self {
            input: &input[..end],
            pos: 0,
            nread: 0,
            nassigned: 0,
            nconversions: 0,
        }
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_space(&mut self) {
        while self.peek().is_some_and(is_space) {
            self.pos += 1;
            self.nread += 1;
        }
    }

    fn literal(&mut self, c: u8) -> Result<(), Halt> {
        match self.peek() {
            None => Err(Halt::Input),
            Some(b) if b != c => Err(Halt::Match),
            Some(_) => {
                self.pos += 1;
                self.nread += 1;
                Ok(())
            }
        }
    }

    /// Consume bytes while `accept` holds, up to `limit`. Returns the span.
    fn take_while(&mut self, limit: usize, accept: impl Fn(u8) -> bool) -> &'i [u8] {
        let input = self.input;
        let start = self.pos;
        while self.pos - start < limit && self.peek().is_some_and(&accept) {
            self.pos += 1;
        }
        &input[start..self.pos]
    }

    fn run(&mut self, fmt: &[u8], args: &mut Cursor<'_, ScanArg<'_>>) -> Result<(), Halt> {
        let mut ccl = ScanSet::new();
        let mut fpos = 0;
        loop {
            let c = byte_at(fmt, fpos);
            if c == 0 {
                return Ok(());
            }
            fpos += 1;
            if is_space(c) {
                self.skip_space();
                continue;
            }
            if c != b'%' {
                self.literal(c)?;
                continue;
            }

            let mut flags = ScanFlags::default();
            let mut width = 0;
            let kind = match parse_directive(fmt, &mut fpos, &mut flags, &mut width, &mut ccl)? {
                Parsed::Percent => {
                    self.literal(b'%')?;
                    continue;
                }
                Parsed::Count => {
                    self.nconversions += 1;
                    if !flags.suppress {
                        args.store_count(self.nread, flags.length)?;
                    }
                    continue;
                }
                Parsed::End => return Ok(()),
                // Still needs input and skips blanks, but converts nothing.
                Parsed::Unknown => None,
                Parsed::Convert(kind) => Some(kind),
            };

            if self.remaining() == 0 {
                return Err(Halt::Input);
            }
            if !flags.noskip {
                self.skip_space();
                if self.remaining() == 0 {
                    return Err(Halt::Input);
                }
            }

            let Some(kind) = kind else {
                continue;
            };
            match kind {
                ScanKind::Char => self.scan_chars(width, &flags, args)?,
                ScanKind::Class => self.scan_class(width, &ccl, &flags, args)?,
                ScanKind::Str => self.scan_string(width, &flags, args)?,
                ScanKind::Int { base, signed } => self.scan_int(width, base, signed, &flags, args)?,
            }
            self.nconversions += 1;
        }
    }

    fn scan_chars(
        &mut self,
        width: usize,
        flags: &ScanFlags,
        args: &mut Cursor<'_, ScanArg<'_>>,
    ) -> Result<(), Halt> {
        let width = if width == 0 { 1 } else { width };
        let taken = self.take_while(width, |_| true);
        self.nread += taken.len();
        if !flags.suppress {
            let dst = args.next_chars()?;
            let n = taken.len().min(dst.len());
            dst[..n].copy_from_slice(&taken[..n]);
            self.nassigned += 1;
        }
        Ok(())
    }

    fn scan_class(
        &mut self,
        width: usize,
        ccl: &ScanSet,
        flags: &ScanFlags,
        args: &mut Cursor<'_, ScanArg<'_>>,
    ) -> Result<(), Halt> {
        let width = if width == 0 { usize::MAX } else { width };
        let taken = self.take_while(width, |b| ccl.contains(b));
        if taken.is_empty() {
            return Err(Halt::Match);
        }
        if !flags.suppress {
            store_text(args.next_chars()?, taken);
            self.nassigned += 1;
        }
        self.nread += taken.len();
        Ok(())
    }

    fn scan_string(
        &mut self,
        width: usize,
        flags: &ScanFlags,
        args: &mut Cursor<'_, ScanArg<'_>>,
    ) -> Result<(), Halt> {
        let width = if width == 0 { usize::MAX } else { width };
        let taken = self.take_while(width, |b| !is_space(b));
        if !flags.suppress {
            store_text(args.next_chars()?, taken);
            self.nassigned += 1;
        }
        self.nread += taken.len();
        Ok(())
    }

    /// Collect the longest prefix that can still be a number, then decode it.
    fn scan_int(
        &mut self,
        width: usize,
        mut base: u32,
        signed: bool,
        flags: &ScanFlags,
        args: &mut Cursor<'_, ScanArg<'_>>,
    ) -> Result<(), Halt> {
        let width = if width == 0 || width > BUF - 1 { BUF - 1 } else { width };
        let mut buf = [0u8; BUF];
        let mut len = 0;

        let mut sign_ok = true;
        let mut no_digits = true;
        let mut no_zero = true;
        let mut prefix_ok = flags.prefix_ok;

        while len < width {
            let Some(c) = self.peek() else {
                break;
            };
            let accept = match c {
                b'0' => {
                    if base == 0 {
                        base = 8;
                        prefix_ok = true;
                    }
                    if no_zero {
                        no_zero = false;
                    } else {
                        prefix_ok = false;
                    }
                    sign_ok = false;
                    no_digits = false;
                    true
                }
                b'1'..=b'9' => {
                    base = BASEFIX[base as usize];
                    // 8 and 9 only count in decimal and hex.
                    let legal = c <= b'7' || base > 8;
                    if legal {
                        sign_ok = false;
                        prefix_ok = false;
                        no_digits = false;
                    }
                    legal
                }
                b'a'..=b'f' | b'A'..=b'F' => {
                    let legal = base > 10;
                    if legal {
                        sign_ok = false;
                        prefix_ok = false;
                        no_digits = false;
                    }
                    legal
                }
                b'+' | b'-' => core::mem::replace(&mut sign_ok, false),
                b'x' | b'X' if prefix_ok && len == 1 => {
                    base = 16;
                    prefix_ok = false;
                    true
                }
                _ => false,
            };
            if !accept {
                break;
            }
            buf[len] = c;
            len += 1;
            self.pos += 1;
        }

        if no_digits {
            // A lone sign (or sign and x) gives back its last byte.
            if len > 0 {
                self.pos -= 1;
            }
            return Err(Halt::Match);
        }
        if matches!(buf[len - 1], b'x' | b'X') {
            len -= 1;
            self.pos -= 1;
        }

        if !flags.suppress {
            let digits = &buf[..len];
            let bits = if signed {
                strtoq(digits, base).0 as u64
            } else {
                strtouq(digits, base).0
            };
            args.store_int(bits, flags)?;
            self.nassigned += 1;
        }
        self.nread += len;
        Ok(())
    }
}

/// Scan `input` according to `fmt`, assigning into `args` in order.
///
/// Argument contract violations are reported as soon as the offending
/// directive needs its target; assignments already made stay in place.
pub fn sscanf(input: &[u8], fmt: &[u8], args: &mut [ScanArg<'_>]) -> Result<ScanOutcome, FormatError> {
    let mut scanner = Scanner::new(input);
    match scanner.run(fmt, &mut Cursor::new(args)) {
        Ok(()) | Err(Halt::Match) => Ok(ScanOutcome::Assigned(scanner.nassigned)),
        Err(Halt::Input) if scanner.nconversions != 0 => Ok(ScanOutcome::Assigned(scanner.nassigned)),
        Err(Halt::Input) => Ok(ScanOutcome::Eof),
        Err(Halt::Format(e)) => Err(e),
    }
}
