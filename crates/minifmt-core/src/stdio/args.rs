//! Typed argument sequences.
//!
//! C reaches operands through `va_arg`; here the caller supplies a slice of
//! tagged values that directives consume strictly in order. Integer operands
//! travel as raw 64-bit patterns and are narrowed by the directive's length
//! modifier, the way a promoted variadic argument would be.

use crate::error::FormatError;

/// One operand for the formatter.
#[derive(Debug)]
pub enum FormatArg<'a> {
    /// Signed integer (`%d`, `%i`, `%y`, `%r`, `*` widths, ...).
    Int(i64),
    /// Unsigned integer (`%u`, `%o`, `%x`, ...).
    Uint(u64),
    /// Single byte for `%c`.
    Char(u8),
    /// Address for `%p`.
    Ptr(usize),
    /// Text for `%s`, read up to its first NUL. `None` prints `(null)`.
    Str(Option<&'a [u8]>),
    /// Destination for `%n`.
    Count(&'a mut i64),
}

impl FormatArg<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) | Self::Uint(_) | Self::Char(_) | Self::Ptr(_) => "integer",
            Self::Str(_) => "string",
            Self::Count(_) => "count slot",
        }
    }
}

macro_rules! format_arg_from {
    ($variant:ident as $wide:ty: $($t:ty),*) => {
        $(impl From<$t> for FormatArg<'_> {
            fn from(v: $t) -> Self {
                Self::$variant(v as $wide)
            }
        })*
    };
}

format_arg_from!(Int as i64: i8, i16, i32, i64, isize);
format_arg_from!(Uint as u64: u16, u32, u64, usize);

impl<'a> From<&'a [u8]> for FormatArg<'a> {
    fn from(s: &'a [u8]) -> Self {
        Self::Str(Some(s))
    }
}

impl<'a> From<&'a str> for FormatArg<'a> {
    fn from(s: &'a str) -> Self {
        Self::Str(Some(s.as_bytes()))
    }
}

impl<'a> From<Option<&'a [u8]>> for FormatArg<'a> {
    fn from(s: Option<&'a [u8]>) -> Self {
        Self::Str(s)
    }
}

impl<'a> From<&'a mut i64> for FormatArg<'a> {
    fn from(slot: &'a mut i64) -> Self {
        Self::Count(slot)
    }
}

/// One assignment target for the scanner.
#[derive(Debug)]
pub enum ScanArg<'a> {
    /// Signed integer target; also accepted by `%n`.
    Int(&'a mut i64),
    /// Unsigned integer target.
    Uint(&'a mut u64),
    /// Pointer target for `%p`.
    Ptr(&'a mut usize),
    /// Byte buffer for `%c`, `%s` and `%[`.
    Chars(&'a mut [u8]),
    /// Byte count for `%n`.
    Count(&'a mut i64),
}

impl ScanArg<'_> {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "signed integer",
            Self::Uint(_) => "unsigned integer",
            Self::Ptr(_) => "pointer",
            Self::Chars(_) => "byte buffer",
            Self::Count(_) => "count slot",
        }
    }
}

impl<'a> From<&'a mut i64> for ScanArg<'a> {
    fn from(v: &'a mut i64) -> Self {
        Self::Int(v)
    }
}

impl<'a> From<&'a mut u64> for ScanArg<'a> {
    fn from(v: &'a mut u64) -> Self {
        Self::Uint(v)
    }
}

impl<'a> From<&'a mut usize> for ScanArg<'a> {
    fn from(v: &'a mut usize) -> Self {
        Self::Ptr(v)
    }
}

impl<'a> From<&'a mut [u8]> for ScanArg<'a> {
    fn from(v: &'a mut [u8]) -> Self {
        Self::Chars(v)
    }
}

/// In-order reader over an argument slice.
pub(crate) struct Cursor<'s, T> {
    iter: core::slice::IterMut<'s, T>,
    index: usize,
}

impl<'s, T> Cursor<'s, T> {
    pub(crate) fn new(args: &'s mut [T]) -> Self {
        Self {
            iter: args.iter_mut(),
            index: 0,
        }
    }

    /// Next argument and its zero-based position.
    pub(crate) fn next(&mut self) -> Result<(usize, &'s mut T), FormatError> {
        let index = self.index;
        let arg = self
            .iter
            .next()
            .ok_or(FormatError::MissingArgument { index })?;
        self.index += 1;
        Ok((index, arg))
    }
}

impl<'s, 'a> Cursor<'s, FormatArg<'a>> {
    /// Raw 64-bit pattern of the next integer-class operand.
    pub(crate) fn next_bits(&mut self) -> Result<u64, FormatError> {
        let (index, arg) = self.next()?;
        match *arg {
            FormatArg::Int(v) => Ok(v as u64),
            FormatArg::Uint(v) => Ok(v),
            FormatArg::Char(c) => Ok(u64::from(c)),
            FormatArg::Ptr(p) => Ok(p as u64),
            ref other => Err(mismatch(index, "integer", other.kind())),
        }
    }

    /// Next operand as a C `int`.
    pub(crate) fn next_int(&mut self) -> Result<i32, FormatError> {
        self.next_bits().map(|bits| bits as i32)
    }

    pub(crate) fn next_str(&mut self) -> Result<Option<&'a [u8]>, FormatError> {
        let (index, arg) = self.next()?;
        match arg {
            FormatArg::Str(s) => Ok(*s),
            other => Err(mismatch(index, "string", other.kind())),
        }
    }

    pub(crate) fn next_count(&mut self) -> Result<&'s mut i64, FormatError> {
        let (index, arg) = self.next()?;
        match arg {
            FormatArg::Count(slot) => Ok(&mut **slot),
            other => Err(mismatch(index, "count slot", other.kind())),
        }
    }
}

pub(crate) fn mismatch(index: usize, expected: &'static str, found: &'static str) -> FormatError {
    FormatError::ArgumentMismatch {
        index,
        expected,
        found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reports_exhaustion_index() {
        let mut args = [FormatArg::from(1_i32)];
        let mut cursor = Cursor::new(&mut args);
        assert_eq!(cursor.next_bits(), Ok(1));
        assert_eq!(
            cursor.next_bits(),
            Err(FormatError::MissingArgument { index: 1 })
        );
    }

    #[test]
    fn integer_kinds_share_bits() {
        let mut args = [
            FormatArg::Int(-1),
            FormatArg::Char(b'A'),
            FormatArg::Ptr(0x1000),
            FormatArg::Uint(7),
        ];
        let mut cursor = Cursor::new(&mut args);
        assert_eq!(cursor.next_bits(), Ok(u64::MAX));
        assert_eq!(cursor.next_bits(), Ok(65));
        assert_eq!(cursor.next_bits(), Ok(0x1000));
        assert_eq!(cursor.next_int(), Ok(7));
    }

    #[test]
    fn string_slot_rejects_integer() {
        let mut args = [FormatArg::Int(3)];
        let mut cursor = Cursor::new(&mut args);
        assert_eq!(
            cursor.next_str(),
            Err(FormatError::ArgumentMismatch {
                index: 0,
                expected: "string",
                found: "integer",
            })
        );
    }

    #[test]
    fn count_slot_is_writable() {
        let mut n = 0_i64;
        {
            let mut args = [FormatArg::from(&mut n)];
            let mut cursor = Cursor::new(&mut args);
            *cursor.next_count().unwrap() = 9;
        }
        assert_eq!(n, 9);
    }
}
