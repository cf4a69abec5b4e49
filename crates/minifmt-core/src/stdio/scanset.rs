//! `%[...]` scan-set compiler.
//!
//! Grammar, starting just after the `[`:
//!
//! - a leading `^` negates the set;
//! - the first member (after the optional `^`) is always literal, so `]` and
//!   `-` can be members by appearing first;
//! - `x-y` is a range only when `y` is not `]` and `y >= x`; otherwise the `-`
//!   is itself a member. Ranges are inclusive and may chain (`a-c-e`);
//! - `]` closes the set.

use crate::error::FormatError;

/// Membership table for one `%[...]` directive.
#[derive(Clone)]
pub struct ScanSet {
    table: [bool; 256],
}

impl Default for ScanSet {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ScanSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let members = self.table.iter().filter(|&&m| m).count();
        f.debug_struct("ScanSet").field("members", &members).finish()
    }
}

impl ScanSet {
    /// An empty set (rejects every byte).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table: [false; 256],
        }
    }

    /// Whether `c` is accepted.
    #[inline]
    #[must_use]
    pub fn contains(&self, c: u8) -> bool {
        self.table[usize::from(c)]
    }

    /// Rebuild the table from `fmt[start..]`, where `start` is the offset just
    /// past the `[`. Returns the offset just past the closing `]`.
    ///
    /// When the format ends first, the table is left as far as it got and
    /// [`FormatError::UnterminatedScanSet`] carries the terminator's offset.
    pub fn compile(&mut self, fmt: &[u8], start: usize) -> Result<usize, FormatError> {
        let at = |i: usize| fmt.get(i).copied().unwrap_or(0);
        let mut pos = start;

        let mut c = at(pos);
        pos += 1;
        let negated = c == b'^';
        if negated {
            c = at(pos);
            pos += 1;
        }
        self.table = [negated; 256];

        let unterminated = |pos: usize| FormatError::UnterminatedScanSet { offset: pos - 1 };
        if c == 0 {
            return Err(unterminated(pos));
        }

        let member = !negated;
        loop {
            self.table[usize::from(c)] = member;
            // A range leaves `c` at its upper bound without storing it again.
            loop {
                let n = at(pos);
                pos += 1;
                match n {
                    0 => return Err(unterminated(pos)),
                    b']' => return Ok(pos),
                    b'-' => {
                        let hi = at(pos);
                        if hi == b']' || hi < c {
                            c = b'-';
                            break;
                        }
                        pos += 1;
                        for b in c..=hi {
                            self.table[usize::from(b)] = member;
                        }
                        c = hi;
                    }
                    other => {
                        c = other;
                        break;
                    }
                }
            }
        }
    }
}
