//! Length modifiers.
//!
//! Modifiers accumulate as independent flags rather than a single value: a
//! second `h` turns `h` into `hh`, a second `l` turns `l` into `ll`, and any
//! other combination (`lh`, `hhh`, `jz`, ...) keeps every flag set. Each
//! engine then picks the operand width by its own fixed precedence.

/// Operand width selected by a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMod {
    None,
    Hh, // 'hh'
    H,  // 'h'
    L,  // 'l'
    Ll, // 'll' / 'q'
    Z,  // 'z'
    T,  // 't'
    J,  // 'j'
}

/// Raw modifier flags seen so far in one directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LengthFlags {
    pub h: bool,
    pub hh: bool,
    pub l: bool,
    pub q: bool,
    pub j: bool,
    pub t: bool,
    pub z: bool,
}

impl LengthFlags {
    /// `h`: first one sets short, second one trades it for short-short.
    pub fn toggle_h(&mut self) {
        if self.h {
            self.h = false;
            self.hh = true;
        } else {
            self.h = true;
        }
    }

    /// `l`: first one sets long, second one trades it for long long.
    pub fn toggle_l(&mut self) {
        if self.l {
            self.l = false;
            self.q = true;
        } else {
            self.l = true;
        }
    }

    /// Formatter operand precedence: `j > q > t > l > z > h > hh`.
    #[must_use]
    pub fn for_operand(self) -> LengthMod {
        if self.j {
            LengthMod::J
        } else if self.q {
            LengthMod::Ll
        } else if self.t {
            LengthMod::T
        } else if self.l {
            LengthMod::L
        } else if self.z {
            LengthMod::Z
        } else if self.h {
            LengthMod::H
        } else if self.hh {
            LengthMod::Hh
        } else {
            LengthMod::None
        }
    }

    /// Formatter `%n` precedence: like [`Self::for_operand`] without `t`.
    #[must_use]
    pub fn for_count(self) -> LengthMod {
        Self { t: false, ..self }.for_operand()
    }

    /// Scanner target precedence: `hh > h > l > q`. `j`, `t` and `z` were
    /// folded into `q` while parsing.
    #[must_use]
    pub fn for_target(self) -> LengthMod {
        if self.hh {
            LengthMod::Hh
        } else if self.h {
            LengthMod::H
        } else if self.l {
            LengthMod::L
        } else if self.q {
            LengthMod::Ll
        } else {
            LengthMod::None
        }
    }
}

impl LengthMod {
    /// Narrow a raw pattern to this width and sign-extend it back.
    #[must_use]
    pub fn sign_extend(self, bits: u64) -> u64 {
        match self {
            Self::Hh => bits as i8 as i64 as u64,
            Self::H => bits as i16 as i64 as u64,
            Self::None => bits as i32 as i64 as u64,
            Self::L | Self::Ll | Self::Z | Self::T | Self::J => bits,
        }
    }

    /// Narrow a raw pattern to this width and zero-extend it back.
    #[must_use]
    pub fn zero_extend(self, bits: u64) -> u64 {
        match self {
            Self::Hh => u64::from(bits as u8),
            Self::H => u64::from(bits as u16),
            Self::None => u64::from(bits as u32),
            Self::L | Self::Ll | Self::Z | Self::T | Self::J => bits,
        }
    }
}
