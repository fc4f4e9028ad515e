//! Fixed-width unsigned arithmetic.
//!
//! Every operation is total: results are truncated to the requested width
//! with modulo-2^width wraparound and an accompanying [`MathFlag`] reports
//! whether the true result fell outside `[0, 2^width)`.

use std::fmt;

/// Result tag for fixed-width arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathFlag {
    /// The result was representable.
    Ok,
    /// The result was truncated.
    Overflow,
}

impl MathFlag {
    pub fn is_overflow(self) -> bool {
        self == MathFlag::Overflow
    }

    /// `1` for [`MathFlag::Overflow`], `0` otherwise. Handy for carry registers.
    pub fn as_bit(self) -> u16 {
        match self {
            MathFlag::Ok => 0,
            MathFlag::Overflow => 1,
        }
    }
}

/// Width of a fixed-width value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    U8,
    U16,
}

impl Width {
    /// Number of bits.
    pub const fn bits(self) -> u32 {
        match self {
            Width::U8 => 8,
            Width::U16 => 16,
        }
    }

    /// Smallest representable value.
    pub const fn min(self) -> u16 {
        0
    }

    /// Largest representable value.
    pub const fn max(self) -> u16 {
        match self {
            Width::U8 => 0xff,
            Width::U16 => 0xffff,
        }
    }

    /// `2^bits`, the wraparound modulus.
    pub const fn modulus(self) -> i64 {
        1 << self.bits()
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.bits())
    }
}

/// Truncate `n` to `width` bits.
///
/// Negative inputs wrap to their two's-complement representation, matching
/// a native `as u8` / `as u16` cast.
pub fn cast(n: i64, width: Width) -> u16 {
    n.rem_euclid(width.modulus()) as u16
}

/// Truncate `n` to `width` bits and report whether truncation changed it.
pub fn wrap(n: i64, width: Width) -> (u16, MathFlag) {
    truncate(i128::from(n), width)
}

/// `a + b` truncated to `width`.
pub fn add(a: i64, b: i64, width: Width) -> (u16, MathFlag) {
    truncate(i128::from(a) + i128::from(b), width)
}

/// `a - b` truncated to `width`.
pub fn sub(a: i64, b: i64, width: Width) -> (u16, MathFlag) {
    truncate(i128::from(a) - i128::from(b), width)
}

// The sum or difference of two i64 always fits in i128.
fn truncate(n: i128, width: Width) -> (u16, MathFlag) {
    let value = n.rem_euclid(i128::from(width.modulus())) as u16;
    let flag = if i128::from(value) == n {
        MathFlag::Ok
    } else {
        MathFlag::Overflow
    };
    (value, flag)
}
