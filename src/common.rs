// src/common.rs

/// Widest word either value type can model, in bits.
pub const MAX_WIDTH: u32 = 64;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FxpError {
    /// Width is zero or exceeds [`MAX_WIDTH`].
    WidthOutOfRange,
    /// Fractional-bit count exceeds the total width.
    FracBitsOutOfRange,
    /// Stored value does not fit the representable range of the width.
    ValueOutOfRange,
    /// Bit-width transform argument outside its valid range.
    ResizeOutOfRange,
    /// Width or fractional bits of assignment operands differ.
    SizeMismatch,
}

use core::fmt;

impl fmt::Display for FxpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FxpError::WidthOutOfRange => write!(f, "Width outside allowed range"),
            FxpError::FracBitsOutOfRange => write!(f, "Fractional bits outside allowed range"),
            FxpError::ValueOutOfRange => write!(f, "Value exceeds size"),
            FxpError::ResizeOutOfRange => write!(f, "Resize amount outside allowed range"),
            FxpError::SizeMismatch => write!(f, "Size of lhs and rhs of assignment must match"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FxpError {}

/// Representable range of a signed two's-complement word of `width` bits.
pub(crate) fn width_bounds(width: u32) -> Result<(i64, i64), FxpError> {
    if width == 0 || width > MAX_WIDTH {
        return Err(FxpError::WidthOutOfRange);
    }
    let unused = MAX_WIDTH - width;
    Ok((i64::MIN >> unused, i64::MAX >> unused))
}
