// src/scalar.rs

use crate::common::{FxpError, MAX_WIDTH, width_bounds};

/// Width a placeholder created with [`FixedPoint::elastic`] starts from
/// until the first assignment fixes it.
const DEFAULT_WIDTH: u32 = 8;

/// Signed fixed-point scalar whose total bit width and binary-point
/// position are tracked alongside the stored integer.
///
/// The raw value always satisfies `min_val() <= val() <= max_val()` for the
/// current width; every operation that would break that reports an error
/// before touching the instance. Arithmetic grows the result exactly the
/// way a hardware word would: the bit-width transforms are how a datapath
/// model brings results back down to size.
#[derive(Clone, Copy)]
pub struct FixedPoint {
    val: i64,
    width: u32,
    frac_bits: u32,
    min_val: i64,
    max_val: i64,
    min_held: i64,
    max_held: i64,
    elastic: bool,
}

impl FixedPoint {
    /// Creates a value of `width` total bits with `frac_bits` of them below
    /// the binary point.
    pub fn new(val: i64, width: u32, frac_bits: u32) -> Result<Self, FxpError> {
        let (min_val, max_val) = width_bounds(width)?;
        if frac_bits > width {
            return Err(FxpError::FracBitsOutOfRange);
        }
        if val < min_val || val > max_val {
            return Err(FxpError::ValueOutOfRange);
        }
        Ok(Self {
            val,
            width,
            frac_bits,
            min_val,
            max_val,
            min_held: val,
            max_held: val,
            elastic: false,
        })
    }

    /// Placeholder that adopts the width and scale of whatever is first
    /// assigned into it, then behaves as an ordinary fixed-width value.
    /// Held extrema stay unset until that first assignment.
    pub fn elastic() -> Self {
        let unused = MAX_WIDTH - DEFAULT_WIDTH;
        Self {
            val: 0,
            width: DEFAULT_WIDTH,
            frac_bits: 0,
            min_val: i64::MIN >> unused,
            max_val: i64::MAX >> unused,
            min_held: i64::MAX,
            max_held: i64::MIN,
            elastic: true,
        }
    }

    /// Quantizes a real number to `frac_bits` of fractional precision,
    /// rounding halves toward positive infinity
    /// (`floor(v * 2^frac_bits + 0.5)`).
    pub fn quantize(v: f64, width: u32, frac_bits: u32) -> Result<Self, FxpError> {
        let scaled = libm::floor(v * libm::exp2(frac_bits as f64) + 0.5);
        // Casting an out-of-range f64 to i64 saturates, which would slip
        // past the range check at width 64; reject before the cast.
        let limit = libm::exp2(63.0);
        if !scaled.is_finite() || scaled >= limit || scaled < -limit {
            return Err(FxpError::ValueOutOfRange);
        }
        Self::new(scaled as i64, width, frac_bits)
    }

    #[inline]
    pub fn val(&self) -> i64 {
        self.val
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn frac_bits(&self) -> u32 {
        self.frac_bits
    }

    /// Smallest raw value representable at the current width.
    #[inline]
    pub fn min_val(&self) -> i64 {
        self.min_val
    }

    /// Largest raw value representable at the current width.
    #[inline]
    pub fn max_val(&self) -> i64 {
        self.max_val
    }

    /// Smallest raw value ever constructed into or assigned to this
    /// instance. Dynamic-range diagnostic for a simulation "slot".
    #[inline]
    pub fn min_held_val(&self) -> i64 {
        self.min_held
    }

    /// Largest raw value ever constructed into or assigned to this instance.
    #[inline]
    pub fn max_held_val(&self) -> i64 {
        self.max_held
    }

    /// Stores `rhs`'s value. Width and fractional bits must match exactly,
    /// unless this instance is an elastic placeholder, which adopts `rhs`'s
    /// size on its first assignment. Updates the held extrema.
    pub fn assign(&mut self, rhs: &FixedPoint) -> Result<&mut Self, FxpError> {
        if self.elastic {
            self.width = rhs.width;
            self.frac_bits = rhs.frac_bits;
            self.min_val = rhs.min_val;
            self.max_val = rhs.max_val;
            self.elastic = false;
        } else if rhs.width != self.width || rhs.frac_bits != self.frac_bits {
            return Err(FxpError::SizeMismatch);
        }
        self.val = rhs.val;
        self.update_held_vals();
        Ok(self)
    }

    /// Sum with the operands aligned to the larger fractional-bit count.
    /// The result carries `max(width) + 1 + |Δfrac|` bits, so neither the
    /// guard bit nor the alignment shift can overflow.
    pub fn try_add(&self, rhs: &FixedPoint) -> Result<FixedPoint, FxpError> {
        let frac_diff = rhs.frac_bits as i32 - self.frac_bits as i32;
        let sum_width = self.width.max(rhs.width) + 1 + frac_diff.unsigned_abs();
        if sum_width > MAX_WIDTH {
            return Err(FxpError::WidthOutOfRange);
        }
        let sum = if frac_diff > 0 {
            (self.val << frac_diff) + rhs.val
        } else {
            self.val + (rhs.val << -frac_diff)
        };
        Self::new(sum, sum_width, self.frac_bits.max(rhs.frac_bits))
    }

    /// Raw product; widths and fractional bits both add.
    pub fn try_mul(&self, rhs: &FixedPoint) -> Result<FixedPoint, FxpError> {
        let product_width = self.width + rhs.width;
        if product_width > MAX_WIDTH {
            return Err(FxpError::WidthOutOfRange);
        }
        let product = self.val as i128 * rhs.val as i128;
        Self::new(product as i64, product_width, self.frac_bits + rhs.frac_bits)
    }

    /// Discards the `n` low bits with an arithmetic right shift, narrowing
    /// the width by `n` and lowering the binary point (floored at zero).
    pub fn truncate_by(&mut self, n: u32) -> Result<&mut Self, FxpError> {
        if n >= self.width {
            return Err(FxpError::ResizeOutOfRange);
        }
        let (min_val, max_val) = width_bounds(self.width - n)?;
        self.width -= n;
        self.frac_bits = self.frac_bits.saturating_sub(n);
        self.min_val = min_val;
        self.max_val = max_val;
        self.val >>= n;
        Ok(self)
    }

    pub fn truncate_to(&mut self, new_width: u32) -> Result<&mut Self, FxpError> {
        if new_width > self.width {
            return Err(FxpError::ResizeOutOfRange);
        }
        self.truncate_by(self.width - new_width)
    }

    /// Narrows to `new_width` bits, clamping the value into the new range
    /// instead of shifting. Fractional bits are unchanged, so they must
    /// still fit the new width.
    pub fn saturate_to(&mut self, new_width: u32) -> Result<&mut Self, FxpError> {
        if new_width == 0 || new_width > self.width {
            return Err(FxpError::ResizeOutOfRange);
        }
        if self.frac_bits > new_width {
            return Err(FxpError::FracBitsOutOfRange);
        }
        let (min_val, max_val) = width_bounds(new_width)?;
        self.width = new_width;
        self.min_val = min_val;
        self.max_val = max_val;
        self.val = self.val.clamp(min_val, max_val);
        Ok(self)
    }

    pub fn saturate_by(&mut self, n: u32) -> Result<&mut Self, FxpError> {
        let new_width = self.width.checked_sub(n).ok_or(FxpError::ResizeOutOfRange)?;
        self.saturate_to(new_width)
    }

    /// Like [`truncate_by`](Self::truncate_by), but rounds half up using
    /// bit `n - 1` as the rounding bit. `round_by(0)` is the identity.
    /// Rounding up from the most positive value would overflow the shrunk
    /// width; that case is rejected, not wrapped.
    pub fn round_by(&mut self, n: u32) -> Result<&mut Self, FxpError> {
        if n == 0 {
            return Ok(self);
        }
        if n >= self.width {
            return Err(FxpError::ResizeOutOfRange);
        }
        let (min_val, max_val) = width_bounds(self.width - n)?;
        let round_up = (self.val >> (n - 1)) & 0x1;
        let rounded = (self.val >> n) + round_up;
        if rounded < min_val || rounded > max_val {
            return Err(FxpError::ValueOutOfRange);
        }
        self.width -= n;
        self.frac_bits = self.frac_bits.saturating_sub(n);
        self.min_val = min_val;
        self.max_val = max_val;
        self.val = rounded;
        Ok(self)
    }

    pub fn round_to(&mut self, new_width: u32) -> Result<&mut Self, FxpError> {
        if new_width > self.width {
            return Err(FxpError::ResizeOutOfRange);
        }
        self.round_by(self.width - new_width)
    }

    /// Widens by `n` bits. The stored value is already sign-correct in
    /// two's complement, so only the range bookkeeping changes.
    pub fn sign_extend_by(&mut self, n: u32) -> Result<&mut Self, FxpError> {
        let new_width = self.width.checked_add(n).ok_or(FxpError::ResizeOutOfRange)?;
        if new_width > MAX_WIDTH {
            return Err(FxpError::ResizeOutOfRange);
        }
        let (min_val, max_val) = width_bounds(new_width)?;
        self.width = new_width;
        self.min_val = min_val;
        self.max_val = max_val;
        Ok(self)
    }

    pub fn sign_extend_to(&mut self, new_width: u32) -> Result<&mut Self, FxpError> {
        let n = new_width.checked_sub(self.width).ok_or(FxpError::ResizeOutOfRange)?;
        self.sign_extend_by(n)
    }

    /// Real value represented: `val / 2^frac_bits`.
    pub fn to_f64(&self) -> f64 {
        self.val as f64 / libm::exp2(self.frac_bits as f64)
    }

    pub fn to_f32(&self) -> f32 {
        self.to_f64() as f32
    }

    fn update_held_vals(&mut self) {
        if self.val > self.max_held {
            self.max_held = self.val;
        }
        if self.val < self.min_held {
            self.min_held = self.val;
        }
    }
}

// Equality is over the full format: the same number stored at a different
// width or scale is a different fixed-point value. Held extrema and the
// elastic tag are diagnostics and do not participate.
impl PartialEq for FixedPoint {
    fn eq(&self, other: &Self) -> bool {
        self.val == other.val && self.width == other.width && self.frac_bits == other.frac_bits
    }
}

impl Eq for FixedPoint {}

use core::ops::Add;

impl Add for FixedPoint {
    type Output = FixedPoint;

    /// # Panics
    ///
    /// Panics if the grown result width exceeds [`MAX_WIDTH`]; use
    /// [`FixedPoint::try_add`] to handle that case.
    fn add(self, rhs: FixedPoint) -> FixedPoint {
        match self.try_add(&rhs) {
            Ok(sum) => sum,
            Err(e) => panic!("fixed-point addition: {}", e),
        }
    }
}

use core::ops::Mul;

impl Mul for FixedPoint {
    type Output = FixedPoint;

    /// # Panics
    ///
    /// Panics if the grown result width exceeds [`MAX_WIDTH`]; use
    /// [`FixedPoint::try_mul`] to handle that case.
    fn mul(self, rhs: FixedPoint) -> FixedPoint {
        match self.try_mul(&rhs) {
            Ok(product) => product,
            Err(e) => panic!("fixed-point multiplication: {}", e),
        }
    }
}

use core::fmt;

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl fmt::Debug for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (raw: {}, width: {}, frac: {})",
            self.to_f64(),
            self.val,
            self.width,
            self.frac_bits
        )
    }
}

#[cfg(test)]
#[path = "scalar_tests.rs"]
mod tests;
