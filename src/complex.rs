// src/complex.rs

use crate::common::{FxpError, MAX_WIDTH, width_bounds};
use crate::scalar::FixedPoint;
use num_complex::Complex;

const DEFAULT_WIDTH: u32 = 8;

/// Complex fixed-point value: two raw components sharing a single width and
/// binary-point position.
///
/// Deliberately not built on a complex-number primitive. The components are
/// plain `i64` fields so every operator spells out the exact word growth a
/// complex hardware multiplier or adder would produce; `num_complex` types
/// only appear at the conversion boundary.
#[derive(Clone, Copy)]
pub struct ComplexFixedPoint {
    re: i64,
    im: i64,
    width: u32,
    frac_bits: u32,
    min_val: i64,
    max_val: i64,
    min_held: i64,
    max_held: i64,
    elastic: bool,
}

impl ComplexFixedPoint {
    /// Creates a complex value of `width` total bits per component with
    /// `frac_bits` of them below the binary point.
    pub fn new(re: i64, im: i64, width: u32, frac_bits: u32) -> Result<Self, FxpError> {
        let (min_val, max_val) = width_bounds(width)?;
        if frac_bits > width {
            return Err(FxpError::FracBitsOutOfRange);
        }
        if re < min_val || re > max_val || im < min_val || im > max_val {
            return Err(FxpError::ValueOutOfRange);
        }
        Ok(Self {
            re,
            im,
            width,
            frac_bits,
            min_val,
            max_val,
            min_held: re.min(im),
            max_held: re.max(im),
            elastic: false,
        })
    }

    /// Constructor over a raw complex integer pair.
    pub fn from_complex(c: Complex<i64>, width: u32, frac_bits: u32) -> Result<Self, FxpError> {
        Self::new(c.re, c.im, width, frac_bits)
    }

    /// Placeholder that adopts the width and scale of whatever is first
    /// assigned into it, then behaves as an ordinary fixed-width value.
    /// Held extrema stay unset until that first assignment.
    pub fn elastic() -> Self {
        let unused = MAX_WIDTH - DEFAULT_WIDTH;
        Self {
            re: 0,
            im: 0,
            width: DEFAULT_WIDTH,
            frac_bits: 0,
            min_val: i64::MIN >> unused,
            max_val: i64::MAX >> unused,
            min_held: i64::MAX,
            max_held: i64::MIN,
            elastic: true,
        }
    }

    /// Quantizes the real and imaginary parts independently, each with
    /// `floor(x * 2^frac_bits + 0.5)`.
    pub fn quantize(c: Complex<f64>, width: u32, frac_bits: u32) -> Result<Self, FxpError> {
        let multiplier = libm::exp2(frac_bits as f64);
        let re = libm::floor(c.re * multiplier + 0.5);
        let im = libm::floor(c.im * multiplier + 0.5);
        // Same guard as the scalar quantize: an f64-to-i64 cast saturates,
        // which would slip past the range check at width 64.
        let limit = libm::exp2(63.0);
        if !re.is_finite() || re >= limit || re < -limit {
            return Err(FxpError::ValueOutOfRange);
        }
        if !im.is_finite() || im >= limit || im < -limit {
            return Err(FxpError::ValueOutOfRange);
        }
        Self::new(re as i64, im as i64, width, frac_bits)
    }

    #[inline]
    pub fn re(&self) -> i64 {
        self.re
    }

    #[inline]
    pub fn im(&self) -> i64 {
        self.im
    }

    /// Both raw components as a complex integer.
    #[inline]
    pub fn value(&self) -> Complex<i64> {
        Complex::new(self.re, self.im)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn frac_bits(&self) -> u32 {
        self.frac_bits
    }

    /// Smallest raw value either component may hold at the current width.
    #[inline]
    pub fn min_val(&self) -> i64 {
        self.min_val
    }

    /// Largest raw value either component may hold at the current width.
    #[inline]
    pub fn max_val(&self) -> i64 {
        self.max_val
    }

    /// Smallest raw value either component ever held across construction
    /// and assignment.
    #[inline]
    pub fn min_held_val(&self) -> i64 {
        self.min_held
    }

    /// Largest raw value either component ever held across construction
    /// and assignment.
    #[inline]
    pub fn max_held_val(&self) -> i64 {
        self.max_held
    }

    /// Stores `rhs`'s components. Width and fractional bits must match
    /// exactly, unless this instance is an elastic placeholder, which
    /// adopts `rhs`'s size on its first assignment.
    pub fn assign(&mut self, rhs: &ComplexFixedPoint) -> Result<&mut Self, FxpError> {
        if self.elastic {
            self.width = rhs.width;
            self.frac_bits = rhs.frac_bits;
            self.min_val = rhs.min_val;
            self.max_val = rhs.max_val;
            self.elastic = false;
        } else if rhs.width != self.width || rhs.frac_bits != self.frac_bits {
            return Err(FxpError::SizeMismatch);
        }
        self.re = rhs.re;
        self.im = rhs.im;
        self.update_held_vals();
        Ok(self)
    }

    /// Componentwise sum with the operands aligned to the larger
    /// fractional-bit count; identical growth rule to the scalar case.
    pub fn try_add(&self, rhs: &ComplexFixedPoint) -> Result<ComplexFixedPoint, FxpError> {
        let frac_diff = rhs.frac_bits as i32 - self.frac_bits as i32;
        let sum_width = self.width.max(rhs.width) + 1 + frac_diff.unsigned_abs();
        if sum_width > MAX_WIDTH {
            return Err(FxpError::WidthOutOfRange);
        }
        let (sum_re, sum_im) = if frac_diff > 0 {
            ((self.re << frac_diff) + rhs.re, (self.im << frac_diff) + rhs.im)
        } else {
            (self.re + (rhs.re << -frac_diff), self.im + (rhs.im << -frac_diff))
        };
        Self::new(sum_re, sum_im, sum_width, self.frac_bits.max(rhs.frac_bits))
    }

    /// Full complex product `(ac - bd, ad + bc)`. Each cross product takes
    /// `w1 + w2` bits and their sum one more, so the result carries
    /// `w1 + w2 + 1` bits; fractional bits add.
    pub fn try_mul(&self, rhs: &ComplexFixedPoint) -> Result<ComplexFixedPoint, FxpError> {
        let product_width = self.width + rhs.width + 1;
        if product_width > MAX_WIDTH {
            return Err(FxpError::WidthOutOfRange);
        }
        let (a, b) = (self.re as i128, self.im as i128);
        let (c, d) = (rhs.re as i128, rhs.im as i128);
        let re = a * c - b * d;
        let im = a * d + b * c;
        Self::new(
            re as i64,
            im as i64,
            product_width,
            self.frac_bits + rhs.frac_bits,
        )
    }

    /// Scales both components by the scalar's raw value; widths and
    /// fractional bits add, with no extra guard bit.
    pub fn try_mul_scalar(&self, rhs: &FixedPoint) -> Result<ComplexFixedPoint, FxpError> {
        let product_width = self.width + rhs.width();
        if product_width > MAX_WIDTH {
            return Err(FxpError::WidthOutOfRange);
        }
        let re = self.re as i128 * rhs.val() as i128;
        let im = self.im as i128 * rhs.val() as i128;
        Self::new(
            re as i64,
            im as i64,
            product_width,
            self.frac_bits + rhs.frac_bits(),
        )
    }

    /// Discards the `n` low bits of both components with arithmetic right
    /// shifts, narrowing the width by `n` and lowering the binary point.
    pub fn truncate_by(&mut self, n: u32) -> Result<&mut Self, FxpError> {
        if n >= self.width {
            return Err(FxpError::ResizeOutOfRange);
        }
        let (min_val, max_val) = width_bounds(self.width - n)?;
        self.width -= n;
        self.frac_bits = self.frac_bits.saturating_sub(n);
        self.min_val = min_val;
        self.max_val = max_val;
        self.re >>= n;
        self.im >>= n;
        Ok(self)
    }

    pub fn truncate_to(&mut self, new_width: u32) -> Result<&mut Self, FxpError> {
        if new_width > self.width {
            return Err(FxpError::ResizeOutOfRange);
        }
        self.truncate_by(self.width - new_width)
    }

    /// Narrows to `new_width` bits, clamping each component into the new
    /// range instead of shifting.
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
        self.re = self.re.clamp(min_val, max_val);
        self.im = self.im.clamp(min_val, max_val);
        Ok(self)
    }

    pub fn saturate_by(&mut self, n: u32) -> Result<&mut Self, FxpError> {
        let new_width = self.width.checked_sub(n).ok_or(FxpError::ResizeOutOfRange)?;
        self.saturate_to(new_width)
    }

    /// Rounds both components half up using bit `n - 1` as the rounding
    /// bit, then narrows. `round_by(0)` is the identity; a round-up that
    /// would overflow the shrunk width is rejected before any mutation.
    pub fn round_by(&mut self, n: u32) -> Result<&mut Self, FxpError> {
        if n == 0 {
            return Ok(self);
        }
        if n >= self.width {
            return Err(FxpError::ResizeOutOfRange);
        }
        let (min_val, max_val) = width_bounds(self.width - n)?;
        let rounded_re = (self.re >> n) + ((self.re >> (n - 1)) & 0x1);
        let rounded_im = (self.im >> n) + ((self.im >> (n - 1)) & 0x1);
        if rounded_re < min_val
            || rounded_re > max_val
            || rounded_im < min_val
            || rounded_im > max_val
        {
            return Err(FxpError::ValueOutOfRange);
        }
        self.width -= n;
        self.frac_bits = self.frac_bits.saturating_sub(n);
        self.min_val = min_val;
        self.max_val = max_val;
        self.re = rounded_re;
        self.im = rounded_im;
        Ok(self)
    }

    pub fn round_to(&mut self, new_width: u32) -> Result<&mut Self, FxpError> {
        if new_width > self.width {
            return Err(FxpError::ResizeOutOfRange);
        }
        self.round_by(self.width - new_width)
    }

    /// Widens both components by `n` bits; values are unchanged.
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

    /// Complex value represented: `(re, im) / 2^frac_bits`.
    pub fn to_f64(&self) -> Complex<f64> {
        let divisor = libm::exp2(self.frac_bits as f64);
        Complex::new(self.re as f64 / divisor, self.im as f64 / divisor)
    }

    pub fn to_f32(&self) -> Complex<f32> {
        let c = self.to_f64();
        Complex::new(c.re as f32, c.im as f32)
    }

    fn update_held_vals(&mut self) {
        if self.re.max(self.im) > self.max_held {
            self.max_held = self.re.max(self.im);
        }
        if self.re.min(self.im) < self.min_held {
            self.min_held = self.re.min(self.im);
        }
    }
}

// Same rule as the scalar: equality is over components plus format, and
// the held extrema and elastic tag stay out of it.
impl PartialEq for ComplexFixedPoint {
    fn eq(&self, other: &Self) -> bool {
        self.re == other.re
            && self.im == other.im
            && self.width == other.width
            && self.frac_bits == other.frac_bits
    }
}

impl Eq for ComplexFixedPoint {}

use core::ops::Add;

impl Add for ComplexFixedPoint {
    type Output = ComplexFixedPoint;

    /// # Panics
    ///
    /// Panics if the grown result width exceeds [`MAX_WIDTH`]; use
    /// [`ComplexFixedPoint::try_add`] to handle that case.
    fn add(self, rhs: ComplexFixedPoint) -> ComplexFixedPoint {
        match self.try_add(&rhs) {
            Ok(sum) => sum,
            Err(e) => panic!("complex fixed-point addition: {}", e),
        }
    }
}

use core::ops::Mul;

impl Mul for ComplexFixedPoint {
    type Output = ComplexFixedPoint;

    /// # Panics
    ///
    /// Panics if the grown result width exceeds [`MAX_WIDTH`]; use
    /// [`ComplexFixedPoint::try_mul`] to handle that case.
    fn mul(self, rhs: ComplexFixedPoint) -> ComplexFixedPoint {
        match self.try_mul(&rhs) {
            Ok(product) => product,
            Err(e) => panic!("complex fixed-point multiplication: {}", e),
        }
    }
}

impl Mul<FixedPoint> for ComplexFixedPoint {
    type Output = ComplexFixedPoint;

    /// # Panics
    ///
    /// Panics if the grown result width exceeds [`MAX_WIDTH`]; use
    /// [`ComplexFixedPoint::try_mul_scalar`] to handle that case.
    fn mul(self, rhs: FixedPoint) -> ComplexFixedPoint {
        match self.try_mul_scalar(&rhs) {
            Ok(product) => product,
            Err(e) => panic!("complex-by-scalar multiplication: {}", e),
        }
    }
}

impl Mul<ComplexFixedPoint> for FixedPoint {
    type Output = ComplexFixedPoint;

    fn mul(self, rhs: ComplexFixedPoint) -> ComplexFixedPoint {
        rhs * self
    }
}

use core::fmt;

impl fmt::Display for ComplexFixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl fmt::Debug for ComplexFixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (raw: ({}, {}), width: {}, frac: {})",
            self.to_f64(),
            self.re,
            self.im,
            self.width,
            self.frac_bits
        )
    }
}

#[cfg(test)]
#[path = "complex_tests.rs"]
mod tests;
