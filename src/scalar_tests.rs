use super::*;
use crate::common::FxpError;
use std::format;

#[test]
fn test_constructor() {
    let b = FixedPoint::new(-3, 4, 1).unwrap();
    assert_eq!(b.width(), 4);
    assert_eq!(b.frac_bits(), 1);
    assert_eq!(b.val(), -3);

    // values too large for the width
    assert_eq!(FixedPoint::new(128, 8, 0), Err(FxpError::ValueOutOfRange));
    assert_eq!(FixedPoint::new(-129, 8, 0), Err(FxpError::ValueOutOfRange));

    // width outside the allowed range
    assert_eq!(
        FixedPoint::new(0, MAX_WIDTH + 1, 0),
        Err(FxpError::WidthOutOfRange)
    );
    assert_eq!(FixedPoint::new(0, 0, 0), Err(FxpError::WidthOutOfRange));

    // more fractional bits than total bits
    assert_eq!(FixedPoint::new(0, 2, 3), Err(FxpError::FracBitsOutOfRange));
}

#[test]
fn test_full_width_bounds() {
    let a = FixedPoint::new(i64::MAX, 64, 0).unwrap();
    assert_eq!(a.max_val(), i64::MAX);
    let b = FixedPoint::new(i64::MIN, 64, 0).unwrap();
    assert_eq!(b.min_val(), i64::MIN);
}

#[test]
fn test_quantize() {
    let b = FixedPoint::quantize(2.34, 12, 4).unwrap();
    assert_eq!(b.val(), 37);
    assert_eq!(b.width(), 12);
    assert_eq!(b.frac_bits(), 4);
    assert!((b.to_f64() - 2.3125).abs() < 1e-9);

    // halves round away from zero for positive inputs
    assert_eq!(FixedPoint::quantize(0.5, 8, 0).unwrap().val(), 1);

    // too few integer bits for the magnitude
    assert_eq!(
        FixedPoint::quantize(2.34, 12, 10),
        Err(FxpError::ValueOutOfRange)
    );
}

#[test]
fn test_quantize_rejects_magnitudes_past_i64() {
    // even at full width, a scaled value past the i64 range must not
    // saturate its way through the range check
    assert_eq!(
        FixedPoint::quantize(1.0e30, 64, 0),
        Err(FxpError::ValueOutOfRange)
    );
    assert_eq!(
        FixedPoint::quantize(-1.0e30, 64, 0),
        Err(FxpError::ValueOutOfRange)
    );
    assert_eq!(
        FixedPoint::quantize(1.0e10, 64, 32),
        Err(FxpError::ValueOutOfRange)
    );
}

#[test]
fn test_quantize_round_trip() {
    for &x in &[0.0, 0.1, -0.73, 1.5, -2.34, 3.999] {
        let q = FixedPoint::quantize(x, 16, 8).unwrap();
        assert!(
            (q.to_f64() - x).abs() <= 1.0 / 256.0,
            "quantize({}) came back as {}",
            x,
            q.to_f64()
        );
    }
}

#[test]
fn test_accessors_and_held_vals() {
    let mut a = FixedPoint::new(1, 8, 3).unwrap();

    assert_eq!(a.val(), 1);
    assert_eq!(a.width(), 8);
    assert_eq!(a.frac_bits(), 3);
    assert_eq!(a.min_val(), -128);
    assert_eq!(a.max_val(), 127);
    assert_eq!(a.max_held_val(), 1);
    assert_eq!(a.min_held_val(), 1);

    a.assign(&FixedPoint::new(123, 8, 3).unwrap()).unwrap();
    assert_eq!(a.max_held_val(), 123);
    assert_eq!(a.min_held_val(), 1);

    a.assign(&FixedPoint::new(-110, 8, 3).unwrap()).unwrap();
    assert_eq!(a.max_held_val(), 123);
    assert_eq!(a.min_held_val(), -110);
}

#[test]
fn test_assignment() {
    let mut a = FixedPoint::new(1, 8, 0).unwrap();
    let b = FixedPoint::new(1, 10, 0).unwrap();
    let mut c = FixedPoint::new(0, 8, 0).unwrap();
    let d = FixedPoint::new(1, 8, 3).unwrap();

    // widths must match
    assert_eq!(a.assign(&b).unwrap_err(), FxpError::SizeMismatch);

    // binary point must be in the same position
    assert_eq!(a.assign(&d).unwrap_err(), FxpError::SizeMismatch);

    // failed assignment leaves the value untouched
    assert_eq!(a, FixedPoint::new(1, 8, 0).unwrap());

    // valid assignment
    c.assign(&a).unwrap();
    assert_eq!(c, a);
}

#[test]
fn test_elastic_assignment() {
    let mut a = FixedPoint::elastic();
    let b = FixedPoint::new(37, 12, 4).unwrap();

    // first assignment adopts the rhs size
    a.assign(&b).unwrap();
    assert_eq!(a.width(), 12);
    assert_eq!(a.frac_bits(), 4);
    assert_eq!(a, b);
    assert_eq!(a.min_held_val(), 37);
    assert_eq!(a.max_held_val(), 37);

    // after which the size is fixed
    let c = FixedPoint::new(1, 8, 0).unwrap();
    assert_eq!(a.assign(&c).unwrap_err(), FxpError::SizeMismatch);
}

#[test]
fn test_equality() {
    let a = FixedPoint::new(1, 8, 3).unwrap();
    let b = FixedPoint::new(1, 8, 3).unwrap();
    let c = FixedPoint::new(1, 10, 3).unwrap();
    let d = FixedPoint::new(13, 8, 3).unwrap();
    let f = FixedPoint::new(1, 8, 1).unwrap();
    let g = FixedPoint::new(24, 21, 7).unwrap();

    // reflexive and symmetric
    assert_eq!(a, a);
    assert_eq!(a, b);
    assert_eq!(b, a);

    // same value, different widths
    assert_ne!(a, c);

    // different values, same widths
    assert_ne!(a, d);

    // same value and width, different number of fractional bits
    assert_ne!(a, f);

    // everything different
    assert_ne!(a, g);
}

#[test]
fn test_addition() {
    let a = FixedPoint::new(1, 8, 0).unwrap();
    let b = FixedPoint::new(2, 5, 0).unwrap();
    let c = FixedPoint::new(4, 8, 3).unwrap();

    // addition is commutative
    assert_eq!(a + b, b + a);

    // width grows by one guard bit
    assert_eq!((a + b).width(), 9);
    assert_eq!(a + b, FixedPoint::new(3, 9, 0).unwrap());

    // different numbers of fractional bits align to the finer scale
    let d = a + c;
    assert_eq!(d.width(), 12);
    assert_eq!(d.frac_bits(), 3);
    assert_eq!(d, FixedPoint::new(12, 12, 3).unwrap());
    assert_eq!(c + a, d);
}

#[test]
fn test_addition_width_overflow() {
    let a = FixedPoint::new(1, 64, 0).unwrap();
    assert_eq!(a.try_add(&a), Err(FxpError::WidthOutOfRange));
}

#[test]
fn test_multiplication() {
    let a = FixedPoint::new(-13, 8, 0).unwrap();
    let b = FixedPoint::new(2, 5, 0).unwrap();
    let c = FixedPoint::new(4, 8, 3).unwrap();
    let d = FixedPoint::new(-3, 6, 1).unwrap();

    // multiplication is commutative
    assert_eq!(a * b, b * a);

    // widths add
    assert_eq!((a * b).width(), 13);
    assert_eq!(a * b, FixedPoint::new(-26, 13, 0).unwrap());

    // fractional bits add
    let e = c * d;
    assert_eq!(e.width(), 14);
    assert_eq!(e.frac_bits(), 4);
    assert_eq!(e, FixedPoint::new(-12, 14, 4).unwrap());
    assert_eq!(d * c, e);
}

#[test]
fn test_multiplication_width_overflow() {
    let a = FixedPoint::new(1, 40, 0).unwrap();
    assert_eq!(a.try_mul(&a), Err(FxpError::WidthOutOfRange));
}

#[test]
fn test_truncation() {
    let mut a = FixedPoint::new(15, 10, 2).unwrap();

    a.truncate_by(2).unwrap();
    assert_eq!(a, FixedPoint::new(3, 8, 0).unwrap());
    a.truncate_to(7).unwrap();
    assert_eq!(a, FixedPoint::new(1, 7, 0).unwrap());

    // beyond the allowed range
    assert_eq!(a.truncate_to(0).unwrap_err(), FxpError::ResizeOutOfRange);
    let w = a.width();
    assert_eq!(a.truncate_by(w).unwrap_err(), FxpError::ResizeOutOfRange);
    assert_eq!(a.truncate_to(12).unwrap_err(), FxpError::ResizeOutOfRange);
}

#[test]
fn test_saturation() {
    let mut a = FixedPoint::new(432, 10, 0).unwrap();
    let mut b = FixedPoint::new(-467, 10, 0).unwrap();

    // clamped to the new range, not wrapped
    a.saturate_by(2).unwrap();
    assert_eq!(a, FixedPoint::new(127, 8, 0).unwrap());
    a.saturate_to(6).unwrap();
    assert_eq!(a, FixedPoint::new(31, 6, 0).unwrap());
    b.saturate_by(2).unwrap();
    assert_eq!(b, FixedPoint::new(-128, 8, 0).unwrap());
    b.saturate_to(6).unwrap();
    assert_eq!(b, FixedPoint::new(-32, 6, 0).unwrap());

    // beyond the allowed range
    assert_eq!(a.saturate_to(0).unwrap_err(), FxpError::ResizeOutOfRange);
    let w = a.width();
    assert_eq!(a.saturate_by(w).unwrap_err(), FxpError::ResizeOutOfRange);

    // narrowing below the binary point is rejected
    let mut c = FixedPoint::new(3, 8, 4).unwrap();
    assert_eq!(c.saturate_to(3).unwrap_err(), FxpError::FracBitsOutOfRange);
}

#[test]
fn test_rounding() {
    let mut a = FixedPoint::new(15, 10, 2).unwrap();

    a.round_by(2).unwrap();
    assert_eq!(a, FixedPoint::new(4, 8, 0).unwrap());
    a.round_to(7).unwrap();
    assert_eq!(a, FixedPoint::new(2, 7, 0).unwrap());

    // beyond the allowed range
    assert_eq!(a.round_to(0).unwrap_err(), FxpError::ResizeOutOfRange);
    let w = a.width();
    assert_eq!(a.round_by(w).unwrap_err(), FxpError::ResizeOutOfRange);
}

#[test]
fn test_round_by_zero_is_identity() {
    let mut a = FixedPoint::new(15, 10, 2).unwrap();
    a.round_by(0).unwrap();
    assert_eq!(a, FixedPoint::new(15, 10, 2).unwrap());
}

#[test]
fn test_rounding_overflow_rejected() {
    // rounding 127 up would need 64, one past the 7-bit maximum
    let mut a = FixedPoint::new(127, 8, 0).unwrap();
    assert_eq!(a.round_by(1).unwrap_err(), FxpError::ValueOutOfRange);
    assert_eq!(a, FixedPoint::new(127, 8, 0).unwrap());
}

#[test]
fn test_sign_extension() {
    let mut a = FixedPoint::new(15, 10, 0).unwrap();
    let mut b = FixedPoint::new(-32, 10, 0).unwrap();

    a.sign_extend_by(2).unwrap();
    assert_eq!(a, FixedPoint::new(15, 12, 0).unwrap());
    a.sign_extend_to(51).unwrap();
    assert_eq!(a, FixedPoint::new(15, 51, 0).unwrap());
    b.sign_extend_by(2).unwrap();
    assert_eq!(b, FixedPoint::new(-32, 12, 0).unwrap());
    b.sign_extend_to(51).unwrap();
    assert_eq!(b, FixedPoint::new(-32, 51, 0).unwrap());

    // past the maximum width
    assert_eq!(
        a.sign_extend_to(MAX_WIDTH + 1).unwrap_err(),
        FxpError::ResizeOutOfRange
    );
    let n = MAX_WIDTH - a.width() + 1;
    assert_eq!(a.sign_extend_by(n).unwrap_err(), FxpError::ResizeOutOfRange);
}

#[test]
fn test_sign_extension_huge_amount() {
    // an amount large enough to wrap the width sum is still just out of
    // range, and leaves the value untouched
    let mut a = FixedPoint::new(15, 10, 0).unwrap();
    assert_eq!(
        a.sign_extend_by(u32::MAX).unwrap_err(),
        FxpError::ResizeOutOfRange
    );
    assert_eq!(a, FixedPoint::new(15, 10, 0).unwrap());
}

#[test]
fn test_transform_chaining() {
    let mut a = FixedPoint::new(15, 10, 2).unwrap();
    a.truncate_by(2).unwrap().sign_extend_by(4).unwrap();
    assert_eq!(a, FixedPoint::new(3, 12, 0).unwrap());
}

#[test]
fn test_to_float() {
    let a = FixedPoint::new(15, 10, 1).unwrap();
    assert!((a.to_f32() - 7.5).abs() < 1e-6);
    assert!((a.to_f64() - 7.5).abs() < 1e-12);

    // extreme case: every bit fractional
    let b = FixedPoint::new(15, 64, 64).unwrap();
    let expected = 15.0 / libm::exp2(64.0);
    assert!((b.to_f64() - expected).abs() < expected * 1e-9);
}

#[test]
fn test_display() {
    let a = FixedPoint::new(5, 8, 1).unwrap();
    assert_eq!(format!("{}", a), "2.5");
}
