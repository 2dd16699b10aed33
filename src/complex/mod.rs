//! Complex double-precision arithmetic backing the FFT
//!
//! The floating variant of the transform strategy, used to pack vectors of
//! complex values into polynomial slots the way approximate-arithmetic
//! encoders do. Floating addition cannot overflow a representation the way
//! lazy modular values can, so `guard` is the identity here and the kernel's
//! guard discipline costs nothing.

use num_complex::Complex;

use crate::dwt::Arithmetic;

/// Complex double-precision strategy for the FFT.
///
/// `Value` and `Root` share the `Complex<f64>` representation; the scalar is
/// a plain `f64` since normalization by `1/n` never needs an imaginary part.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplexArithmetic;

impl Arithmetic for ComplexArithmetic {
    type Value = Complex<f64>;
    type Root = Complex<f64>;
    type Scalar = f64;

    #[inline(always)]
    fn add(&self, a: Complex<f64>, b: Complex<f64>) -> Complex<f64> {
        a + b
    }

    #[inline(always)]
    fn sub(&self, a: Complex<f64>, b: Complex<f64>) -> Complex<f64> {
        a - b
    }

    #[inline(always)]
    fn mul_root(&self, a: Complex<f64>, r: Complex<f64>) -> Complex<f64> {
        a * r
    }

    #[inline(always)]
    fn mul_scalar(&self, a: Complex<f64>, s: f64) -> Complex<f64> {
        a * s
    }

    #[inline(always)]
    fn mul_root_scalar(&self, r: Complex<f64>, s: f64) -> Complex<f64> {
        r * s
    }

    #[inline(always)]
    fn guard(&self, a: Complex<f64>) -> Complex<f64> {
        a
    }
}
