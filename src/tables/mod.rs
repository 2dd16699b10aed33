//! Root-of-unity table construction and validated transform entry points
//!
//! The transform kernel consumes its root table through a sequentially
//! incrementing cursor, which only works because the tables built here are
//! pre-arranged for that access pattern:
//!
//! - forward table: slot `i` holds `psi^reverse_bits(i, log_n)`, the powers
//!   of the primitive 2n-th root in bit-reversed order;
//! - inverse table: slot `reverse_bits(i - 1, log_n) + 1` holds `psi^-i`,
//!   which reads back in the normal stage order of the inverse transform.
//!
//! The two orderings are not interchangeable. Slot 0 of either table is a
//! placeholder the kernel never reads.
//!
//! Everything the kernel refuses to check is checked here, once, at
//! construction: admissible `log_n`, primality of the modulus, the
//! `q = 1 (mod 2n)` condition that guarantees a primitive 2n-th root
//! exists, and buffer lengths on every transform call.

use alloc::vec;
use alloc::vec::Vec;

use crate::dwt::DwtHandler;
use crate::error::{Error, Result};
use crate::modular::{is_prime, ModularArithmetic, Modulus, ShoupOperand};

#[cfg(feature = "std")]
use crate::complex::ComplexArithmetic;
#[cfg(feature = "std")]
use num_complex::Complex;

/// Largest supported transform size exponent; n = 2^17 is the largest ring
/// degree the enclosing schemes use.
pub const MAX_LOG_N: usize = 17;

/// Reverses the low `bits` bits of `x`.
pub fn reverse_bits(x: usize, bits: usize) -> usize {
    if bits == 0 {
        0
    } else {
        x.reverse_bits() >> (usize::BITS as usize - bits)
    }
}

/// Precomputed NTT tables for one (modulus, degree) pair.
///
/// Built once and reused immutably across many transform calls; the value
/// buffers passed to [`Self::forward`] and [`Self::inverse`] stay owned by
/// the caller.
#[derive(Debug, Clone)]
pub struct NttTables {
    modulus: Modulus,
    log_n: usize,
    root: u64,
    inv_root: u64,
    root_powers: Vec<ShoupOperand>,
    inv_root_powers: Vec<ShoupOperand>,
    inv_degree: ShoupOperand,
    handler: DwtHandler<ModularArithmetic>,
}

impl NttTables {
    /// Builds tables for degree `n = 2^log_n` over the given modulus.
    ///
    /// Fails if `log_n` exceeds [`MAX_LOG_N`], if the modulus is not prime,
    /// or if `q != 1 (mod 2n)` so no primitive 2n-th root of unity exists.
    pub fn new(log_n: usize, modulus: Modulus) -> Result<Self> {
        if log_n > MAX_LOG_N {
            return Err(Error::param(
                "log_n",
                alloc::format!("must be at most {}", MAX_LOG_N),
            ));
        }
        let n = 1usize << log_n;
        let q = modulus.value();
        if !is_prime(q) {
            return Err(Error::param("modulus", "must be prime"));
        }
        if (q - 1) % (2 * n as u64) != 0 {
            return Err(Error::param(
                "modulus",
                "must be congruent to 1 modulo 2n for a primitive 2n-th root to exist",
            ));
        }

        let root = find_primitive_2nth_root(&modulus, n as u64)?;
        let inv_root = modulus.inv(root)?;

        // Forward: psi^i lands in slot reverse_bits(i), so a sequential read
        // visits bit-reversed powers.
        let mut root_powers = vec![ShoupOperand::new(1, &modulus); n];
        let mut power = root;
        for i in 1..n {
            root_powers[reverse_bits(i, log_n)] = ShoupOperand::new(power, &modulus);
            power = modulus.mul(power, root);
        }

        // Inverse: psi^-i lands in slot reverse_bits(i - 1) + 1, the order
        // the inverse stages consume.
        let mut inv_root_powers = vec![ShoupOperand::new(1, &modulus); n];
        let mut power = inv_root;
        for i in 1..n {
            inv_root_powers[reverse_bits(i - 1, log_n) + 1] = ShoupOperand::new(power, &modulus);
            power = modulus.mul(power, inv_root);
        }

        let inv_degree = ShoupOperand::new(modulus.inv(n as u64)?, &modulus);
        let handler = DwtHandler::new(ModularArithmetic::new(&modulus));

        Ok(Self {
            modulus,
            log_n,
            root,
            inv_root,
            root_powers,
            inv_root_powers,
            inv_degree,
            handler,
        })
    }

    /// The modulus these tables were built for.
    pub fn modulus(&self) -> &Modulus {
        &self.modulus
    }

    /// Log base 2 of the transform size.
    pub fn log_n(&self) -> usize {
        self.log_n
    }

    /// The transform size n.
    pub fn size(&self) -> usize {
        1 << self.log_n
    }

    /// The primitive 2n-th root of unity the tables are built from.
    pub fn root(&self) -> u64 {
        self.root
    }

    /// The inverse of [`Self::root`].
    pub fn inv_root(&self) -> u64 {
        self.inv_root
    }

    /// Forward root table, bit-reversed order. Slot 0 is a placeholder.
    pub fn root_powers(&self) -> &[ShoupOperand] {
        &self.root_powers
    }

    /// Inverse root table, normal order. Slot 0 is a placeholder.
    pub fn inv_root_powers(&self) -> &[ShoupOperand] {
        &self.inv_root_powers
    }

    /// `n^-1 mod q` in Shoup form, the scalar fused into the inverse.
    pub fn inv_degree(&self) -> ShoupOperand {
        self.inv_degree
    }

    /// The kernel instance bound to this modulus.
    pub fn handler(&self) -> &DwtHandler<ModularArithmetic> {
        &self.handler
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len != self.size() {
            return Err(Error::Length {
                context: "transform values",
                expected: self.size(),
                actual: len,
            });
        }
        Ok(())
    }

    /// Forward NTT, natural order in, bit-reversed order out, outputs left
    /// lazy in `[0, 4q)`. Inputs must be in `[0, 4q)`.
    pub fn forward_lazy(&self, values: &mut [u64]) -> Result<()> {
        self.check_len(values.len())?;
        self.handler
            .transform_to_rev(values, self.log_n, &self.root_powers, None);
        Ok(())
    }

    /// Forward NTT with outputs reduced to canonical form in `[0, q)`.
    pub fn forward(&self, values: &mut [u64]) -> Result<()> {
        self.forward_lazy(values)?;
        for v in values.iter_mut() {
            *v = self.modulus.reduce(*v);
        }
        Ok(())
    }

    /// Inverse NTT with the `1/n` normalization fused into the last stage,
    /// bit-reversed order in, natural order out, outputs lazy in `[0, 2q)`.
    /// Inputs must be in `[0, 2q)`.
    pub fn inverse_lazy(&self, values: &mut [u64]) -> Result<()> {
        self.check_len(values.len())?;
        self.handler.transform_from_rev(
            values,
            self.log_n,
            &self.inv_root_powers,
            Some(self.inv_degree),
        );
        Ok(())
    }

    /// Inverse NTT with outputs reduced to canonical form in `[0, q)`.
    pub fn inverse(&self, values: &mut [u64]) -> Result<()> {
        self.inverse_lazy(values)?;
        for v in values.iter_mut() {
            *v = self.modulus.reduce(*v);
        }
        Ok(())
    }
}

/// Finds a primitive 2n-th root of unity modulo a prime q with
/// `q = 1 (mod 2n)`.
///
/// Deterministic: walks candidates x = 2, 3, ... and keeps
/// `g = x^((q-1)/2n)`, which has order exactly 2n iff `g^n = -1`. Half of
/// all x qualify, so the walk terminates almost immediately; the cap only
/// guards the error path.
fn find_primitive_2nth_root(modulus: &Modulus, n: u64) -> Result<u64> {
    let q = modulus.value();
    let exponent = (q - 1) / (2 * n);
    for x in 2..4096u64.min(q) {
        let g = modulus.pow(x, exponent);
        if modulus.pow(g, n) == q - 1 {
            return Ok(g);
        }
    }
    Err(Error::param(
        "modulus",
        "no primitive 2n-th root of unity found",
    ))
}

/// Precomputed complex FFT tables for one degree.
///
/// The floating counterpart of [`NttTables`]: same two orderings, the
/// primitive 2n-th root being `e^(i*pi/n)`. Powers are computed directly
/// from polar form rather than by repeated multiplication, which keeps the
/// table accurate at large n.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct FftTables {
    log_n: usize,
    root_powers: Vec<Complex<f64>>,
    inv_root_powers: Vec<Complex<f64>>,
    inv_degree: f64,
    handler: DwtHandler<ComplexArithmetic>,
}

#[cfg(feature = "std")]
impl FftTables {
    /// Builds tables for degree `n = 2^log_n`.
    pub fn new(log_n: usize) -> Result<Self> {
        if log_n > MAX_LOG_N {
            return Err(Error::param(
                "log_n",
                alloc::format!("must be at most {}", MAX_LOG_N),
            ));
        }
        let n = 1usize << log_n;
        let angle = core::f64::consts::PI / n as f64;

        let mut root_powers = vec![Complex::new(1.0, 0.0); n];
        for i in 1..n {
            // Slot i holds psi^reverse_bits(i), each power taken straight
            // from polar form rather than by an iterated product.
            let k = reverse_bits(i, log_n);
            root_powers[i] = Complex::from_polar(1.0, angle * k as f64);
        }

        let mut inv_root_powers = vec![Complex::new(1.0, 0.0); n];
        for i in 1..n {
            inv_root_powers[reverse_bits(i - 1, log_n) + 1] =
                Complex::from_polar(1.0, -angle * i as f64);
        }

        Ok(Self {
            log_n,
            root_powers,
            inv_root_powers,
            inv_degree: 1.0 / n as f64,
            handler: DwtHandler::new(ComplexArithmetic),
        })
    }

    /// Log base 2 of the transform size.
    pub fn log_n(&self) -> usize {
        self.log_n
    }

    /// The transform size n.
    pub fn size(&self) -> usize {
        1 << self.log_n
    }

    /// Forward root table, bit-reversed order. Slot 0 is a placeholder.
    pub fn root_powers(&self) -> &[Complex<f64>] {
        &self.root_powers
    }

    /// Inverse root table, normal order. Slot 0 is a placeholder.
    pub fn inv_root_powers(&self) -> &[Complex<f64>] {
        &self.inv_root_powers
    }

    /// The kernel instance for the complex strategy.
    pub fn handler(&self) -> &DwtHandler<ComplexArithmetic> {
        &self.handler
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len != self.size() {
            return Err(Error::Length {
                context: "transform values",
                expected: self.size(),
                actual: len,
            });
        }
        Ok(())
    }

    /// Forward FFT, natural order in, bit-reversed order out.
    pub fn forward(&self, values: &mut [Complex<f64>]) -> Result<()> {
        self.check_len(values.len())?;
        self.handler
            .transform_to_rev(values, self.log_n, &self.root_powers, None);
        Ok(())
    }

    /// Inverse FFT with the `1/n` normalization fused into the last stage,
    /// bit-reversed order in, natural order out.
    pub fn inverse(&self, values: &mut [Complex<f64>]) -> Result<()> {
        self.check_len(values.len())?;
        self.handler.transform_from_rev(
            values,
            self.log_n,
            &self.inv_root_powers,
            Some(self.inv_degree),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests;
