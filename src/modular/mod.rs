//! Integer modular arithmetic backing the number-theoretic transform
//!
//! Word-sized modular arithmetic in the style of Harvey's lazy NTT: values
//! travel through the butterfly stages only partially reduced, roots carry a
//! precomputed Shoup quotient so the hot multiply needs one widening multiply
//! and no division, and full reduction happens once at the consumer layer.

use crate::dwt::Arithmetic;
use crate::error::{Error, Result};

/// A word-sized modulus for NTT coefficient arithmetic.
///
/// The value is restricted to `2 <= q < 2^62` so that the lazy discipline of
/// [`ModularArithmetic`] never overflows 64 bits (all intermediates stay
/// below `4q`). Primality is not checked here; the table-construction layer
/// requires it and validates it separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modulus {
    value: u64,
}

/// Largest admissible modulus bit count.
pub const MODULUS_MAX_BITS: u32 = 62;

impl Modulus {
    /// Creates a modulus, validating the admissible range.
    pub fn new(value: u64) -> Result<Self> {
        if value < 2 {
            return Err(Error::param("modulus", "must be at least 2"));
        }
        if value >> MODULUS_MAX_BITS != 0 {
            return Err(Error::param(
                "modulus",
                "must be less than 2^62 to leave lazy-reduction headroom",
            ));
        }
        Ok(Self { value })
    }

    /// Returns the modulus value q.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Modular addition of canonical (fully reduced) operands.
    pub fn add(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.value && b < self.value);
        let t = a + b;
        let mask = ((t >= self.value) as u64).wrapping_neg();
        t - (self.value & mask)
    }

    /// Modular subtraction of canonical operands.
    pub fn sub(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.value && b < self.value);
        let (t, borrow) = a.overflowing_sub(b);
        t.wrapping_add(self.value & (borrow as u64).wrapping_neg())
    }

    /// Modular multiplication via a 128-bit intermediate. Not the hot path;
    /// the transform uses Shoup multiplication instead.
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        ((a as u128 * b as u128) % self.value as u128) as u64
    }

    /// Modular exponentiation by square and multiply.
    pub fn pow(&self, mut base: u64, mut exp: u64) -> u64 {
        base %= self.value;
        let mut acc: u64 = 1 % self.value;
        while exp != 0 {
            if exp & 1 == 1 {
                acc = self.mul(acc, base);
            }
            base = self.mul(base, base);
            exp >>= 1;
        }
        acc
    }

    /// Modular inverse by Fermat's little theorem, so q must be prime.
    /// Returns an error for a zero residue.
    pub fn inv(&self, a: u64) -> Result<u64> {
        if a % self.value == 0 {
            return Err(Error::param("inverse", "zero has no modular inverse"));
        }
        Ok(self.pow(a, self.value - 2))
    }

    /// Brings a lazy value in `[0, 4q)` back to canonical form in `[0, q)`.
    pub fn reduce(&self, a: u64) -> u64 {
        debug_assert!(a < 4 * self.value);
        let two_q = self.value << 1;
        let mask = ((a >= two_q) as u64).wrapping_neg();
        let t = a - (two_q & mask);
        let mask = ((t >= self.value) as u64).wrapping_neg();
        t - (self.value & mask)
    }
}

/// Deterministic Miller-Rabin primality test for 64-bit integers.
///
/// The fixed base set below is known to be exact for all inputs up to
/// 3.3 * 10^24, which covers the full u64 range.
pub fn is_prime(n: u64) -> bool {
    const BASES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

    if n < 2 {
        return false;
    }
    for p in BASES {
        if n == p {
            return true;
        }
        if n % p == 0 {
            return false;
        }
    }

    let mulmod = |a: u64, b: u64| ((a as u128 * b as u128) % n as u128) as u64;
    let powmod = |mut base: u64, mut exp: u64| {
        let mut acc = 1u64;
        base %= n;
        while exp != 0 {
            if exp & 1 == 1 {
                acc = mulmod(acc, base);
            }
            base = mulmod(base, base);
            exp >>= 1;
        }
        acc
    };

    let mut d = n - 1;
    let s = d.trailing_zeros();
    d >>= s;

    'witness: for a in BASES {
        let mut x = powmod(a, d);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mulmod(x, x);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// A ring element in Shoup form: the element together with the precomputed
/// word-sized quotient `floor(operand * 2^64 / q)`.
///
/// Multiplying an arbitrary 64-bit value by a Shoup operand costs two
/// multiplies and one subtraction and lands in `[0, 2q)` without any
/// division. This is the `Root` (and `Scalar`) representation consumed by
/// the transform kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShoupOperand {
    operand: u64,
    quotient: u64,
}

impl ShoupOperand {
    /// Precomputes the Shoup quotient for a canonical element.
    pub fn new(operand: u64, modulus: &Modulus) -> Self {
        debug_assert!(operand < modulus.value());
        let quotient = (((operand as u128) << 64) / modulus.value() as u128) as u64;
        Self { operand, quotient }
    }

    /// The underlying canonical element.
    pub fn operand(&self) -> u64 {
        self.operand
    }

    /// Lazy Shoup multiplication: `a * operand mod q`, in `[0, 2q)`.
    #[inline(always)]
    pub fn mul_lazy(&self, a: u64, q: u64) -> u64 {
        let q_hat = ((a as u128 * self.quotient as u128) >> 64) as u64;
        a.wrapping_mul(self.operand)
            .wrapping_sub(q_hat.wrapping_mul(q))
    }
}

/// Lazy modular arithmetic strategy for the NTT.
///
/// Lazy-reduction contract, the bound the kernel's `guard` discipline relies
/// on (with `q < 2^62` so `4q < 2^64`):
///
/// - forward transform: inputs may be anywhere in `[0, 4q)`; every
///   intermediate and output stays in `[0, 4q)`. `guard` is applied to the
///   upper butterfly operand before it is combined, bringing it under `2q`,
///   and the twisted operand leaves Shoup multiplication under `2q`, so
///   `add`/`sub` peak below `4q`.
/// - inverse transform: inputs must be in `[0, 2q)`; outputs are in
///   `[0, 2q)`.
///
/// Consumers call [`Modulus::reduce`] on the outputs when canonical values
/// are needed. Violating the input bounds corrupts results silently, which
/// is why the bounds here are pinned and tested rather than inferred.
#[derive(Debug, Clone, Copy)]
pub struct ModularArithmetic {
    modulus: u64,
    two_times_modulus: u64,
}

impl ModularArithmetic {
    /// Builds the strategy for one modulus.
    pub fn new(modulus: &Modulus) -> Self {
        Self {
            modulus: modulus.value(),
            two_times_modulus: modulus.value() << 1,
        }
    }

    /// The modulus q this strategy reduces against.
    pub fn modulus(&self) -> u64 {
        self.modulus
    }
}

impl Arithmetic for ModularArithmetic {
    type Value = u64;
    type Root = ShoupOperand;
    type Scalar = ShoupOperand;

    #[inline(always)]
    fn add(&self, a: u64, b: u64) -> u64 {
        a + b
    }

    #[inline(always)]
    fn sub(&self, a: u64, b: u64) -> u64 {
        a + self.two_times_modulus - b
    }

    #[inline(always)]
    fn mul_root(&self, a: u64, r: ShoupOperand) -> u64 {
        r.mul_lazy(a, self.modulus)
    }

    #[inline(always)]
    fn mul_scalar(&self, a: u64, s: ShoupOperand) -> u64 {
        s.mul_lazy(a, self.modulus)
    }

    #[inline(always)]
    fn mul_root_scalar(&self, r: ShoupOperand, s: ShoupOperand) -> ShoupOperand {
        // The combined root must be canonical again so its Shoup quotient
        // stays valid.
        let t = s.mul_lazy(r.operand, self.modulus);
        let mask = ((t >= self.modulus) as u64).wrapping_neg();
        let operand = t - (self.modulus & mask);
        let quotient = (((operand as u128) << 64) / self.modulus as u128) as u64;
        ShoupOperand { operand, quotient }
    }

    #[inline(always)]
    fn guard(&self, a: u64) -> u64 {
        let mask = ((a >= self.two_times_modulus) as u64).wrapping_neg();
        a - (self.two_times_modulus & mask)
    }
}
