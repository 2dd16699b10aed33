//! Negacyclic polynomial multiplication over Z_q[x]/(x^n + 1)
//!
//! The integer consumer of the transform kernel: polynomials are carried to
//! the NTT domain, multiplied pointwise, and carried back with the `1/n`
//! normalization fused into the inverse. A schoolbook reference
//! implementation is kept alongside for correctness testing.

use alloc::vec;
use alloc::vec::Vec;

use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::modular::Modulus;
use crate::tables::NttTables;

/// A polynomial in R_q = Z_q[x]/(x^n + 1), coefficients in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
pub struct Polynomial {
    /// Coefficients in standard representation, constant term first.
    pub coeffs: Vec<u64>,
}

impl Polynomial {
    /// Creates a zero polynomial of degree bound n.
    pub fn zero(n: usize) -> Self {
        Self {
            coeffs: vec![0; n],
        }
    }

    /// Creates a polynomial from coefficients, validating they are
    /// canonical for the given modulus.
    pub fn from_coeffs(coeffs: &[u64], modulus: &Modulus) -> Result<Self> {
        if coeffs.iter().any(|&c| c >= modulus.value()) {
            return Err(Error::param(
                "coeffs",
                "coefficients must be reduced modulo q",
            ));
        }
        Ok(Self {
            coeffs: coeffs.to_vec(),
        })
    }

    /// Number of coefficients.
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// Whether the polynomial has no coefficients.
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Coefficient-wise addition modulo q.
    pub fn add(&self, other: &Self, modulus: &Modulus) -> Result<Self> {
        check_same_len(self, other)?;
        let coeffs = self
            .coeffs
            .iter()
            .zip(other.coeffs.iter())
            .map(|(&a, &b)| modulus.add(a, b))
            .collect();
        Ok(Self { coeffs })
    }

    /// Coefficient-wise subtraction modulo q.
    pub fn sub(&self, other: &Self, modulus: &Modulus) -> Result<Self> {
        check_same_len(self, other)?;
        let coeffs = self
            .coeffs
            .iter()
            .zip(other.coeffs.iter())
            .map(|(&a, &b)| modulus.sub(a, b))
            .collect();
        Ok(Self { coeffs })
    }

    /// Multiplication by a ring scalar modulo q.
    pub fn scalar_mul(&self, scalar: u64, modulus: &Modulus) -> Self {
        let coeffs = self
            .coeffs
            .iter()
            .map(|&a| modulus.mul(a, scalar))
            .collect();
        Self { coeffs }
    }
}

fn check_same_len(a: &Polynomial, b: &Polynomial) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::Length {
            context: "polynomial operands",
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}

/// Pointwise product of two NTT-domain vectors, fully reduced.
pub fn dyadic_product(a: &[u64], b: &[u64], modulus: &Modulus, out: &mut [u64]) -> Result<()> {
    if a.len() != b.len() || a.len() != out.len() {
        return Err(Error::Length {
            context: "dyadic product operands",
            expected: a.len(),
            actual: b.len().min(out.len()),
        });
    }
    for ((o, &x), &y) in out.iter_mut().zip(a.iter()).zip(b.iter()) {
        *o = modulus.mul(x, y);
    }
    Ok(())
}

/// NTT-accelerated multiplication in R_q = Z_q[x]/(x^n + 1).
///
/// Both operands are transformed lazily, multiplied pointwise, and the
/// product is brought back through the inverse transform with the fused
/// `1/n` scalar. The result is fully reduced.
pub fn negacyclic_multiply(
    a: &Polynomial,
    b: &Polynomial,
    tables: &NttTables,
) -> Result<Polynomial> {
    let modulus = *tables.modulus();

    let mut ta = a.coeffs.clone();
    let mut tb = b.coeffs.clone();
    tables.forward_lazy(&mut ta)?;
    tables.forward_lazy(&mut tb)?;

    // Lazy forward outputs are in [0, 4q); the dyadic product reduces them
    // fully, which also restores the [0, 2q) bound the inverse requires.
    let mut product = vec![0u64; ta.len()];
    for ((o, &x), &y) in product.iter_mut().zip(ta.iter()).zip(tb.iter()) {
        *o = modulus.mul(modulus.reduce(x), modulus.reduce(y));
    }

    tables.inverse(&mut product)?;
    Ok(Polynomial { coeffs: product })
}

/// Schoolbook multiplication modulo `x^n + 1`, the O(n^2) reference the
/// fast path is tested against.
pub fn schoolbook_negacyclic(a: &Polynomial, b: &Polynomial, modulus: &Modulus) -> Result<Polynomial> {
    check_same_len(a, b)?;
    let n = a.len();
    let mut result = Polynomial::zero(n);
    for i in 0..n {
        for j in 0..n {
            let prod = modulus.mul(a.coeffs[i], b.coeffs[j]);
            let idx = i + j;
            if idx < n {
                result.coeffs[idx] = modulus.add(result.coeffs[idx], prod);
            } else {
                // x^n = -1 folds the upper half back with a sign flip.
                result.coeffs[idx - n] = modulus.sub(result.coeffs[idx - n], prod);
            }
        }
    }
    Ok(result)
}
