//! Generic discrete weighted transform kernel
//!
//! The discrete weighted transform (DWT) is a variation on the discrete
//! Fourier transform over arbitrary rings: the input is weighed element-wise
//! before the transform so that pointwise multiplication of transformed
//! vectors realizes *negacyclic* convolution, i.e. polynomial multiplication
//! modulo `x^n + 1`. A DFT of size `n` needs a primitive n-th root of unity;
//! the negacyclic DWT needs a primitive 2n-th root ψ, and the weighing by
//! powers of ψ is folded into the root tables so no separate weighing pass
//! runs.
//!
//! The kernel below follows algorithms 1 and 2 of Longa and Naehrig
//! (<https://eprint.iacr.org/2016/504.pdf>), generalized over an injected
//! [`Arithmetic`] strategy so the same code backs both the integer NTT and
//! the complex FFT. Two further deviations from the paper: the inverse
//! transform stores its root powers in normal order rather than bit-reversed
//! order, so both directions consume their table through a single
//! monotonically incrementing cursor; and the optional `1/n` normalization is
//! merged into the last butterfly stage, saving a full pass over the buffer.
//!
//! The kernel performs no validation and no allocation. Power-of-two size,
//! table length and ordering convention are caller contracts; the
//! [`crate::tables`] layer enforces them before this code runs.

/// Ring arithmetic required to specialize the transform kernel.
///
/// An implementation is a stateless value supplying the six elementary
/// operations the butterfly loops compose. All operations must be free of
/// side effects so that one strategy value may serve concurrent transform
/// calls on disjoint buffers.
///
/// The three associated types give the strategy room to pick different
/// representations: `Root` is typically a precomputed fast-multiplication
/// form of a ring element (Shoup form for the modular variant), not the
/// element itself.
pub trait Arithmetic: Clone {
    /// Element of the ring being transformed.
    type Value: Copy;
    /// Twisting factor applied during a butterfly.
    type Root: Copy;
    /// Normalization factor fused into the final stage.
    type Scalar: Copy;

    /// Ring addition. May leave the result unreduced; see [`Self::guard`].
    fn add(&self, a: Self::Value, b: Self::Value) -> Self::Value;

    /// Ring subtraction. May leave the result unreduced.
    fn sub(&self, a: Self::Value, b: Self::Value) -> Self::Value;

    /// Multiplies a value by a twisting factor.
    fn mul_root(&self, a: Self::Value, r: Self::Root) -> Self::Value;

    /// Multiplies a value by the normalization scalar.
    fn mul_scalar(&self, a: Self::Value, s: Self::Scalar) -> Self::Value;

    /// Combines a root and the scalar into one root, so a later
    /// [`Self::mul_root`] with the combined root applies the scalar for free.
    fn mul_root_scalar(&self, r: Self::Root, s: Self::Scalar) -> Self::Root;

    /// Bounds representation growth from repeated unreduced additions and
    /// subtractions: a partial modular reduction for integer strategies, the
    /// identity for floating ones. Each strategy documents the exact
    /// magnitude bound it maintains between two `guard` calls.
    fn guard(&self, a: Self::Value) -> Self::Value;
}

/// In-place DWT engine specialized by an [`Arithmetic`] strategy.
///
/// The handler holds only the strategy value and is immutable after
/// construction, so one instance may be shared freely across threads as long
/// as concurrent calls operate on disjoint value buffers.
#[derive(Clone, Debug)]
pub struct DwtHandler<A: Arithmetic> {
    arithmetic: A,
}

impl<A: Arithmetic> DwtHandler<A> {
    /// Builds a handler from one arithmetic strategy value.
    pub fn new(arithmetic: A) -> Self {
        Self { arithmetic }
    }

    /// Forward transform: natural order in, bit-reversed order out.
    ///
    /// Decimation in frequency. `values` must hold exactly `2^log_n`
    /// elements and `roots` exactly `2^log_n` entries ordered so that a
    /// sequential read visits the bit-reversed powers of the principal root
    /// stage by stage; entries `1..n-1` are each consumed exactly once and
    /// entry 0 is never read. If `scalar` is present it is fused into the
    /// last stage instead of running as a separate pass.
    ///
    /// Mismatched `log_n`, buffer and table lengths are not detected here;
    /// they produce out-of-bounds panics or silently wrong results.
    pub fn transform_to_rev(
        &self,
        values: &mut [A::Value],
        log_n: usize,
        roots: &[A::Root],
        scalar: Option<A::Scalar>,
    ) {
        debug_assert_eq!(values.len(), 1usize << log_n);
        debug_assert_eq!(roots.len(), 1usize << log_n);

        if log_n == 0 {
            // No butterflies at n = 1; only the normalization applies.
            if let Some(s) = scalar {
                values[0] = self.arithmetic.mul_scalar(self.arithmetic.guard(values[0]), s);
            }
            return;
        }

        let mut root_index = 1usize;
        for log_m in 0..log_n - 1 {
            let m = 1usize << log_m;
            let gap = 1usize << (log_n - log_m - 1);
            for i in 0..m {
                // This is in fact always roots[m + i].
                let r = roots[root_index];
                root_index += 1;
                let offset = i << (log_n - log_m);
                for j in offset..offset + gap {
                    let u = self.arithmetic.guard(values[j]);
                    let v = self.arithmetic.mul_root(values[j + gap], r);
                    values[j] = self.arithmetic.add(u, v);
                    values[j + gap] = self.arithmetic.sub(u, v);
                }
            }
        }

        // Last stage, gap = 1: same butterfly, with the optional scalar
        // absorbed into the root once per group.
        let log_m = log_n - 1;
        let m = 1usize << log_m;
        match scalar {
            Some(s) => {
                for i in 0..m {
                    let r = roots[root_index];
                    root_index += 1;
                    let scaled_r = self.arithmetic.mul_root_scalar(r, s);
                    let j = i << (log_n - log_m);
                    let u = self
                        .arithmetic
                        .mul_scalar(self.arithmetic.guard(values[j]), s);
                    let v = self.arithmetic.mul_root(values[j + 1], scaled_r);
                    values[j] = self.arithmetic.add(u, v);
                    values[j + 1] = self.arithmetic.sub(u, v);
                }
            }
            None => {
                for i in 0..m {
                    let r = roots[root_index];
                    root_index += 1;
                    let j = i << (log_n - log_m);
                    let u = self.arithmetic.guard(values[j]);
                    let v = self.arithmetic.mul_root(values[j + 1], r);
                    values[j] = self.arithmetic.add(u, v);
                    values[j + 1] = self.arithmetic.sub(u, v);
                }
            }
        }
    }

    /// Inverse transform: bit-reversed order in, natural order out.
    ///
    /// Decimation in time, stages running in the opposite direction, with
    /// the same sequential root-cursor discipline against a table in normal
    /// inverse order (not interchangeable with the forward table). The
    /// optional scalar, typically `1/n`, is fused into the final
    /// half-and-half stage. Same caller contracts as
    /// [`Self::transform_to_rev`].
    pub fn transform_from_rev(
        &self,
        values: &mut [A::Value],
        log_n: usize,
        roots: &[A::Root],
        scalar: Option<A::Scalar>,
    ) {
        debug_assert_eq!(values.len(), 1usize << log_n);
        debug_assert_eq!(roots.len(), 1usize << log_n);

        if log_n == 0 {
            if let Some(s) = scalar {
                values[0] = self.arithmetic.mul_scalar(self.arithmetic.guard(values[0]), s);
            }
            return;
        }

        let mut root_index = 1usize;
        for log_m in (1..log_n).rev() {
            let m = 1usize << log_m;
            let gap = 1usize << (log_n - log_m - 1);
            for i in 0..m {
                // Unlike the forward direction, this index has no closed form.
                let r = roots[root_index];
                root_index += 1;
                let offset = i << (log_n - log_m);
                for j in offset..offset + gap {
                    let u = values[j];
                    let v = values[j + gap];
                    values[j] = self.arithmetic.guard(self.arithmetic.add(u, v));
                    values[j + gap] = self.arithmetic.mul_root(self.arithmetic.sub(u, v), r);
                }
            }
        }

        // Last stage, gap = n/2: the buffer split in half, one root for the
        // whole stage. This is where the scalar reaches every output.
        let gap = 1usize << (log_n - 1);
        // This is roots[n - 1], the last entry of the table.
        let r = roots[root_index];
        match scalar {
            Some(s) => {
                let scaled_r = self.arithmetic.mul_root_scalar(r, s);
                for j in 0..gap {
                    let u = self.arithmetic.guard(values[j]);
                    let v = values[j + gap];
                    values[j] = self
                        .arithmetic
                        .mul_scalar(self.arithmetic.guard(self.arithmetic.add(u, v)), s);
                    values[j + gap] =
                        self.arithmetic.mul_root(self.arithmetic.sub(u, v), scaled_r);
                }
            }
            None => {
                for j in 0..gap {
                    let u = values[j];
                    let v = values[j + gap];
                    values[j] = self.arithmetic.guard(self.arithmetic.add(u, v));
                    values[j + gap] = self.arithmetic.mul_root(self.arithmetic.sub(u, v), r);
                }
            }
        }
    }
}
