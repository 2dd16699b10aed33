//! Discrete weighted transform engine for homomorphic-encryption polynomial
//! arithmetic
//!
//! This crate implements the fast discrete weighted transform (DWT) and its
//! inverse, the in-place butterfly kernel that accelerates polynomial
//! multiplication and message batching inside homomorphic-encryption schemes.
//! The kernel is written once against a small ring-arithmetic trait and is
//! instantiated with two concrete strategies:
//!
//! - [`modular::ModularArithmetic`] for the number-theoretic transform (NTT)
//!   over integers modulo a prime, with Harvey-style lazy reduction;
//! - [`complex::ComplexArithmetic`] for the FFT over double-precision complex
//!   numbers, as used by approximate-arithmetic encoders.
//!
//! The kernel itself ([`dwt::DwtHandler`]) never allocates and never
//! validates its inputs; all validation happens in the table-construction
//! layer ([`tables`]), which must succeed before the kernel is ever invoked.
//! The library is designed to be usable in both `std` and `no_std`
//! environments; the complex half requires `std` for float transcendentals.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

extern crate alloc;

// Error module and re-exports
pub mod error;
pub use error::{Error, Result};

// Generic transform kernel
pub mod dwt;
pub use dwt::{Arithmetic, DwtHandler};

// Concrete arithmetic strategies
pub mod modular;
pub use modular::{Modulus, ModularArithmetic, ShoupOperand};

#[cfg(feature = "std")]
pub mod complex;
#[cfg(feature = "std")]
pub use complex::ComplexArithmetic;

// Root-of-unity table construction and validated transform entry points
pub mod tables;
pub use tables::NttTables;
#[cfg(feature = "std")]
pub use tables::FftTables;

// Negacyclic polynomial multiplication built on the NTT
pub mod poly;
pub use poly::Polynomial;

/// Prelude for easy importing of common types and traits.
pub mod prelude {
    pub use super::dwt::{Arithmetic, DwtHandler};
    pub use super::error::{Error, Result};
    pub use super::modular::{ModularArithmetic, Modulus, ShoupOperand};
    pub use super::poly::{negacyclic_multiply, Polynomial};
    pub use super::tables::{reverse_bits, NttTables};

    #[cfg(feature = "std")]
    pub use super::complex::ComplexArithmetic;
    #[cfg(feature = "std")]
    pub use super::tables::FftTables;
}
