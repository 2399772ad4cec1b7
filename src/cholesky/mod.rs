//! Cholesky factorization with maskable rows.
//!
//! [`MaskedCholesky`] maintains the factor of the principal submatrix of a
//! fixed symmetric positive definite matrix induced by a changing set of
//! active indices.  Masking or unmasking a single index costs $O(n^2)$ and
//! $O(n)$ row operations respectively, which makes it the linear algebra
//! primitive of the [active-set solver](crate::solver::ActiveSetSolver).

mod indexmap;
mod masked;
pub use masked::{CholeskyError, MaskedCholesky};

#[cfg(test)]
mod test;
