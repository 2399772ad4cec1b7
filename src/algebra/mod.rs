//! Linear algebra primitives for the factorization engine and the solver.
//!
//! All values are generic over [`FloatT`], with dense matrices stored in
//! column major format as [`Matrix`].

mod adjoint;
mod dense;
mod floats;
mod math_traits;
mod matrix_traits;
mod matrix_types;
mod vecmath;

pub use floats::*;
pub use math_traits::*;
pub use matrix_traits::*;
pub use matrix_types::*;
