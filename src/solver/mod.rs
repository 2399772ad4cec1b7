//! Active-set solver for non-negative least squares.
//!
//! The solver takes the normal equations $X^TX$ and $X^Ty$ of a least
//! squares problem and finds the minimizer of $\|Xw - y\|^2$ subject to
//! $w \ge 0$, or equivalently of $\frac{1}{2}w^TX^TXw - w^TX^Ty$.
//!
//! Problems are configured with [`ActiveSetSettings`], solved with
//! [`ActiveSetSolver::solve`] and their results reported in an
//! [`ActiveSetSolution`].  [`solve_nonnegative`] wraps the whole sequence
//! for callers that only need the weights.

mod info;
mod settings;
mod solution;
#[allow(clippy::module_inception)]
mod solver;

#[cfg(feature = "serde")]
mod json;

pub use info::*;
pub use settings::*;
pub use solution::*;
pub use solver::*;

#[cfg(feature = "serde")]
pub use json::*;
