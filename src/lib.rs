//!  __splitfit__ fits non-negative edge weights to phylogenetic split
//! networks by constrained least squares.  At its core is an active-set
//! solver for the problem
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & \frac{1}{2}x^T A x - x^T b\\\\\[2ex\]
//!  \text{subject to} & x \ge 0
//!  \end{array}
//! $$
//!
//! with $A = X^TX$ symmetric positive definite and $b = X^Ty$, built on a
//! Cholesky factorization that is updated in place as variables enter and
//! leave the active set.
//!
//! ## Modules
//!
//! * [`cholesky`]: [`MaskedCholesky`](cholesky::MaskedCholesky), a Cholesky
//!   factorization of the principal submatrices of a fixed matrix, with
//!   single row masking (Givens downdate) and unmasking (row append).
//!
//! * [`solver`]: the [`ActiveSetSolver`](solver::ActiveSetSolver) and its
//!   settings, solution and progress reporting types.
//!
//! * [`leastsquares`]: forms weighted normal equations from a design matrix
//!   and observed distances, and fits the weights.
//!
//! * [`algebra`]: the float traits and dense matrix type used throughout.
//!
//! # Example
//!
//! ```
//! use splitfit::algebra::*;
//! use splitfit::solver::*;
//!
//! let XtX = Matrix::from(&[
//!     [2., 0., 0.], //
//!     [0., 2., 0.], //
//!     [0., 0., 2.], //
//! ]);
//! let Xty = [1., -1., 1.];
//!
//! let settings = ActiveSetSettings::default();
//! let mut solver = ActiveSetSolver::new(&XtX, &Xty, settings).unwrap();
//! solver.solve().unwrap();
//!
//! assert_eq!(solver.solution.status, SolverStatus::Solved);
//! let x = solver.get_soln();
//! assert!(x.norm_inf_diff(&[0.5, 0., 0.5]) < 1e-12);
//! ```

//Rust hates greek characters
#![allow(confusable_idents)]

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod algebra;
pub mod cholesky;
pub mod io;
pub mod leastsquares;
pub mod solver;
