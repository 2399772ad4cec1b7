//! Weighted least squares fitting of non-negative split weights.
//!
//! A split network assigns a length $w_j \ge 0$ to each split $j$.  The
//! network distance between taxa $a$ and $b$ is the sum of the lengths of the
//! splits separating them, so the distances of all pairs are $Xw$ for a 0/1
//! design matrix $X$ with one row per taxon pair and one column per split.
//! Given observed distances $y$ the weights are fitted by minimizing
//!
//! $$
//! \sum_k v_k \left( (Xw)_k - y_k \right)^2 \quad \text{subject to} \quad w \ge 0,
//! $$
//!
//! with per-pair weights $v_k$ chosen by a [`VarianceModel`].  The problem is
//! reduced to its normal equations $X^TVX$, $X^TVy$ and handed to the
//! [active-set solver](crate::solver::ActiveSetSolver).

#![allow(non_snake_case)]

use crate::algebra::*;
use crate::solver::{ActiveSetSettings, ActiveSetSolver, SolverError, SolverStatus};
use thiserror::Error;

/// Error type returned by [`fit_weights`](fit_weights)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LeastSquaresError {
    /// number of observations differs from the number of design matrix rows
    #[error("Design matrix has {rows} rows but {observations} observations were given")]
    IncompatibleDimension { rows: usize, observations: usize },
    /// design matrix has no columns
    #[error("Design matrix has no columns")]
    EmptyDesign,
    /// the active-set solver failed
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
}

/// Per-observation weighting of the squared residuals
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VarianceModel {
    /// ordinary least squares, every observation has weight 1
    #[default]
    Ols,
    /// Fitch-Margoliash weighting with variance proportional to the
    /// distance, weight $1/y$
    FitchMargoliash1,
    /// Fitch-Margoliash weighting with variance proportional to the
    /// squared distance, weight $1/y^2$
    FitchMargoliash2,
}

impl VarianceModel {
    /// weight of an observation with value `y`.  Observations that are
    /// not strictly positive always get weight 1.
    pub fn weight<T: FloatT>(&self, y: T) -> T {
        if !(y > T::zero()) {
            return T::one();
        }
        match self {
            VarianceModel::Ols => T::one(),
            VarianceModel::FitchMargoliash1 => T::recip(y),
            VarianceModel::FitchMargoliash2 => T::recip(y * y),
        }
    }
}

impl std::fmt::Display for VarianceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Normal equations $X^TVX$, $X^TVy$ of a weighted least squares problem
#[derive(Debug, Clone)]
pub struct NormalEquations<T = f64> {
    pub XtX: Matrix<T>,
    pub Xty: Vec<T>,
}

impl<T> NormalEquations<T>
where
    T: FloatT,
{
    /// Form the normal equations of the design matrix `X` and the
    /// observations `y` weighted according to `model`.
    pub fn new(X: &Matrix<T>, y: &[T], model: VarianceModel) -> Result<Self, LeastSquaresError> {
        check_dimensions(X, y)?;

        let v: Vec<T> = y.iter().map(|&yk| model.weight(yk)).collect();

        // VX and Vy
        let mut VX = X.clone();
        VX.lscale(&v);
        let mut Vy = y.to_vec();
        Vy.hadamard(&v);

        let n = X.ncols();
        let mut XtX = Matrix::zeros((n, n));
        XtX.mul(&X.t(), &VX, T::one(), T::zero());

        let mut Xty = vec![T::zero(); n];
        X.t().gemv(&Vy, &mut Xty, T::one(), T::zero());

        Ok(Self { XtX, Xty })
    }

    /// number of unknowns
    pub fn dim(&self) -> usize {
        self.Xty.len()
    }
}

/// Result of [`fit_weights`](fit_weights)
#[derive(Debug, Clone)]
pub struct WeightFit<T = f64> {
    /// fitted non-negative weights, one per design matrix column
    pub weights: Vec<T>,
    /// weighted residual sum of squares $\sum_k v_k ((Xw)_k - y_k)^2$
    pub rss: T,
    /// termination status of the active-set solver
    pub status: SolverStatus,
}

/// Fit non-negative weights `w` minimizing the weighted residual
/// $\|Xw - y\|^2_V$.
///
/// With `settings.constrain = false` the unconstrained fit is computed and
/// its negative entries set to zero instead.
pub fn fit_weights<T>(
    X: &Matrix<T>,
    y: &[T],
    model: VarianceModel,
    settings: ActiveSetSettings<T>,
) -> Result<WeightFit<T>, LeastSquaresError>
where
    T: FloatT,
{
    let eqs = NormalEquations::new(X, y, model)?;
    log::debug!(
        "fitting {} weights to {} observations with {} weighting",
        eqs.dim(),
        y.len(),
        model
    );

    let mut solver = ActiveSetSolver::new(&eqs.XtX, &eqs.Xty, settings)?;
    solver.solve()?;

    let weights = solver.solution.x;
    let rss = weighted_rss(X, y, &weights, model);
    Ok(WeightFit {
        weights,
        rss,
        status: solver.solution.status,
    })
}

/// Weighted residual sum of squares of the weights `w`
pub fn weighted_rss<T: FloatT>(X: &Matrix<T>, y: &[T], w: &[T], model: VarianceModel) -> T {
    // r = Xw - y
    let mut r = y.to_vec();
    X.gemv(w, &mut r, T::one(), -T::one());

    r.iter()
        .zip(y)
        .fold(T::zero(), |acc, (&rk, &yk)| acc + model.weight(yk) * rk * rk)
}

fn check_dimensions<T: FloatT>(X: &Matrix<T>, y: &[T]) -> Result<(), LeastSquaresError> {
    if X.nrows() != y.len() {
        return Err(LeastSquaresError::IncompatibleDimension {
            rows: X.nrows(),
            observations: y.len(),
        });
    }
    if X.ncols() == 0 {
        return Err(LeastSquaresError::EmptyDesign);
    }
    Ok(())
}

#[test]
fn test_variance_weights() {
    assert_eq!(VarianceModel::Ols.weight(4.0), 1.0);
    assert_eq!(VarianceModel::FitchMargoliash1.weight(4.0), 0.25);
    assert_eq!(VarianceModel::FitchMargoliash2.weight(4.0), 0.0625);
    assert_eq!(VarianceModel::FitchMargoliash2.weight(0.0), 1.0);
    assert_eq!(VarianceModel::FitchMargoliash1.weight(-2.0), 1.0);
}

#[test]
fn test_normal_equations() {
    let X = Matrix::from(&[
        [1., 0.], //
        [1., 1.], //
        [0., 1.], //
    ]);
    let y = [1., 2., 4.];

    let eqs = NormalEquations::new(&X, &y, VarianceModel::Ols).unwrap();
    let XtX = Matrix::from(&[
        [2., 1.], //
        [1., 2.], //
    ]);
    assert_eq!(eqs.XtX, XtX);
    assert_eq!(eqs.Xty, vec![3., 6.]);

    let eqs = NormalEquations::new(&X, &y, VarianceModel::FitchMargoliash1).unwrap();
    let XtX = Matrix::from(&[
        [1.5, 0.5], //
        [0.5, 0.75], //
    ]);
    assert_eq!(eqs.XtX, XtX);
    assert_eq!(eqs.Xty, vec![2., 2.]);
}

#[test]
fn test_bad_dimensions() {
    let X = Matrix::<f64>::zeros((3, 2));
    assert_eq!(
        NormalEquations::new(&X, &[1., 2.], VarianceModel::Ols).unwrap_err(),
        LeastSquaresError::IncompatibleDimension {
            rows: 3,
            observations: 2
        }
    );

    let X = Matrix::<f64>::zeros((3, 0));
    assert_eq!(
        NormalEquations::new(&X, &[1., 2., 3.], VarianceModel::Ols).unwrap_err(),
        LeastSquaresError::EmptyDesign
    );
}
