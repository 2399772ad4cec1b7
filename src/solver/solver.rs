#![allow(non_snake_case)]
use super::*;
use crate::algebra::*;
use crate::cholesky::{CholeskyError, MaskedCholesky};
use crate::io::ConfigurablePrintTarget;
use itertools::izip;
use std::time::Instant;
use thiserror::Error;

// ---------------------------------
// Solver status type
// ---------------------------------

/// Status of solver at termination

#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// Problem is not solved (solver hasn't run).
    #[default]
    Unsolved,
    /// Solver terminated with a solution satisfying the optimality conditions.
    Solved,
    /// Iteration limit reached before the optimality conditions were met.
    MaxIterations,
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Error type returned by the [`ActiveSetSolver`](ActiveSetSolver)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Matrix and right hand side dimensions are incompatible
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    /// Settings failed validation
    #[error("Bad settings: {0}")]
    Settings(#[from] SettingsError),
    /// The factorization engine rejected an operation
    #[error("Factorization error: {0}")]
    Factorization(#[from] CholeskyError),
    /// An active variable has a nonzero gradient at a point where every
    /// masked variable is optimal.  This indicates a numerical failure
    /// rather than a property of the problem.
    #[error("Active variable {index} has gradient {gradient:e} at termination")]
    InconsistentActiveSet { index: usize, gradient: f64 },
}

// ---------------------------------
// active-set solver
// ---------------------------------

/// Solver for the non-negativity constrained quadratic program
///
/// $$
/// \begin{array}{rl}
/// \text{minimize} & \frac{1}{2}x^T A x - x^T b\\\\\[2ex\]
///  \text{subject to} & x \ge 0
///  \end{array}
/// $$
///
/// with $A$ symmetric positive definite, i.e. the normal equations
/// $A = X^TX$, $b = X^Ty$ of a non-negative least squares fit.
///
/// Variables that would become negative are masked (fixed at zero) and
/// masked variables whose gradient is negative are unmasked again, with a
/// single [`MaskedCholesky`] factorization updated in place throughout.
pub struct ActiveSetSolver<T: FloatT = f64> {
    pub(crate) XtX: Matrix<T>,
    pub(crate) Xty: Vec<T>,
    pub settings: ActiveSetSettings<T>,
    pub solution: ActiveSetSolution<T>,
    pub info: ActiveSetInfo<T>,
}

impl<T> ActiveSetSolver<T>
where
    T: FloatT,
{
    /// Create a solver for the normal equations `XtX`, `Xty`.
    pub fn new(
        XtX: &Matrix<T>,
        Xty: &[T],
        settings: ActiveSetSettings<T>,
    ) -> Result<Self, SolverError> {
        if !XtX.is_square() || XtX.nrows() != Xty.len() {
            return Err(SolverError::IncompatibleDimension);
        }
        settings.validate()?;

        let n = Xty.len();
        Ok(Self {
            XtX: XtX.clone(),
            Xty: Xty.to_vec(),
            settings,
            solution: ActiveSetSolution::new(n),
            info: ActiveSetInfo::new(),
        })
    }

    /// number of variables
    pub fn dim(&self) -> usize {
        self.Xty.len()
    }

    /// Solve the problem, storing the result in `self.solution`.
    pub fn solve(&mut self) -> Result<(), SolverError> {
        let start = Instant::now();
        let n = self.dim();

        self.info.reset();
        let _ = self.info.print_configuration(&self.settings, n);
        let _ = self.info.print_status_header(&self.settings);

        let x = if self.settings.constrain {
            self.solve_constrained()?
        } else {
            self.solve_clamped()?
        };

        self.info.solve_time = start.elapsed().as_secs_f64();

        self.solution.finalize(&self.XtX, &self.Xty, x);
        self.solution.status = self.info.status;
        self.solution.iterations = self.info.iterations;
        self.solution.solve_time = self.info.solve_time;

        log::debug!(
            "active-set solve of dimension {n} finished with status {} after {} iterations",
            self.info.status,
            self.info.iterations
        );
        let _ = self.info.print_footer(&self.settings);
        Ok(())
    }

    /// solution vector of the last call to [`solve`](Self::solve)
    pub fn get_soln(&self) -> &[T] {
        &self.solution.x
    }

    /// entry `i` of the solution vector
    pub fn get_soln_at(&self, i: usize) -> T {
        self.solution.x[i]
    }

    // Unconstrained least squares solution with negative entries set to
    // zero.  This is not the non-negative least squares solution.
    fn solve_clamped(&mut self) -> Result<Vec<T>, SolverError> {
        let engine = MaskedCholesky::new(&self.XtX);
        let mut x = vec![T::zero(); self.dim()];
        self.solve_active(&engine, &mut x)?;
        x.scalarop(|xi| T::max(xi, T::zero()));

        self.info.nactive = engine.nactive();
        self.info.status = SolverStatus::Solved;
        Ok(x)
    }

    fn solve_constrained(&mut self) -> Result<Vec<T>, SolverError> {
        let n = self.dim();
        let mut engine = MaskedCholesky::new(&self.XtX);

        // last feasible point, any strictly positive start will do
        let mut old_x = vec![T::one(); n];
        let mut x = vec![T::zero(); n];
        let mut grad = vec![T::zero(); n];

        loop {
            // mask variables until the solution on the active set is feasible
            loop {
                self.solve_active(&engine, &mut x)?;

                match first_boundary_hit(&old_x, &x) {
                    None => break,
                    Some((bad_i, δ)) => {
                        for &i in engine.active() {
                            let oi = old_x[i];
                            old_x[i] = oi + δ * (x[i] - oi);
                        }
                        old_x[bad_i] = T::zero();
                        engine.mask_row(bad_i)?;
                        self.info.masks += 1;
                    }
                }
            }
            old_x.copy_from(&x);

            // g = 2(Ax - b)
            grad.copy_from(&self.Xty);
            self.XtX.gemv(&x, &mut grad, (2.0).as_T(), (-2.0).as_T());

            let bad = most_negative_masked(&engine, &grad);

            self.info.iterations += 1;
            self.info.nactive = engine.nactive();
            self.info.min_masked_grad = bad.map_or(T::zero(), |(_, g)| g);
            self.info.cost = objective(&self.XtX, &self.Xty, &x);
            let _ = self.info.print_status(&self.settings);

            match bad {
                Some((bad_i, g)) if g < -self.settings.tol_opt => {
                    if self.info.iterations >= self.settings.max_iter {
                        self.info.status = SolverStatus::MaxIterations;
                        break;
                    }
                    engine.unmask_row(bad_i)?;
                    self.info.unmasks += 1;
                }
                _ => {
                    self.check_active_gradient(&engine, &x, &grad)?;
                    self.info.status = SolverStatus::Solved;
                    break;
                }
            }
        }
        Ok(x)
    }

    // x = solution on the active set, zero elsewhere
    fn solve_active(&self, engine: &MaskedCholesky<T>, x: &mut [T]) -> Result<(), SolverError> {
        if engine.nactive() == 0 {
            x.set(T::zero());
        } else {
            x.copy_from(&engine.solve_vec(&self.Xty)?);
        }
        Ok(())
    }

    // every active variable should be stationary once the masked
    // ones are optimal, up to a tolerance relative to the data scale
    fn check_active_gradient(
        &self,
        engine: &MaskedCholesky<T>,
        x: &[T],
        grad: &[T],
    ) -> Result<(), SolverError> {
        let mut Ax = vec![T::zero(); x.len()];
        self.XtX.gemv(x, &mut Ax, T::one(), T::zero());
        let scale = T::max(T::one(), T::max(Ax.norm_inf(), self.Xty.norm_inf()));
        let tol = self.settings.tol_active_grad * scale;

        for &i in engine.active() {
            if !(T::abs(grad[i]) <= tol) {
                log::warn!("active variable {i} has gradient {:e} > {:e}", grad[i], tol);
                return Err(SolverError::InconsistentActiveSet {
                    index: i,
                    gradient: grad[i].to_f64().unwrap_or(f64::NAN),
                });
            }
        }
        Ok(())
    }
}

impl<T> ConfigurablePrintTarget for ActiveSetSolver<T>
where
    T: FloatT,
{
    fn print_to_stdout(&mut self) {
        self.info.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.info.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn std::io::Write + Send + Sync>) {
        self.info.print_to_stream(stream)
    }
    fn print_to_sink(&mut self) {
        self.info.print_to_sink()
    }
    fn print_to_buffer(&mut self) {
        self.info.print_to_buffer()
    }
    fn print_to_log(&mut self) {
        self.info.print_to_log()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.info.get_print_buffer()
    }
}

/// Solve the non-negative least squares normal equations `XtX*x = Xty`
/// with default settings and return the weight vector.
///
/// With `constrain = false` the unconstrained solution is returned with its
/// negative entries set to zero.
pub fn solve_nonnegative<T>(XtX: &Matrix<T>, Xty: &[T], constrain: bool) -> Result<Vec<T>, SolverError>
where
    T: FloatT,
{
    let settings = ActiveSetSettings {
        constrain,
        ..ActiveSetSettings::default()
    };
    let mut solver = ActiveSetSolver::new(XtX, Xty, settings)?;
    solver.solve()?;
    Ok(solver.solution.x)
}

// Among the negative entries of x, the one whose constraint is hit first
// moving from the feasible point old_x towards x, and the fraction of
// that step.
fn first_boundary_hit<T: FloatT>(old_x: &[T], x: &[T]) -> Option<(usize, T)> {
    let mut bad: Option<(usize, T)> = None;
    for (i, &oi, &xi) in izip!(0.., old_x, x) {
        if xi < T::zero() {
            let δ = oi / (oi - xi);
            if bad.map_or(true, |(_, best)| δ < best) {
                bad = Some((i, δ));
            }
        }
    }
    bad
}

// masked index with the most negative gradient
fn most_negative_masked<T: FloatT>(engine: &MaskedCholesky<T>, grad: &[T]) -> Option<(usize, T)> {
    let mut bad: Option<(usize, T)> = None;
    for (i, &gi) in grad.iter().enumerate() {
        if engine.is_masked(i) && bad.map_or(true, |(_, best)| gi < best) {
            bad = Some((i, gi));
        }
    }
    bad
}

// ½x'Ax - x'b
fn objective<T: FloatT>(A: &Matrix<T>, b: &[T], x: &[T]) -> T {
    let half: T = (0.5).as_T();
    half * A.quad_form(x, x) - x.dot(b)
}

#[test]
fn test_first_boundary_hit() {
    let old_x = [1.0, 1.0, 0.5, 0.0];
    let x = [2.0, -1.0, -0.5, 0.0];
    // δ = 1/(1+1) = 0.5 for entry 1, 0.5/(0.5+0.5) = 0.5 for entry 2
    assert_eq!(first_boundary_hit(&old_x, &x), Some((1, 0.5)));

    let x = [2.0, -3.0, -0.5, 0.0];
    assert_eq!(first_boundary_hit(&old_x, &x), Some((1, 0.25)));

    let x = [2.0, 1.0, 0.0, 0.0];
    assert_eq!(first_boundary_hit(&old_x, &x), None);
}

#[test]
fn test_most_negative_masked() {
    let A = Matrix::<f64>::identity(4);
    let mut engine = MaskedCholesky::new(&A);
    let grad = [-5.0, -1.0, -2.0, 3.0];
    assert_eq!(most_negative_masked(&engine, &grad), None);

    engine.mask_row(1).unwrap();
    engine.mask_row(2).unwrap();
    engine.mask_row(3).unwrap();
    assert_eq!(most_negative_masked(&engine, &grad), Some((2, -2.0)));
}
