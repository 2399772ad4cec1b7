#![allow(non_snake_case)]
use super::SolverStatus;
use crate::algebra::*;
use itertools::izip;

/// Solution returned by the [`ActiveSetSolver`](crate::solver::ActiveSetSolver)
#[derive(Debug, Clone)]
pub struct ActiveSetSolution<T> {
    /// solution vector, one weight per variable
    pub x: Vec<T>,
    /// final solver status
    pub status: SolverStatus,
    /// objective value ½x'Ax - x'b
    pub obj_val: T,
    /// solve time in seconds
    pub solve_time: f64,
    /// number of outer iterations
    pub iterations: u32,
    /// primal infeasibility, max(0, -min x)
    pub r_prim: T,
    /// dual infeasibility, max(0, -min (Ax - b))
    pub r_dual: T,
    /// complementarity, max |x_i (Ax - b)_i|
    pub r_comp: T,
}

impl<T> ActiveSetSolution<T>
where
    T: FloatT,
{
    /// Create a new `ActiveSetSolution` object
    pub fn new(n: usize) -> Self {
        Self {
            x: vec![T::zero(); n],
            status: SolverStatus::Unsolved,
            obj_val: T::nan(),
            solve_time: 0f64,
            iterations: 0,
            r_prim: T::nan(),
            r_dual: T::nan(),
            r_comp: T::nan(),
        }
    }

    // objective and KKT residuals of x for the problem (A,b).
    pub(crate) fn finalize(&mut self, A: &Matrix<T>, b: &[T], x: Vec<T>) {
        // r = A*x - b
        let mut r = b.to_vec();
        A.gemv(&x, &mut r, T::one(), -T::one());

        // ½x'Ax - x'b = ½x'(r + b) - x'b = ½x'(r - b)
        let half: T = (0.5).as_T();
        self.obj_val = half * (x.dot(&r) - x.dot(b));

        self.r_prim = T::max(T::zero(), -x.minimum());
        self.r_dual = T::max(T::zero(), -r.minimum());
        self.r_comp = izip!(&x, &r).fold(T::zero(), |acc, (&xi, &ri)| T::max(acc, T::abs(xi * ri)));
        self.x = x;
    }

    /// true if x satisfies the KKT conditions to within `tol`
    pub fn is_kkt_point(&self, tol: T) -> bool {
        self.r_prim <= tol && self.r_dual <= tol && self.r_comp <= tol
    }
}

#[test]
fn test_finalize_residuals() {
    let A = Matrix::from(&[
        [2., 0.], //
        [0., 2.], //
    ]);
    let b = [1., -1.];

    let mut sol = ActiveSetSolution::<f64>::new(2);
    sol.finalize(&A, &b, vec![0.5, 0.]);
    assert_eq!(sol.obj_val, -0.25);
    assert_eq!(sol.r_prim, 0.);
    assert_eq!(sol.r_dual, 0.);
    assert_eq!(sol.r_comp, 0.);
    assert!(sol.is_kkt_point(1e-12));

    sol.finalize(&A, &b, vec![0.5, -0.5]);
    assert_eq!(sol.obj_val, -0.5);
    assert_eq!(sol.r_prim, 0.5);
    assert!(!sol.is_kkt_point(1e-12));
}
