#![allow(non_snake_case)]

use crate::algebra::{DenseMatrix, FloatT, Matrix, ShapedMatrix};

impl<T> Matrix<T>
where
    T: FloatT,
{
    /// General matrix-matrix multiply.  Produces `self = C = αA*B + βC`.
    /// Either argument may be an [`Adjoint`](crate::algebra::Adjoint) view.
    pub fn mul<MATA, MATB>(&mut self, A: &MATA, B: &MATB, α: T, β: T) -> &Self
    where
        MATA: DenseMatrix<T = T>,
        MATB: DenseMatrix<T = T>,
    {
        assert!(A.ncols() == B.nrows() && self.nrows() == A.nrows() && self.ncols() == B.ncols());

        let k = A.ncols();
        for c in 0..self.ncols() {
            for r in 0..self.nrows() {
                let mut acc = T::zero();
                for p in 0..k {
                    acc += A[(r, p)] * B[(p, c)];
                }
                self[(r, c)] = α * acc + β * self[(r, c)];
            }
        }
        self
    }
}

#[test]
fn test_gemm() {
    let (m, n, k) = (2, 4, 3);
    let a = vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0];
    let b = vec![
        1.0, 5.0, 9.0, 2.0, 6.0, 10.0, 3.0, 7.0, 11.0, 4.0, 8.0, 12.0,
    ];
    let c = vec![2.0, 7.0, 6.0, 2.0, 0.0, 7.0, 4.0, 2.0];

    let mut A = Matrix::zeros((m, k));
    let mut B = Matrix::zeros((k, n));
    let mut C = Matrix::<f64>::zeros((m, n));
    A.copy_from_slice(&a);
    B.copy_from_slice(&b);
    C.copy_from_slice(&c);
    C.mul(&A, &B, 1.0, 1.0);

    assert!(C.data() == vec![40.0, 90.0, 50.0, 100.0, 50.0, 120.0, 60.0, 130.0]);

    // new from slice and transposed multiply
    let A = Matrix::new_from_slice((m, k), &a);
    let B = Matrix::new_from_slice((k, n), &b);
    let mut C = Matrix::<f64>::zeros((n, m));
    C.mul(&B.t(), &A.t(), 1.0, 0.0);

    assert!(C.data() == vec![38.0, 44.0, 50.0, 56.0, 83.0, 98.0, 113.0, 128.0]);
}
