#![allow(non_snake_case)]

use crate::algebra::{Adjoint, FloatT, Matrix, MultiplyGEMV, ShapedMatrix};

impl<T> MultiplyGEMV for Matrix<T>
where
    T: FloatT,
{
    type T = T;
    // implements y = αA*x + βy
    fn gemv(&self, x: &[T], y: &mut [T], α: T, β: T) {
        let (m, n) = self.size();
        assert!(n == x.len() && m == y.len());

        for yi in y.iter_mut() {
            *yi *= β;
        }
        for (col, &xj) in x.iter().enumerate() {
            let a = α * xj;
            if a == T::zero() {
                continue;
            }
            for (yi, &Aij) in y.iter_mut().zip(self.col_slice(col)) {
                *yi += a * Aij;
            }
        }
    }
}

impl<T> MultiplyGEMV for Adjoint<'_, Matrix<T>>
where
    T: FloatT,
{
    type T = T;
    // implements y = αA'*x + βy
    fn gemv(&self, x: &[T], y: &mut [T], α: T, β: T) {
        let (m, n) = self.src.size(); //NB: size of A, not A'
        assert!(m == x.len() && n == y.len());

        for (col, yj) in y.iter_mut().enumerate() {
            let mut acc = T::zero();
            for (&Aij, &xi) in self.src.col_slice(col).iter().zip(x) {
                acc += Aij * xi;
            }
            *yj = α * acc + β * (*yj);
        }
    }
}

#[test]
fn test_gemv() {
    let (m, n) = (2, 3);
    let a = vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0];
    let A = Matrix::new_from_slice((m, n), &a);

    let x = vec![1., 2., 3.];
    let mut y = vec![-1., -2.];
    A.gemv(&x, &mut y, 2.0, 3.0);
    assert!(y == [25.0, 58.0]);

    let x = vec![1., 2.];
    let mut y = vec![-1., -2., -3.];
    A.t().gemv(&x, &mut y, 2.0, 3.0);
    assert!(y == [15.0, 18.0, 21.0]);
}
