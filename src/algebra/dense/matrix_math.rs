#![allow(non_snake_case)]
use crate::algebra::{FloatT, Matrix, MatrixMath, VectorMath};

impl<T: FloatT> MatrixMath for Matrix<T> {
    type T = T;

    //scalar mut operations
    fn scale(&mut self, c: T) {
        self.data.scale(c);
    }

    fn lscale(&mut self, l: &[T]) {
        assert_eq!(l.len(), self.m);
        for col in 0..self.n {
            self.col_slice_mut(col).hadamard(l);
        }
    }

    fn quad_form(&self, y: &[T], x: &[T]) -> T {
        assert_eq!(self.m, self.n);
        assert_eq!(y.len(), self.m);
        assert_eq!(x.len(), self.n);
        let mut out = T::zero();
        for (col, &xc) in x.iter().enumerate() {
            out += xc * self.col_slice(col).dot(y);
        }
        out
    }
}

#[test]
fn test_quad_form() {
    let A = Matrix::from(&[
        [1., 4.], //
        [4., 5.], //
    ]);

    let x = vec![1.0, 2.0];
    let y = vec![3.0, 4.0];
    assert!(A.quad_form(&y, &x) == 83.0);
}

#[test]
fn test_lscale_and_scale() {
    let mut A = Matrix::from(&[
        [1., 2.], //
        [3., 4.], //
    ]);
    A.lscale(&[2., -1.]);
    assert_eq!(A.data, vec![2., -3., 4., -4.]);

    A.scale(0.5);
    assert_eq!(A.data, vec![1., -1.5, 2., -2.]);
}
