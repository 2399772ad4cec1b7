#![allow(non_snake_case)]
use super::masked::{append_factor_row, givens};
use super::*;
use crate::algebra::*;
use itertools::iproduct;

// tests some of the private functions and the internal index
// bookkeeping of MaskedCholesky.

fn test_matrix_3x3() -> Matrix<f64> {
    Matrix::from(&[
        [8., -2., 4.], //
        [-2., 12., 2.], //
        [4., 2., 6.], //
    ])
}

fn test_matrix_4x4() -> Matrix<f64> {
    Matrix::from(&[
        [4., 1., 0., 1.], //
        [1., 5., 2., 0.], //
        [0., 2., 6., 1.], //
        [1., 0., 1., 3.], //
    ])
}

// F*F'
fn outer(F: &Matrix<f64>) -> Matrix<f64> {
    let mut M = Matrix::zeros(F.size());
    M.mul(F, &F.t(), 1.0, 0.0);
    M
}

// A[idx,idx]
fn submatrix(A: &Matrix<f64>, idx: &[usize]) -> Matrix<f64> {
    let mut S = Matrix::zeros((idx.len(), idx.len()));
    for ((c, &j), (r, &i)) in iproduct!(idx.iter().enumerate(), idx.iter().enumerate()) {
        S[(r, c)] = A[(i, j)];
    }
    S
}

#[test]
fn test_givens() {
    let (c, s, r) = givens(3.0, 4.0);
    assert_eq!(r, 5.0);
    assert!((3.0 * c + 4.0 * s - 5.0f64).abs() < 1e-15);
    assert!((4.0 * c - 3.0 * s).abs() < 1e-15);

    // negative leading entry still gives a non-negative result
    let (c, s, r) = givens(-3.0, 4.0);
    assert_eq!(r, 5.0);
    assert!((-3.0 * c + 4.0 * s - 5.0f64).abs() < 1e-15);

    assert_eq!(givens(0.0, 0.0), (1.0, 0.0, 0.0));
}

#[test]
fn test_append_factor_row() {
    // [4 2; 2 5] = [2 0; 1 2]*[2 1; 0 2]
    let mut L = Matrix::<f64>::zeros((2, 2));
    let d0 = append_factor_row(&mut L, 0, &[], 4.0);
    let d1 = append_factor_row(&mut L, 1, &[2.0], 5.0);
    assert_eq!(d0, 4.0);
    assert_eq!(d1, 4.0);
    assert_eq!(L.data, vec![2.0, 1.0, 0.0, 2.0]);
}

#[test]
fn test_full_factor() {
    let A = test_matrix_3x3();
    let eng = MaskedCholesky::new(&A);

    assert!(eng.is_spd());
    assert_eq!(eng.nactive(), 3);

    let F = eng.factor();
    assert!(F.is_tril());
    assert!(outer(&F).data.norm_inf_diff(&A.data) < 1e-12);
}

#[test]
fn test_mask_factor_matches_submatrix() {
    let A = test_matrix_4x4();

    for i in 0..4 {
        let mut eng = MaskedCholesky::new(&A);
        eng.mask_row(i).unwrap();

        let F = eng.factor();
        let S = submatrix(&A, eng.active());
        assert!(F.is_tril());
        assert!((0..F.nrows()).all(|k| F[(k, k)] >= 0.0));
        assert!(outer(&F).data.norm_inf_diff(&S.data) < 1e-12);
    }
}

#[test]
fn test_unmask_appends_last() {
    let A = test_matrix_4x4();
    let mut eng = MaskedCholesky::new(&A);

    eng.mask_row(0).unwrap();
    eng.mask_row(2).unwrap();
    assert_eq!(eng.active(), &[1, 3]);

    eng.unmask_row(0).unwrap();
    assert_eq!(eng.active(), &[1, 3, 0]);

    let F = eng.factor();
    let S = submatrix(&A, eng.active());
    assert!(outer(&F).data.norm_inf_diff(&S.data) < 1e-12);
}

#[test]
fn test_index_map_consistency() {
    let A = test_matrix_4x4();
    let mut eng = MaskedCholesky::new(&A);

    let ops: [(bool, usize); 8] = [
        (true, 3),
        (true, 0),
        (false, 3),
        (true, 1),
        (false, 0),
        (true, 2),
        (false, 1),
        (false, 2),
    ];

    for (mask, i) in ops {
        if mask {
            eng.mask_row(i).unwrap();
        } else {
            eng.unmask_row(i).unwrap();
        }
        let map = eng.index_map();
        assert!(map.check());
        for j in 0..4 {
            match map.position(j) {
                Some(k) => assert_eq!(map.full_index(k), j),
                None => assert!(eng.is_masked(j)),
            }
        }
        let nmasked = (0..4).filter(|&j| eng.is_masked(j)).count();
        assert_eq!(eng.nactive(), 4 - nmasked);
    }
    assert_eq!(eng.nactive(), 4);
}

#[test]
fn test_not_spd() {
    // not symmetric
    let A = Matrix::from(&[
        [4., 1.], //
        [2., 4.], //
    ]);
    let eng = MaskedCholesky::new(&A);
    assert!(!eng.is_spd());
    assert_eq!(
        eng.solve_vec(&[1., 1.]),
        Err(CholeskyError::NotPositiveDefinite)
    );

    // symmetric but indefinite
    let A = Matrix::from(&[
        [1., 2.], //
        [2., 1.], //
    ]);
    let eng = MaskedCholesky::new(&A);
    assert!(!eng.is_spd());
    assert!(eng.factor().data.is_finite());

    // not square
    let A = Matrix::<f64>::zeros((2, 3));
    let eng = MaskedCholesky::new(&A);
    assert!(!eng.is_spd());
    assert_eq!(eng.dim(), 2);
}

#[test]
fn test_deferred_matches_full() {
    let A = test_matrix_4x4();
    let mut eng = MaskedCholesky::new_with_row(&A, 2).unwrap();
    assert!(eng.is_spd());
    assert_eq!(eng.active(), &[2]);
    assert_eq!(eng.factor()[(0, 0)], 6f64.sqrt());

    for i in [0, 3, 1] {
        eng.unmask_row(i).unwrap();
    }
    assert!(eng.is_spd());

    let F = eng.factor();
    let S = submatrix(&A, eng.active());
    assert!(outer(&F).data.norm_inf_diff(&S.data) < 1e-12);

    let b = [1., -2., 3., 0.5];
    let x1 = eng.solve_vec(&b).unwrap();
    let x2 = MaskedCholesky::new(&A).solve_vec(&b).unwrap();
    assert!(x1.norm_inf_diff(&x2) < 1e-12);
}

#[test]
fn test_deferred_nonpositive_pivot() {
    // the trailing 2x2 block is singular
    let A = Matrix::from(&[
        [1., 1.], //
        [1., 1.], //
    ]);
    let mut eng = MaskedCholesky::new_with_row(&A, 0).unwrap();
    assert!(eng.is_spd());
    eng.unmask_row(1).unwrap();
    assert!(!eng.is_spd());

    let A = Matrix::from(&[
        [-1., 0.], //
        [0., 1.], //
    ]);
    let eng = MaskedCholesky::new_with_row(&A, 0).unwrap();
    assert!(!eng.is_spd());

    assert_eq!(
        MaskedCholesky::new_with_row(&A, 2).err(),
        Some(CholeskyError::IndexOutOfBounds(2))
    );
}

#[test]
fn test_precondition_errors() {
    let A = test_matrix_3x3();
    let mut eng = MaskedCholesky::new(&A);

    assert_eq!(eng.unmask_row(1), Err(CholeskyError::NotMasked(1)));
    assert_eq!(eng.mask_row(3), Err(CholeskyError::IndexOutOfBounds(3)));
    assert_eq!(eng.unmask_row(7), Err(CholeskyError::IndexOutOfBounds(7)));

    eng.mask_row(1).unwrap();
    assert_eq!(eng.mask_row(1), Err(CholeskyError::AlreadyMasked(1)));

    let B = Matrix::zeros((2, 1));
    assert_eq!(
        eng.solve(&B).err(),
        Some(CholeskyError::IncompatibleDimension)
    );

    // failed calls leave the factor untouched
    let F = eng.factor();
    let S = submatrix(&A, eng.active());
    assert!(outer(&F).data.norm_inf_diff(&S.data) < 1e-12);
}
