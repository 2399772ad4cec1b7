#![allow(non_snake_case)]

use splitfit::{algebra::*, leastsquares::*, solver::*};

// Four taxa a,b,c,d with pairs (ab, ac, ad, bc, bd, cd) as rows and the
// splits {a}, {b}, {c}, {d}, ab|cd, ac|bd as columns.  An entry is 1 when
// the split separates the pair.
fn four_taxa_design() -> Matrix<f64> {
    Matrix::from(&[
        [1., 1., 0., 0., 0., 1.], //
        [1., 0., 1., 0., 1., 0.], //
        [1., 0., 0., 1., 1., 1.], //
        [0., 1., 1., 0., 1., 1.], //
        [0., 1., 0., 1., 1., 0.], //
        [0., 0., 1., 1., 0., 1.], //
    ])
}

fn distances(X: &Matrix<f64>, w: &[f64]) -> Vec<f64> {
    let mut y = vec![0.; X.nrows()];
    X.gemv(w, &mut y, 1.0, 0.0);
    y
}

#[test]
fn test_fit_exact_network() {
    let X = four_taxa_design();
    let wtrue = [1., 2., 3., 4., 0.5, 0.25];
    let y = distances(&X, &wtrue);
    assert_eq!(y, vec![3.25, 4.5, 5.75, 5.75, 6.5, 7.25]);

    for model in [
        VarianceModel::Ols,
        VarianceModel::FitchMargoliash1,
        VarianceModel::FitchMargoliash2,
    ] {
        let fit = fit_weights(&X, &y, model, ActiveSetSettings::default()).unwrap();
        assert_eq!(fit.status, SolverStatus::Solved);
        assert!(fit.weights.norm_inf_diff(&wtrue) <= 1e-9);
        assert!(fit.rss <= 1e-16);
    }
}

#[test]
fn test_fit_negative_split() {
    let X = four_taxa_design();
    let y = distances(&X, &[1., 2., 3., 4., 0.5, -0.25]);

    for model in [
        VarianceModel::Ols,
        VarianceModel::FitchMargoliash1,
        VarianceModel::FitchMargoliash2,
    ] {
        let fit = fit_weights(&X, &y, model, ActiveSetSettings::default()).unwrap();
        assert!(fit.weights.iter().all(|&w| w >= 0.));
        assert!(fit.rss > 0.);

        // the clamped unconstrained fit is feasible, so it can be no
        // better than the constrained one
        let settings = ActiveSetSettings {
            constrain: false,
            ..ActiveSetSettings::default()
        };
        let clamped = fit_weights(&X, &y, model, settings).unwrap();
        assert!(clamped.weights.iter().all(|&w| w >= 0.));
        assert!(fit.rss <= clamped.rss + 1e-12);

        // rss agrees with the normal equations objective
        let eqs = NormalEquations::new(&X, &y, model).unwrap();
        let ytVy: f64 = y.iter().map(|&yk| model.weight(yk) * yk * yk).sum();
        let w = &fit.weights;
        let rss = eqs.XtX.quad_form(w, w) - 2. * w.dot(&eqs.Xty) + ytVy;
        assert!((rss - fit.rss).abs() <= 1e-10);
    }
}

#[test]
fn test_fit_bad_dimensions() {
    let X = four_taxa_design();
    let y = [1., 2., 3.];
    let result = fit_weights(&X, &y, VarianceModel::Ols, ActiveSetSettings::default());
    assert!(matches!(
        result,
        Err(LeastSquaresError::IncompatibleDimension {
            rows: 6,
            observations: 3
        })
    ));
}

#[test]
fn test_fit_rank_deficient() {
    // a split separating no pair gives a singular normal matrix
    let X = Matrix::from(&[
        [1., 0.], //
        [1., 0.], //
    ]);
    let y = [1., 1.];
    let result = fit_weights(&X, &y, VarianceModel::Ols, ActiveSetSettings::default());
    assert_eq!(
        result.unwrap_err(),
        LeastSquaresError::Solver(SolverError::Factorization(
            splitfit::cholesky::CholeskyError::NotPositiveDefinite
        ))
    );
}
