#![allow(non_snake_case)]
use splitfit::{algebra::*, solver::*};

// a collection of tests to ensure that data of
// incompatible dimension won't be accepted

fn api_dim_check_data() -> (Matrix<f64>, Vec<f64>) {
    let XtX = Matrix::<f64>::identity(4);
    let Xty = vec![1.; 4];
    (XtX, Xty)
}

#[test]
fn api_dim_check_working() {
    let (XtX, Xty) = api_dim_check_data();
    let settings = ActiveSetSettings::default();
    assert!(ActiveSetSolver::new(&XtX, &Xty, settings).is_ok());
}

#[test]
fn api_dim_check_bad_rhs() {
    let (XtX, _Xty) = api_dim_check_data();
    let Xty = vec![1.; 3];
    let settings = ActiveSetSettings::default();
    assert!(matches!(
        ActiveSetSolver::new(&XtX, &Xty, settings),
        Err(SolverError::IncompatibleDimension)
    ));
}

#[test]
fn api_dim_check_not_square() {
    let (_XtX, Xty) = api_dim_check_data();
    let XtX = Matrix::<f64>::zeros((4, 3));
    let settings = ActiveSetSettings::default();
    assert!(matches!(
        ActiveSetSolver::new(&XtX, &Xty, settings),
        Err(SolverError::IncompatibleDimension)
    ));
}

#[test]
fn api_dim_check_bad_settings() {
    let (XtX, Xty) = api_dim_check_data();
    let mut settings = ActiveSetSettings::default();
    settings.tol_opt = -1.;
    assert!(matches!(
        ActiveSetSolver::new(&XtX, &Xty, settings),
        Err(SolverError::Settings(SettingsError::BadFieldValue("tol_opt")))
    ));
}

#[test]
fn api_dim_check_empty() {
    let XtX = Matrix::<f64>::zeros((0, 0));
    let Xty: Vec<f64> = vec![];
    let mut solver = ActiveSetSolver::new(&XtX, &Xty, ActiveSetSettings::default()).unwrap();
    solver.solve().unwrap();
    assert!(solver.get_soln().is_empty());
    assert_eq!(solver.solution.status, SolverStatus::Solved);
}

#[test]
fn api_dim_check_empty_unconstrained() {
    let XtX = Matrix::<f64>::zeros((0, 0));
    let Xty: Vec<f64> = vec![];
    let settings = ActiveSetSettings {
        constrain: false,
        ..ActiveSetSettings::default()
    };
    let mut solver = ActiveSetSolver::new(&XtX, &Xty, settings).unwrap();
    solver.solve().unwrap();
    assert!(solver.get_soln().is_empty());
    assert_eq!(solver.solution.status, SolverStatus::Solved);
}
