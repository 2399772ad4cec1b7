#![allow(non_snake_case)]

use splitfit::{algebra::*, io::ConfigurablePrintTarget, solver::*};

fn test_print_solver() -> ActiveSetSolver<f64> {
    let XtX = Matrix::from(&[
        [2., 0.], //
        [0., 2.], //
    ]);
    let Xty = [1., -1.];
    let settings = ActiveSetSettingsBuilder::default()
        .verbose(true)
        .build()
        .unwrap();
    ActiveSetSolver::new(&XtX, &Xty, settings).unwrap()
}

#[test]
fn test_print_to_stdout() {
    let mut solver = test_print_solver();
    solver.print_to_stdout();
    solver.solve().unwrap();
}

#[test]
fn test_print_to_buffer() {
    let mut solver = test_print_solver();
    solver.print_to_buffer();
    solver.solve().unwrap();
    let result = solver.get_print_buffer().unwrap();
    assert!(result.contains("splitfit"));
    assert!(result.contains("status = Solved"));
}

#[test]
fn test_print_configuration() {
    let mut solver = test_print_solver();
    solver.settings.tol_opt = 1e-7;
    solver.print_to_buffer();
    solver.solve().unwrap();
    let result = solver.get_print_buffer().unwrap();

    // every printed tolerance is one the solver acts on
    assert!(result.contains("tol_opt = 1.0e-7"));
    assert!(result.contains("tol_active_grad = 1.0e-6"));
    assert_eq!(result.matches("tol_").count(), 2);
}

#[test]
fn test_print_quiet() {
    let mut solver = test_print_solver();
    solver.settings.verbose = false;
    solver.print_to_buffer();
    solver.solve().unwrap();
    assert!(solver.get_print_buffer().unwrap().is_empty());
}

#[test]
fn test_print_to_file() {
    use std::io::{Read, Seek};

    let mut solver = test_print_solver();
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut file2 = file.reopen().unwrap();
    solver.print_to_file(file.into_file());
    solver.solve().unwrap();

    file2.seek(std::io::SeekFrom::Start(0)).unwrap();
    let mut result = String::new();
    file2.read_to_string(&mut result).unwrap();
    assert!(result.contains("splitfit"));
}

#[test]
fn test_print_to_stream() {
    use std::io::{Read, Seek};

    let mut solver = test_print_solver();
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut file2 = file.reopen().unwrap();
    let stream = Box::new(file.into_file());

    solver.print_to_stream(stream);
    solver.solve().unwrap();

    file2.seek(std::io::SeekFrom::Start(0)).unwrap();
    let mut result = String::new();
    file2.read_to_string(&mut result).unwrap();
    assert!(result.contains("splitfit"));
}

#[test]
fn test_print_to_sink() {
    let mut solver = test_print_solver();
    solver.print_to_sink();
    solver.solve().unwrap();
    // no output
}

#[test]
fn test_print_to_log() {
    let mut solver = test_print_solver();
    solver.print_to_log();
    solver.solve().unwrap();
    assert!(solver.get_print_buffer().is_err());
}
