#![allow(non_snake_case)]

#[cfg(feature = "serde")]
#[test]
fn test_json_io() {
    use splitfit::{algebra::*, solver::*};
    use std::io::{Seek, SeekFrom};

    let XtX = Matrix::from(&[
        [10., -3., 0.], //
        [-3., 6., -6.], //
        [0., -6., 10.], //
    ]);
    let Xty = [-4., 1., -3.];

    let settings = ActiveSetSettingsBuilder::default()
        .max_iter(1)
        .build()
        .unwrap();

    let mut solver = ActiveSetSolver::<f64>::new(&XtX, &Xty, settings).unwrap();
    solver.solve().unwrap();
    assert_eq!(solver.solution.status, SolverStatus::MaxIterations);

    // write the problem to a file
    let mut file = tempfile::tempfile().unwrap();
    solver.write_to_file(&mut file).unwrap();

    // read the problem from the file, settings included
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut solver2 = ActiveSetSolver::<f64>::read_from_file(&mut file).unwrap();
    assert_eq!(solver2.settings.max_iter, 1);
    solver2.solve().unwrap();
    assert_eq!(solver2.solution.status, SolverStatus::MaxIterations);
    assert_eq!(solver.solution.x, solver2.solution.x);

    // the same data solved to completion
    solver2.settings.max_iter = u32::MAX;
    solver2.solve().unwrap();
    assert_eq!(solver2.solution.status, SolverStatus::Solved);
}

#[cfg(feature = "serde")]
#[test]
fn test_json_bad_data() {
    use splitfit::solver::*;
    use std::io::{Seek, SeekFrom, Write};

    // Xty has the wrong length
    let json = r#"{"XtX":{"m":2,"n":2,"data":[1.0,0.0,0.0,1.0]},"Xty":[1.0],"settings":{}}"#;
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    file.seek(SeekFrom::Start(0)).unwrap();
    let result = ActiveSetSolver::<f64>::read_from_file(&mut file);
    assert!(result.is_err());
}
