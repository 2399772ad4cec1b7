#![allow(non_snake_case)]
use super::*;
use crate::algebra::*;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::Write;
use std::{fs::File, io, io::Read};

/// Save and load problem data in JSON format
pub trait SolverJSONReadWrite: Sized {
    /// write the normal equations and settings to `file`
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error>;
    /// create a solver from a file written by [`write_to_file`](Self::write_to_file)
    fn read_from_file(file: &mut File) -> Result<Self, io::Error>;
}

// The user supplied problem data only, no solver internals.

#[derive(Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
struct JsonProblemData<T: FloatT> {
    pub XtX: Matrix<T>,
    pub Xty: Vec<T>,
    pub settings: ActiveSetSettings<T>,
}

impl<T> SolverJSONReadWrite for ActiveSetSolver<T>
where
    T: FloatT + DeserializeOwned + Serialize,
{
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        let json_data = JsonProblemData {
            XtX: self.XtX.clone(),
            Xty: self.Xty.clone(),
            settings: self.settings.clone(),
        };

        let json = serde_json::to_string(&json_data)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }

    fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let json_data: JsonProblemData<T> = serde_json::from_str(&buffer)?;

        Self::new(&json_data.XtX, &json_data.Xty, json_data.settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[test]
fn test_json_io() {
    use std::io::{Seek, SeekFrom};

    let XtX = Matrix::from(&[
        [2., 1.], //
        [1., 2.], //
    ]);
    let Xty = [1., -1.];
    let settings = ActiveSetSettingsBuilder::default()
        .tol_opt(1e-9)
        .build()
        .unwrap();

    let mut solver = ActiveSetSolver::<f64>::new(&XtX, &Xty, settings).unwrap();
    solver.solve().unwrap();

    let mut file = tempfile::tempfile().unwrap();
    solver.write_to_file(&mut file).unwrap();

    file.seek(SeekFrom::Start(0)).unwrap();
    let mut solver2 = ActiveSetSolver::<f64>::read_from_file(&mut file).unwrap();
    assert_eq!(solver2.settings.tol_opt, 1e-9);
    solver2.solve().unwrap();
    assert_eq!(solver.solution.x, solver2.solution.x);
}
