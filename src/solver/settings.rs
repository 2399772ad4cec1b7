use crate::algebra::*;
use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Error type returned by settings validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// A field has an illegal value
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
}

/// User settings for the [`ActiveSetSolver`](crate::solver::ActiveSetSolver)
///
/// Build with [`ActiveSetSettingsBuilder`], or take the defaults with
/// `ActiveSetSettings::default()`.

#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActiveSetSettings<T: FloatT> {
    ///enforce non-negativity with the active-set method.  When false the
    ///unconstrained least squares solution is computed and its negative
    ///entries are set to zero.
    #[builder(default = "true")]
    pub constrain: bool,

    ///optimality tolerance on the gradient of masked variables
    #[builder(default = "(1e-10).as_T()")]
    pub tol_opt: T,

    ///relative bound on the gradient of active variables at termination
    #[builder(default = "(1e-6).as_T()")]
    pub tol_active_grad: T,

    ///maximum number of outer (unmasking) iterations
    #[builder(default = "u32::MAX")]
    pub max_iter: u32,

    ///verbose printing
    #[builder(default = "false")]
    pub verbose: bool,
}

impl<T> Default for ActiveSetSettings<T>
where
    T: FloatT,
{
    fn default() -> ActiveSetSettings<T> {
        ActiveSetSettingsBuilder::<T>::default().build().unwrap()
    }
}

impl<T> ActiveSetSettings<T>
where
    T: FloatT,
{
    /// check that all tolerances are legal
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_tolerance(self.tol_opt, "tol_opt")?;
        validate_tolerance(self.tol_active_grad, "tol_active_grad")?;
        Ok(())
    }
}

impl From<SettingsError> for ActiveSetSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        ActiveSetSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> ActiveSetSettingsBuilder<T>
where
    T: FloatT,
{
    /// check any tolerances that have been set explicitly
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(tol) = self.tol_opt {
            validate_tolerance(tol, "tol_opt")?;
        }
        if let Some(tol) = self.tol_active_grad {
            validate_tolerance(tol, "tol_active_grad")?;
        }
        Ok(())
    }
}

fn validate_tolerance<T: FloatT>(tol: T, field: &'static str) -> Result<(), SettingsError> {
    if tol.is_finite() && tol >= T::zero() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue(field))
    }
}

#[test]
fn test_settings_validate() {
    let settings = ActiveSetSettings::<f64>::default();
    assert!(settings.constrain);
    assert_eq!(settings.tol_opt, 1e-10);
    assert!(settings.validate().is_ok());

    let settings = ActiveSetSettingsBuilder::<f64>::default()
        .tol_opt(1e-8)
        .verbose(true)
        .build()
        .unwrap();
    assert_eq!(settings.tol_opt, 1e-8);
    assert!(settings.verbose);

    let result = ActiveSetSettingsBuilder::<f64>::default()
        .tol_opt(-1.0)
        .build();
    assert!(result.is_err());

    let mut settings = ActiveSetSettings::<f64>::default();
    settings.tol_active_grad = f64::NAN;
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue("tol_active_grad"))
    );
}
