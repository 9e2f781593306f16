use crate::Error;

mod model_tests;
mod panic_safety_tests;

/// Failure of a fallible element constructor.
#[derive(Debug, PartialEq)]
pub(crate) enum BuildError {
    Rejected(&'static str),
    Storage(Error),
}

impl From<Error> for BuildError {
    fn from(e: Error) -> Self {
        BuildError::Storage(e)
    }
}
