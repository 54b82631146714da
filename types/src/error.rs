//! Error type for parsing and validating the shared types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("sample window must be positive")]
    ZeroWindow,

    #[error("unknown statistical mode {0:?} (expected \"mean\" or \"median\")")]
    UnknownMode(String),
}
