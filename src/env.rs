//! Environment variable lookup for `ytool env get`.

use std::env;
use std::ffi::OsString;
use thiserror::Error;

use crate::utils::is_blank;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvLookupError {
    #[error("empty env prop name")]
    BlankName,

    #[error("env prop {0} is empty")]
    Empty(String),

    #[error("env prop {name} is not valid unicode: {value:?}")]
    NotUnicode { name: String, value: OsString },
}

/// Look up `name` in the process environment.
///
/// Unset and blank values are both reported as `Empty`; a blank name is rejected
/// before touching the environment.
pub fn lookup(name: &str) -> Result<String, EnvLookupError> {
    if is_blank(name) {
        return Err(EnvLookupError::BlankName);
    }
    match env::var(name) {
        Ok(v) if !is_blank(&v) => Ok(v),
        Ok(_) | Err(env::VarError::NotPresent) => Err(EnvLookupError::Empty(name.to_string())),
        Err(env::VarError::NotUnicode(value)) => Err(EnvLookupError::NotUnicode {
            name: name.to_string(),
            value,
        }),
    }
}
