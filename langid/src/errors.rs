//! Definition of errors.

use std::error::Error;
use std::fmt;

pub type Result<T, E = LangidError> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum LangidError {
    InvalidModel(InvalidModelError),
    InvalidArgument(InvalidArgumentError),
    DimensionMismatch(DimensionMismatchError),
    DecodeError(bincode::error::DecodeError),
    EncodeError(bincode::error::EncodeError),
    IOError(std::io::Error),
}

impl LangidError {
    pub(crate) fn invalid_model<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidModel(InvalidModelError { msg: msg.into() })
    }

    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn dimension_mismatch<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::DimensionMismatch(DimensionMismatchError { msg: msg.into() })
    }
}

impl fmt::Display for LangidError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidModel(e) => e.fmt(f),
            Self::InvalidArgument(e) => e.fmt(f),
            Self::DimensionMismatch(e) => e.fmt(f),
            Self::DecodeError(e) => e.fmt(f),
            Self::EncodeError(e) => e.fmt(f),
            Self::IOError(e) => e.fmt(f),
        }
    }
}

impl Error for LangidError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DecodeError(e) => Some(e),
            Self::EncodeError(e) => Some(e),
            Self::IOError(e) => Some(e),
            _ => None,
        }
    }
}

/// Error used when the model is invalid or has not been trained.
#[derive(Debug)]
pub struct InvalidModelError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidModelError: {}", self.msg)
    }
}

impl Error for InvalidModelError {}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl InvalidArgumentError {
    /// Name of the offending argument.
    pub fn arg(&self) -> &'static str {
        self.arg
    }
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// Error used when samples and labels do not line up.
#[derive(Debug)]
pub struct DimensionMismatchError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for DimensionMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DimensionMismatchError: {}", self.msg)
    }
}

impl Error for DimensionMismatchError {}

impl From<bincode::error::DecodeError> for LangidError {
    fn from(error: bincode::error::DecodeError) -> Self {
        Self::DecodeError(error)
    }
}

impl From<bincode::error::EncodeError> for LangidError {
    fn from(error: bincode::error::EncodeError) -> Self {
        Self::EncodeError(error)
    }
}

impl From<std::io::Error> for LangidError {
    fn from(error: std::io::Error) -> Self {
        Self::IOError(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_message() {
        let e = LangidError::invalid_argument("max_features", "must be positive");
        assert_eq!(
            "InvalidArgumentError: max_features: must be positive",
            e.to_string()
        );
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let e = LangidError::dimension_mismatch("3 samples but 2 labels");
        assert_eq!("DimensionMismatchError: 3 samples but 2 labels", e.to_string());
    }
}
