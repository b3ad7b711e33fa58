use std::{fmt, io};

use crate::gym::penalty_kick::Pos;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring, training or evaluating
#[derive(Debug)]
pub enum Error {
    /// A hyperparameter or layout value is outside its valid range
    InvalidParameter { name: String, reason: String },

    /// An action index that does not name one of the four moves
    InvalidAction(usize),

    /// A position outside the grid
    OutOfBounds { pos: Pos, size: usize },

    /// A loaded Q-table does not fit the environment
    DimensionMismatch { expected: String, actual: String },

    /// Filesystem failure
    Io(io::Error),

    /// Table (de)serialization or export failure
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter `{name}`: {reason}")
            }
            Error::InvalidAction(action) => {
                write!(f, "Invalid action {action}: must be less than 4")
            }
            Error::OutOfBounds { pos, size } => write!(
                f,
                "Position ({}, {}) is outside the {size}x{size} grid",
                pos.0, pos.1
            ),
            Error::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {expected}, got {actual}")
            }
            Error::Io(err) => write!(f, "IO error: {err}"),
            Error::Serialization(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl Error {
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
