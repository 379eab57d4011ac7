//! Error types for rangestore

use std::fmt;
use std::io;

/// Result type alias for rangestore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for array and trace operations
#[derive(Debug)]
pub enum Error {
    /// Index is not a position of the array
    IndexOutOfBounds {
        /// Offending index
        index: usize,
        /// Array length
        len: usize,
    },

    /// Interval is reversed or reaches past the end of the array
    InvalidInterval {
        /// Left endpoint
        left: usize,
        /// Right endpoint
        right: usize,
        /// Array length, when the interval was checked against one
        len: Option<usize>,
    },

    /// Range sum does not fit in `i64`
    Overflow {
        /// Left endpoint
        left: usize,
        /// Right endpoint
        right: usize,
    },

    /// Malformed workload trace
    Parse(String),

    /// I/O error while reading or writing a trace
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IndexOutOfBounds { index, len } => {
                write!(f, "Index out of bounds: {} (len {})", index, len)
            }
            Error::InvalidInterval {
                left,
                right,
                len: Some(len),
            } => write!(f, "Invalid interval: [{}, {}] (len {})", left, right, len),
            Error::InvalidInterval {
                left,
                right,
                len: None,
            } => write!(f, "Invalid interval: [{}, {}]", left, right),
            Error::Overflow { left, right } => {
                write!(f, "Range sum overflow: [{}, {}]", left, right)
            }
            Error::Parse(msg) => write!(f, "Parse error: {}", msg),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<nom::Err<nom::error::Error<&str>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Self {
        Error::Parse(format!("{:?}", err))
    }
}
