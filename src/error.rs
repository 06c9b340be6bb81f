use std::fmt;

/// Result type for digitnet operations
pub type Result<T> = std::result::Result<T, DigitNetError>;

/// Main error type for the digitnet library.
///
/// Every variant is a precondition violation of the failing call. Nothing is
/// retried internally; the caller decides whether the run should be aborted.
#[derive(Debug, Clone, PartialEq)]
pub enum DigitNetError {
    /// A required argument is missing or outside its domain
    InvalidArgument {
        name: String,
        reason: String,
    },

    /// Non-positive matrix dimension
    InvalidDimension {
        rows: usize,
        cols: usize,
    },

    /// Illegal layer shape (node count)
    InvalidShape(String),

    /// Two matrices are incompatible for the requested operation
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// 1-based network position out of range
    InvalidPosition {
        position: usize,
        len: usize,
    },

    /// Malformed network options
    InvalidOptions(String),

    /// Backing storage could not be obtained
    AllocationFailure {
        requested: usize,
    },

    /// Operation attempted on a matrix that is not valid
    InvalidMatrix(String),

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),

    /// A dataset record could not be parsed
    ParseError {
        line: usize,
        reason: String,
    },
}

impl fmt::Display for DigitNetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigitNetError::InvalidArgument { name, reason } => {
                write!(f, "Invalid argument '{}': {}", name, reason)
            }
            DigitNetError::InvalidDimension { rows, cols } => {
                write!(f, "Invalid dimension {}x{}: rows and cols should be positive", rows, cols)
            }
            DigitNetError::InvalidShape(msg) => write!(f, "Invalid shape: {}", msg),
            DigitNetError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            DigitNetError::InvalidPosition { position, len } => {
                write!(f, "Invalid position {}: network has {} layers", position, len)
            }
            DigitNetError::InvalidOptions(msg) => write!(f, "Invalid options: {}", msg),
            DigitNetError::AllocationFailure { requested } => {
                write!(f, "Allocation failed for {} entries", requested)
            }
            DigitNetError::InvalidMatrix(msg) => write!(f, "Invalid matrix: {}", msg),
            DigitNetError::IoError(msg) => write!(f, "IO error: {}", msg),
            DigitNetError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            DigitNetError::ParseError { line, reason } => {
                write!(f, "Parse error on line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for DigitNetError {}

// Conversion from std::io::Error
impl From<std::io::Error> for DigitNetError {
    fn from(err: std::io::Error) -> Self {
        DigitNetError::IoError(err.to_string())
    }
}

// Conversion from bincode::Error
impl From<bincode::Error> for DigitNetError {
    fn from(err: bincode::Error) -> Self {
        DigitNetError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for DigitNetError {
    fn from(err: serde_json::Error) -> Self {
        DigitNetError::SerializationError(err.to_string())
    }
}

impl From<csv::Error> for DigitNetError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|pos| pos.line() as usize).unwrap_or(0);
        DigitNetError::ParseError {
            line,
            reason: err.to_string(),
        }
    }
}

// Helper functions for common error patterns
impl DigitNetError {
    pub fn invalid_argument<S: Into<String>>(name: S, reason: S) -> Self {
        DigitNetError::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        DigitNetError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_matrix<S: Into<String>>(msg: S) -> Self {
        DigitNetError::InvalidMatrix(msg.into())
    }

    pub fn invalid_options<S: Into<String>>(msg: S) -> Self {
        DigitNetError::InvalidOptions(msg.into())
    }
}
