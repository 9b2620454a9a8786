use std::fmt;

/// Result type for palaestra operations
pub type Result<T> = std::result::Result<T, PalaestraError>;

/// Main error type for the palaestra library
#[derive(Debug, Clone)]
pub enum PalaestraError {
    /// Invalid dimensions for operations
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Serialization/deserialization errors
    SerializationError(String),

    /// Numerical computation errors
    NumericalError(String),

    /// Empty buffer or container
    EmptyBuffer(String),

    /// Invalid action index
    InvalidAction {
        action: usize,
        num_actions: usize,
    },
}

impl fmt::Display for PalaestraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PalaestraError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            PalaestraError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            PalaestraError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            PalaestraError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            PalaestraError::EmptyBuffer(msg) => write!(f, "Empty buffer: {}", msg),
            PalaestraError::InvalidAction { action, num_actions } => {
                write!(f, "Invalid action {}: must be less than {}", action, num_actions)
            }
        }
    }
}

impl std::error::Error for PalaestraError {}

// Conversion from bincode::Error
impl From<bincode::Error> for PalaestraError {
    fn from(err: bincode::Error) -> Self {
        PalaestraError::SerializationError(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PalaestraError {
    fn from(err: serde_json::Error) -> Self {
        PalaestraError::SerializationError(err.to_string())
    }
}

// Helper functions for common error patterns
impl PalaestraError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        PalaestraError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        PalaestraError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
