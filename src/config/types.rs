/// Core error and result types for probebox
use thiserror::Error;

/// Reasons a submission fails signature validation.
///
/// Every variant is fatal for the validation call. The submission has to be
/// changed (or the declared contract fixed, for `UnsupportedType`) before a
/// retry can succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The class {0} cannot be found")]
    ClassNotFound(String),

    #[error("The match public method {0} in class {1} cannot be found")]
    MethodNotFound(String, String),

    /// Declared type name outside the supported vocabulary (caller input error)
    #[error("Value type <{0}> is not accepted")]
    UnsupportedType(String),

    #[error("The output type {0} does not match")]
    ReturnTypeMismatch(String),

    #[error("The public method {0} in class {1} is static")]
    UnexpectedStaticModifier(String, String),
}

impl ValidationError {
    /// Stable short code used in audit records
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::ClassNotFound(_) => "class_not_found",
            ValidationError::MethodNotFound(..) => "method_not_found",
            ValidationError::UnsupportedType(_) => "unsupported_type",
            ValidationError::ReturnTypeMismatch(_) => "return_type_mismatch",
            ValidationError::UnexpectedStaticModifier(..) => "unexpected_static_modifier",
        }
    }
}

/// Errors raised by a submission's own method body.
///
/// The profiled invoker passes these through untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmissionError {
    #[error("Submission failed: {0}")]
    Failed(String),

    #[error("Submission has no callable method {0}")]
    NoSuchMethod(String),

    #[error("Argument {index} is not a value of type {expected}")]
    InvalidArgument { index: usize, expected: String },
}

impl SubmissionError {
    pub fn failed(message: impl Into<String>) -> Self {
        SubmissionError::Failed(message.into())
    }

    pub fn invalid_argument(index: usize, expected: impl Into<String>) -> Self {
        SubmissionError::InvalidArgument {
            index,
            expected: expected.into(),
        }
    }
}

/// Custom error types for probebox
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Memory sample unavailable: {0}")]
    MemorySample(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for probebox operations
pub type Result<T> = std::result::Result<T, ProbeError>;
