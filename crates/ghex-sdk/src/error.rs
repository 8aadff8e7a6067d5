//! Error types for the native boundary

/// Result type for calls into native modules
pub type AbiResult<T> = Result<T, NativeError>;

/// Native module error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NativeError {
    /// Type mismatch during conversion
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual type name
        got: String,
    },

    /// Invalid argument
    #[error("Argument error: {0}")]
    ArgumentError(String),

    /// Required argument was not supplied, positionally or by name
    #[error("Missing argument '{0}'")]
    MissingArgument(String),

    /// Class is exported but cannot be constructed from the caller's side
    #[error("Class '{0}' has no constructor")]
    NoConstructor(String),

    /// Class does not export the requested field or method
    #[error("'{class}' has no member '{member}'")]
    NoSuchMember {
        /// Exported class name
        class: String,
        /// Requested member
        member: String,
    },

    /// Method exists but no overload takes this many arguments
    #[error("No overload of '{class}.{method}' takes {arity} argument(s)")]
    NoMatchingOverload {
        /// Exported class name
        class: String,
        /// Method name
        method: String,
        /// Number of arguments supplied
        arity: usize,
    },

    /// Failure raised by native code
    #[error("{0}")]
    Raised(String),
}

impl From<String> for NativeError {
    fn from(s: String) -> Self {
        NativeError::Raised(s)
    }
}

impl From<&str> for NativeError {
    fn from(s: &str) -> Self {
        NativeError::Raised(s.to_string())
    }
}
