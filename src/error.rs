//! Error types.
//!
//! - `InterpError` is returned by the pure core (`interp`, `calories`).
//! - `AppError` is the binary-facing error: a message plus a process exit code.

use thiserror::Error;

/// Errors produced by the interpolation and calorie core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpError {
    /// Not enough known samples to fill the domain.
    #[error("Insufficient data: {known} known step value(s), at least {required} required.")]
    InsufficientData { known: usize, required: usize },

    /// A value or parameter is malformed (non-numeric, negative, non-finite, unordered).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The caller supplied a different number of time keys and values.
    #[error("Got {values} step value(s) for {keys} hour(s); the counts must match.")]
    DomainKeyMismatch { keys: usize, values: usize },
}

impl InterpError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Process exit code used when this error reaches `main`.
    pub fn exit_code(&self) -> u8 {
        match self {
            InterpError::InsufficientData { .. } => 3,
            InterpError::InvalidInput(_) | InterpError::DomainKeyMismatch { .. } => 2,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<InterpError> for AppError {
    fn from(err: InterpError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interp_errors_map_to_exit_codes() {
        let err: AppError = InterpError::InsufficientData { known: 0, required: 1 }.into();
        assert_eq!(err.exit_code(), 3);
        assert!(err.message().contains("0 known"));

        let err: AppError = InterpError::DomainKeyMismatch { keys: 5, values: 4 }.into();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "Got 4 step value(s) for 5 hour(s); the counts must match.");
    }
}
