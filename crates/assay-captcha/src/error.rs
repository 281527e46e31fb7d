//! Error types for CAPTCHA evaluation.

use thiserror::Error;

/// Errors that can occur while solving a CAPTCHA.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaptchaError {
    /// The expression or question text was empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// The expression contains something other than integers and `+ - *`.
    #[error("invalid expression format: {0}")]
    InvalidFormat(String),

    /// No expression with at least one operator was found in the question.
    #[error("no arithmetic expression found in: {0}")]
    NoExpression(String),

    /// An operand or intermediate result does not fit in an `i64`.
    #[error("arithmetic overflow in: {0}")]
    Overflow(String),
}

/// Convenience type alias for CAPTCHA operations.
pub type Result<T> = std::result::Result<T, CaptchaError>;
