//! Error handling for the evaluator
//!
//! Defines the fatal evaluation errors and establishes a unified Result
//! type using anyhow for context chaining and error propagation. None of
//! these errors are retryable: each one means the model of the data or the
//! configuration is wrong, so the run must stop rather than produce a
//! silently corrupted answer.

use thiserror::Error;

/// Fatal evaluation errors
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("unsupported operation type: {0}")]
    UnsupportedOperation(String),

    #[error("no exchange rate configured for currency: {0}")]
    MissingExchangeRate(String),

    #[error("no portfolio state fell inside tax year {0}")]
    NoEligibleCandidate(i32),
}

/// Result type alias for evaluator operations
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting_is_readable() {
        let err = EvalError::UnsupportedOperation("OPERATION_TYPE_MARGIN_FEE".to_string());
        assert_eq!(
            err.to_string(),
            "unsupported operation type: OPERATION_TYPE_MARGIN_FEE"
        );

        let err = EvalError::MissingExchangeRate("xyz".to_string());
        assert_eq!(err.to_string(), "no exchange rate configured for currency: xyz");

        let err = EvalError::NoEligibleCandidate(2025);
        assert!(err.to_string().contains("2025"));
    }

    #[test]
    fn test_anyhow_context_chains_errors() {
        use anyhow::Context;
        let result: Result<()> = Err(EvalError::MissingExchangeRate("brl".to_string()))
            .map_err(anyhow::Error::from)
            .context("failed to aggregate cost");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("failed to aggregate cost"));
        let debug_msg = format!("{:?}", err);
        assert!(debug_msg.contains("brl"));
    }
}
