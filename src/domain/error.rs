use thiserror::Error;

/// Errors raised by the pure rewards calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RewardsError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Valid input whose result does not fit a `Decimal`
    #[error("Out of range: {0}")]
    OutOfRange(String),
}

impl RewardsError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        RewardsError::InvalidArgument(msg.into())
    }

    pub(crate) fn out_of_range(msg: impl Into<String>) -> Self {
        RewardsError::OutOfRange(msg.into())
    }
}

/// Reject negative, NaN and infinite inputs
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> Result<f64, RewardsError> {
    if !value.is_finite() {
        return Err(RewardsError::invalid(format!(
            "{} must be a finite number, got {}",
            field, value
        )));
    }
    if value < 0.0 {
        return Err(RewardsError::invalid(format!(
            "{} must be >= 0, got {}",
            field, value
        )));
    }
    Ok(value)
}
