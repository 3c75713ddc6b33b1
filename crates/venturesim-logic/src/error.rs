//! Error types for venturesim-logic.
//!
//! Three families, matching where a failure originates:
//! configuration structure, degenerate arithmetic, and out-of-range inputs.

use thiserror::Error;

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised by the calculators and the projection engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// The shape of the supplied configuration cannot drive a projection.
    #[error("configuration error: {0}")]
    Configuration(ConfigurationIssue),

    /// A ratio would divide by a zero or negative quantity, or a computed
    /// quantity overflowed to a non-finite value.
    #[error("domain error: {quantity} is outside its domain, got {value}")]
    Domain { quantity: &'static str, value: f64 },

    /// A rate, price, or count lies outside its valid range.
    #[error("range error: {field} out of range, got {value}")]
    Range { field: &'static str, value: f64 },
}

/// Structural problems with the horizon or the stage list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationIssue {
    #[error("horizon must be at least one month, got {0}")]
    NonPositiveHorizon(u32),

    #[error("stage list is empty")]
    EmptyStages,

    #[error("stage '{name}' ends (month {end}) before it starts (month {start})")]
    InvertedStage { name: String, start: u32, end: u32 },

    #[error("first stage starts at month {0}, expected month 1")]
    FirstStageStart(u32),

    #[error("months {from}..={to} are not covered by any stage")]
    Gap { from: u32, to: u32 },

    #[error("stages '{first}' and '{second}' overlap at month {month}")]
    Overlap {
        first: String,
        second: String,
        month: u32,
    },
}

impl From<ConfigurationIssue> for ModelError {
    fn from(issue: ConfigurationIssue) -> Self {
        ModelError::Configuration(issue)
    }
}

/// Divide, failing with a domain error unless the denominator is positive.
pub(crate) fn checked_ratio(
    numerator: f64,
    denominator: f64,
    quantity: &'static str,
) -> Result<f64> {
    if denominator > 0.0 && denominator.is_finite() {
        Ok(numerator / denominator)
    } else {
        Err(ModelError::Domain {
            quantity,
            value: denominator,
        })
    }
}

/// Fail with a domain error unless `value` is positive and finite.
pub(crate) fn ensure_positive(quantity: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ModelError::Domain { quantity, value })
    }
}

/// Fail with a domain error if `value` is NaN or infinite.
pub(crate) fn ensure_finite(quantity: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ModelError::Domain { quantity, value })
    }
}
