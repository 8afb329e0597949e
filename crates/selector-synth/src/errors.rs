//! Error types for selector synthesis

use thiserror::Error;

/// Failure reported by a [`DomTree`](crate::tree::DomTree) query primitive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The expression could not be parsed as a selector
    #[error("selector '{expression}' rejected: {reason}")]
    Rejected { expression: String, reason: String },

    /// The tree refused to evaluate the expression
    #[error("query unavailable: {0}")]
    Unavailable(String),
}

impl QueryError {
    pub fn rejected(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            expression: expression.into(),
            reason: reason.into(),
        }
    }
}

/// Synthesis error enumeration
#[derive(Debug, Error, Clone)]
pub enum SynthError {
    /// Target node is not attached to the queried tree
    #[error("Target node is detached: {0}")]
    DetachedTarget(String),

    /// Query primitive failure
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A pattern table rule did not compile
    #[error("Invalid pattern '{pattern}' in {table}: {reason}")]
    InvalidPattern {
        table: String,
        pattern: String,
        reason: String,
    },

    /// Synthesis options out of range
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Strategy execution failed
    #[error("Strategy '{strategy}' failed: {reason}")]
    StrategyFailed { strategy: String, reason: String },
}

impl SynthError {
    /// Whether the engine can skip the failing unit and carry on
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SynthError::Query(_) | SynthError::StrategyFailed { .. }
        )
    }

    /// Get error severity (0=low, 1=medium, 2=high)
    pub fn severity(&self) -> u8 {
        match self {
            SynthError::InvalidPattern { .. } | SynthError::InvalidOptions(_) => 2,
            SynthError::DetachedTarget(_) | SynthError::StrategyFailed { .. } => 1,
            SynthError::Query(_) => 0,
        }
    }
}

pub type SynthResult<T> = Result<T, SynthError>;
