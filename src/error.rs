use crate::approval::ApprovalStatus;
use crate::refund::Money;

/// Course weights do not add up to 100%. Publishing must be blocked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Total weight must be 100%. Current: {actual_total}%")]
pub struct WeightError {
    pub actual_total: i64,
}

/// Grading input is empty or malformed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error("course has no assignment components to score")]
    NoComponents,

    #[error("component '{component_id}': max points must be positive, got {max_points}")]
    InvalidMaxPoints { component_id: String, max_points: f64 },

    #[error("component '{component_id}': {reason}")]
    MalformedComponent { component_id: String, reason: String },

    #[error("score for component '{component_id}': {reason}")]
    MalformedScore { component_id: String, reason: String },
}

/// Values outside the engine's domain. Usually an upstream data bug.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("performance score {0} is outside 0-100")]
    ScoreOutOfRange(f64),

    #[error("paid fee cannot be negative: {0}")]
    NegativeFee(Money),

    #[error("invalid fee '{0}': expected an amount like 499 or 499.99")]
    InvalidFee(String),
}

/// Approval workflow violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApprovalError {
    #[error("cannot move a determination from {from} to {to}")]
    InvalidStateTransition {
        from: ApprovalStatus,
        to: ApprovalStatus,
    },

    #[error("'{actor}' is not allowed to review refund determinations")]
    Unauthorized { actor: String },
}
