use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::ApprovalError;
use crate::refund::{Money, RefundDetermination};
use crate::scoring::PerformanceScore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    /// Status a freshly computed determination starts in. Only review-band
    /// determinations wait for an approver.
    pub fn initial_for(determination: &RefundDetermination) -> Self {
        if determination.requires_review {
            ApprovalStatus::Pending
        } else {
            ApprovalStatus::Approved
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ApprovalStatus::Pending)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn target(&self) -> ApprovalStatus {
        match self {
            Decision::Approve => ApprovalStatus::Approved,
            Decision::Reject => ApprovalStatus::Rejected,
        }
    }
}

/// Whoever is acting on a determination, passed explicitly into each call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub can_review: bool,
}

impl Actor {
    pub fn reviewer(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            can_review: true,
        }
    }

    pub fn member(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            can_review: false,
        }
    }
}

/// Apply `decision` to a determination currently in `current`.
///
/// Repeating the decision that produced a terminal state is a no-op.
/// Reversing a terminal state is rejected.
pub fn transition(
    current: ApprovalStatus,
    decision: Decision,
    actor: &Actor,
) -> Result<ApprovalStatus, ApprovalError> {
    if !actor.can_review {
        return Err(ApprovalError::Unauthorized {
            actor: actor.id.clone(),
        });
    }

    let target = decision.target();
    match current {
        ApprovalStatus::Pending => Ok(target),
        terminal if terminal == target => Ok(terminal),
        terminal => Err(ApprovalError::InvalidStateTransition {
            from: terminal,
            to: target,
        }),
    }
}

/// A determination as persisted in the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeterminationRecord {
    pub id: Uuid,
    pub student_id: String,
    pub course_id: String,
    pub score: PerformanceScore,
    pub determination: RefundDetermination,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub decided_by: Option<String>,
}

impl DeterminationRecord {
    pub fn new(
        student_id: impl Into<String>,
        course_id: impl Into<String>,
        score: PerformanceScore,
        determination: RefundDetermination,
    ) -> Self {
        let status = ApprovalStatus::initial_for(&determination);
        Self {
            id: Uuid::new_v4(),
            student_id: student_id.into(),
            course_id: course_id.into(),
            score,
            determination,
            status,
            created_at: Utc::now(),
            decided_at: None,
            decided_by: None,
        }
    }

    /// Amount actually paid out. `None` while the record is still pending.
    pub fn effective_payout(&self) -> Option<Money> {
        match self.status {
            ApprovalStatus::Pending => None,
            ApprovalStatus::Approved => Some(self.determination.amount),
            ApprovalStatus::Rejected => Some(Money::ZERO),
        }
    }
}
