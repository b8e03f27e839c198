use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::types::{ApprovalStatus, DeterminationRecord};
use crate::refund::Money;

/// One line of a student's refund history.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletEntry {
    pub id: Uuid,
    pub course_id: String,
    pub created_at: DateTime<Utc>,
    pub status: ApprovalStatus,
    /// Payout once decided; the determined amount while still pending.
    pub amount: Money,
}

impl WalletEntry {
    pub fn description(&self) -> String {
        format!("{} refund", self.course_id)
    }
}

/// Sum of approved payouts for one student.
pub fn wallet_balance(records: &[DeterminationRecord], student_id: &str) -> Money {
    records
        .iter()
        .filter(|r| r.student_id == student_id)
        .filter_map(DeterminationRecord::effective_payout)
        .sum()
}

/// Every determination for one student, newest first.
pub fn wallet_history(records: &[DeterminationRecord], student_id: &str) -> Vec<WalletEntry> {
    let mut history: Vec<_> = records
        .iter()
        .filter(|r| r.student_id == student_id)
        .map(|r| WalletEntry {
            id: r.id,
            course_id: r.course_id.clone(),
            created_at: r.created_at,
            status: r.status,
            amount: r.effective_payout().unwrap_or(r.determination.amount),
        })
        .collect();
    history.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    history
}

/// Records awaiting a reviewer, oldest first.
pub fn pending_records(records: &[DeterminationRecord]) -> Vec<&DeterminationRecord> {
    let mut pending: Vec<_> = records
        .iter()
        .filter(|r| r.status == ApprovalStatus::Pending)
        .collect();
    pending.sort_by_key(|r| r.created_at);
    pending
}
