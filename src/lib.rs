//! Reward computation engine for performance-based tuition refunds.
//!
//! A course publishes a weight table of assignment components. A student's
//! raw scores are folded into a weighted performance score, which the
//! refund policy maps to a refund percentage, amount and review flag.
//! Review-band determinations are finalized through the approval workflow.

pub mod approval;
pub mod config;
pub mod course;
pub mod error;
pub mod logging;
pub mod output;
pub mod refund;
pub mod rounding;
pub mod scoring;

pub use error::{ApprovalError, DomainError, ScoreError, WeightError};
