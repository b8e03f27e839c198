use super::types::AssignmentComponent;
use crate::error::WeightError;

/// Required total of all component weights in a course.
pub const REQUIRED_TOTAL_WEIGHT: i64 = 100;

/// Validate a course's weight table before it is published.
///
/// Succeeds only when the weights add up to exactly 100. Order of the
/// components does not matter.
pub fn validate_weights(components: &[AssignmentComponent]) -> Result<(), WeightError> {
    let actual_total: i64 = components.iter().map(|c| i64::from(c.weight)).sum();

    if actual_total == REQUIRED_TOTAL_WEIGHT {
        tracing::debug!(components = components.len(), "course weights valid");
        Ok(())
    } else {
        tracing::debug!(actual_total, "course weights do not total 100");
        Err(WeightError { actual_total })
    }
}
