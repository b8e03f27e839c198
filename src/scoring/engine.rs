use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::course::{AssignmentComponent, ScoreEntry};
use crate::error::ScoreError;
use crate::rounding::round_half_even;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentContribution {
    pub component_id: String,
    pub title: String,
    pub weight: u32,
    pub max_points: f64,
    pub earned: Option<f64>, // None when the work was never graded
    pub contribution: f64,   // Clamped to [0, weight]
}

/// Weighted aggregate on the 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceScore {
    pub value: f64,
    #[serde(default)]
    pub breakdown: Vec<ComponentContribution>,
}

impl PerformanceScore {
    /// A score known only by its aggregate value.
    pub fn from_value(value: f64) -> Self {
        Self {
            value,
            breakdown: Vec::new(),
        }
    }

    /// Components with no score entry.
    pub fn missing(&self) -> impl Iterator<Item = &ComponentContribution> {
        self.breakdown.iter().filter(|c| c.earned.is_none())
    }
}

/// Compute a student's weighted performance score for one course.
///
/// A component without a matching score entry contributes 0. Each
/// contribution is clamped to `[0, weight]` since entries may come from
/// untrusted writes. The sum is rounded to one decimal, ties to even.
///
/// Component ids must be unique and matched points must be finite.
pub fn compute_score(
    components: &[AssignmentComponent],
    scores: &[ScoreEntry],
) -> Result<PerformanceScore, ScoreError> {
    if components.is_empty() {
        return Err(ScoreError::NoComponents);
    }

    if let Some(bad) = components.iter().find(|c| !(c.max_points > 0.0)) {
        return Err(ScoreError::InvalidMaxPoints {
            component_id: bad.id.clone(),
            max_points: bad.max_points,
        });
    }

    let mut seen = HashSet::new();
    if let Some(dup) = components.iter().find(|c| !seen.insert(c.id.as_str())) {
        return Err(ScoreError::MalformedComponent {
            component_id: dup.id.clone(),
            reason: "duplicate component id".to_string(),
        });
    }

    let mut total = 0.0;
    let mut breakdown = Vec::with_capacity(components.len());

    for component in components {
        // First entry wins when a component was graded more than once
        let earned = scores
            .iter()
            .find(|s| s.component_id == component.id)
            .map(|s| s.points_earned);
        if let Some(points) = earned.filter(|p| !p.is_finite()) {
            return Err(ScoreError::MalformedScore {
                component_id: component.id.clone(),
                reason: format!("points must be a finite number, got {}", points),
            });
        }

        let weight = f64::from(component.weight);
        let contribution = match earned {
            Some(points) => (points / component.max_points * weight).clamp(0.0, weight),
            None => 0.0,
        };
        total += contribution;

        breakdown.push(ComponentContribution {
            component_id: component.id.clone(),
            title: component.title.clone(),
            weight: component.weight,
            max_points: component.max_points,
            earned,
            contribution,
        });
    }

    let value = round_half_even(total, 1).clamp(0.0, 100.0);
    tracing::debug!(
        value,
        components = components.len(),
        graded = breakdown.iter().filter(|c| c.earned.is_some()).count(),
        "computed performance score"
    );

    Ok(PerformanceScore { value, breakdown })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::Category;

    fn component(id: &str, weight: u32, max_points: f64) -> AssignmentComponent {
        AssignmentComponent {
            id: id.to_string(),
            title: format!("Assignment {}", id),
            category: Category::Homework,
            weight,
            max_points,
        }
    }

    fn entry(component_id: &str, points: f64) -> ScoreEntry {
        ScoreEntry {
            component_id: component_id.to_string(),
            student_id: "stu-1".to_string(),
            points_earned: points,
        }
    }

    fn four_quarters() -> Vec<AssignmentComponent> {
        vec![
            component("a", 25, 100.0),
            component("b", 25, 100.0),
            component("c", 25, 100.0),
            component("d", 25, 100.0),
        ]
    }

    #[test]
    fn test_perfect_scores_reach_100() {
        let scores = vec![
            entry("a", 100.0),
            entry("b", 100.0),
            entry("c", 100.0),
            entry("d", 100.0),
        ];
        let result = compute_score(&four_quarters(), &scores).unwrap();
        assert_eq!(result.value, 100.0);
    }

    #[test]
    fn test_missing_entry_contributes_zero() {
        let scores = vec![entry("a", 100.0), entry("b", 100.0), entry("c", 100.0)];
        let result = compute_score(&four_quarters(), &scores).unwrap();

        assert_eq!(result.value, 75.0);
        let missing: Vec<_> = result.missing().map(|c| c.component_id.as_str()).collect();
        assert_eq!(missing, vec!["d"]);
    }

    #[test]
    fn test_weighted_aggregate() {
        // Course builder defaults: 25/40/15/20
        let components = vec![
            component("hw1", 25, 100.0),
            component("mid", 40, 100.0),
            component("part", 15, 100.0),
            component("proj", 20, 50.0),
        ];
        let scores = vec![
            entry("hw1", 90.0),   // 22.5
            entry("mid", 80.0),   // 32.0
            entry("part", 100.0), // 15.0
            entry("proj", 40.0),  // 16.0
        ];
        let result = compute_score(&components, &scores).unwrap();
        assert_eq!(result.value, 85.5);
        assert_eq!(result.breakdown.len(), 4);
        assert_eq!(result.breakdown[3].contribution, 16.0);
    }

    #[test]
    fn test_overscored_entry_is_clamped() {
        let components = vec![component("a", 50, 100.0), component("b", 50, 100.0)];
        let scores = vec![entry("a", 250.0), entry("b", 0.0)];
        let result = compute_score(&components, &scores).unwrap();
        assert_eq!(result.value, 50.0);
        assert_eq!(result.breakdown[0].contribution, 50.0);
    }

    #[test]
    fn test_negative_entry_is_clamped() {
        let components = vec![component("a", 50, 100.0), component("b", 50, 100.0)];
        let scores = vec![entry("a", -40.0), entry("b", 100.0)];
        let result = compute_score(&components, &scores).unwrap();
        assert_eq!(result.value, 50.0);
    }

    #[test]
    fn test_rounds_half_to_even() {
        let components = vec![component("a", 100, 1000.0)];
        let result = compute_score(&components, &[entry("a", 722.5)]).unwrap();
        // 72.25 -> 72.2
        assert_eq!(result.value, 72.2);

        let result = compute_score(&components, &[entry("a", 723.5)]).unwrap();
        // 72.35 -> 72.4
        assert_eq!(result.value, 72.4);
    }

    #[test]
    fn test_idempotent() {
        let scores = vec![entry("a", 33.0), entry("c", 67.0)];
        let first = compute_score(&four_quarters(), &scores).unwrap();
        let second = compute_score(&four_quarters(), &scores).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_first_duplicate_entry_wins() {
        let components = vec![component("a", 100, 100.0)];
        let scores = vec![entry("a", 60.0), entry("a", 90.0)];
        assert_eq!(compute_score(&components, &scores).unwrap().value, 60.0);
    }

    #[test]
    fn test_unknown_entries_ignored() {
        let components = vec![component("a", 100, 100.0)];
        let scores = vec![entry("zzz", 100.0), entry("a", 70.0)];
        assert_eq!(compute_score(&components, &scores).unwrap().value, 70.0);
    }

    #[test]
    fn test_empty_components_is_error() {
        assert_eq!(
            compute_score(&[], &[entry("a", 1.0)]),
            Err(ScoreError::NoComponents)
        );
    }

    #[test]
    fn test_duplicate_component_ids_are_error() {
        let components = vec![component("2", 50, 100.0), component("2", 50, 100.0)];
        let err = compute_score(&components, &[entry("2", 100.0)]).unwrap_err();
        assert!(matches!(
            err,
            ScoreError::MalformedComponent { ref component_id, .. } if component_id == "2"
        ));
    }

    #[test]
    fn test_non_finite_points_are_error() {
        let components = vec![component("a", 100, 100.0)];
        for points in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = compute_score(&components, &[entry("a", points)]).unwrap_err();
            assert!(matches!(
                err,
                ScoreError::MalformedScore { ref component_id, .. } if component_id == "a"
            ));
        }
    }

    #[test]
    fn test_non_finite_points_on_unknown_component_ignored() {
        let components = vec![component("a", 100, 100.0)];
        let scores = vec![entry("zzz", f64::NAN), entry("a", 40.0)];
        assert_eq!(compute_score(&components, &scores).unwrap().value, 40.0);
    }

    #[test]
    fn test_non_positive_max_points_is_error() {
        let components = vec![component("a", 50, 100.0), component("b", 50, 0.0)];
        let err = compute_score(&components, &[]).unwrap_err();
        assert!(matches!(
            err,
            ScoreError::InvalidMaxPoints { ref component_id, .. } if component_id == "b"
        ));
    }
}
