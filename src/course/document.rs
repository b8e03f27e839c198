//! Course and score documents as they arrive from the document store.
//!
//! Documents are deserialized into loosely typed structs first and then
//! checked field by field before anything reaches the engine.
//!
//! Example course document:
//! ```yaml
//! id: calc-101
//! title: Advanced Calculus
//! fee: 499
//! components:
//!   - { title: "Homework 1", type: homework, weight: 25 }
//!   - { title: "Midterm Exam", type: test, weight: 40 }
//!   - { title: "Participation", type: engagement, weight: 15 }
//!   - { title: "Final Project", type: homework, weight: 20, max_points: 50 }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::types::{AssignmentComponent, Category, ScoreEntry};
use crate::error::{DomainError, ScoreError};
use crate::refund::Money;

/// Max points assumed when a component document does not carry one.
pub const DEFAULT_MAX_POINTS: f64 = 100.0;

/// A monetary amount written either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    pub fn to_money(&self) -> Result<Money, DomainError> {
        let money = match self {
            RawAmount::Number(n) => Money::from_major(*n)?,
            RawAmount::Text(s) => Money::parse(s)?,
        };
        if money.is_negative() {
            return Err(DomainError::NegativeFee(money));
        }
        Ok(money)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CourseDocument {
    pub id: String,
    pub title: String,
    #[serde(default, alias = "price")]
    pub fee: Option<RawAmount>,
    pub components: Vec<RawComponent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawComponent {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(rename = "type")]
    pub category: String,
    pub weight: f64,
    #[serde(default)]
    pub max_points: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScoreDocument {
    pub student_id: String,
    #[serde(default)]
    pub course_id: Option<String>,
    pub scores: Vec<RawScore>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawScore {
    pub component_id: String,
    #[serde(alias = "points_earned")]
    pub points: f64,
}

impl CourseDocument {
    /// Convert the raw component list into typed components.
    ///
    /// Components without an id get their 1-based position as id. Ids
    /// must be unique once defaulted.
    pub fn components(&self) -> Result<Vec<AssignmentComponent>, ScoreError> {
        let components = self
            .components
            .iter()
            .enumerate()
            .map(|(i, raw)| raw.to_component(i + 1))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        if let Some(dup) = components.iter().find(|c| !seen.insert(c.id.as_str())) {
            return Err(ScoreError::MalformedComponent {
                component_id: dup.id.clone(),
                reason: "duplicate component id".to_string(),
            });
        }

        Ok(components)
    }

    /// Tuition fee declared on the course, if any.
    pub fn fee(&self) -> Result<Option<Money>, DomainError> {
        self.fee.as_ref().map(RawAmount::to_money).transpose()
    }
}

impl RawComponent {
    fn to_component(&self, position: usize) -> Result<AssignmentComponent, ScoreError> {
        let id = match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => position.to_string(),
        };
        let malformed = |reason: String| ScoreError::MalformedComponent {
            component_id: id.clone(),
            reason,
        };

        if self.title.trim().is_empty() {
            return Err(malformed("title cannot be empty".to_string()));
        }

        let category = Category::parse(&self.category).ok_or_else(|| {
            malformed(format!(
                "unknown type '{}' (expected homework, test, engagement or improvement)",
                self.category
            ))
        })?;

        let weight = self.weight;
        if !weight.is_finite() || weight.fract() != 0.0 {
            return Err(malformed(format!("weight must be a whole percent, got {}", weight)));
        }
        if !(0.0..=100.0).contains(&weight) {
            return Err(malformed(format!("weight must be between 0 and 100, got {}", weight)));
        }

        let max_points = self.max_points.unwrap_or(DEFAULT_MAX_POINTS);
        if !max_points.is_finite() {
            return Err(malformed("max points must be a finite number".to_string()));
        }

        Ok(AssignmentComponent {
            id: id.clone(),
            title: self.title.trim().to_string(),
            category,
            weight: weight as u32,
            max_points,
        })
    }
}

impl ScoreDocument {
    /// Convert raw score rows into typed entries for this document's student.
    pub fn entries(&self) -> Result<Vec<ScoreEntry>, ScoreError> {
        self.scores
            .iter()
            .map(|raw| {
                if !raw.points.is_finite() {
                    return Err(ScoreError::MalformedScore {
                        component_id: raw.component_id.clone(),
                        reason: "points must be a finite number".to_string(),
                    });
                }
                Ok(ScoreEntry {
                    component_id: raw.component_id.trim().to_string(),
                    student_id: self.student_id.clone(),
                    points_earned: raw.points,
                })
            })
            .collect()
    }
}

/// Load a course document (YAML or JSON) from disk.
pub fn load_course(path: &Path) -> Result<CourseDocument> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read course file at {}", path.display()))?;
    serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse course document in {}", path.display()))
}

/// Load a score document (YAML or JSON) from disk.
pub fn load_scores(path: &Path) -> Result<ScoreDocument> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read score file at {}", path.display()))?;
    serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse score document in {}", path.display()))
}
