use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of gradable work a component represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Homework,
    Test,
    Engagement,
    Improvement,
}

impl Category {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "homework" => Some(Category::Homework),
            "test" => Some(Category::Test),
            "engagement" => Some(Category::Engagement),
            "improvement" => Some(Category::Improvement),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Homework => "homework",
            Category::Test => "test",
            Category::Engagement => "engagement",
            Category::Improvement => "improvement",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A weighted gradable unit within a course.
///
/// `weight` is an integer percentage. The weights of all components in a
/// course must add up to exactly 100 before the course can be published.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AssignmentComponent {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub weight: u32,
    pub max_points: f64,
}

/// A student's raw result for one component.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScoreEntry {
    pub component_id: String,
    pub student_id: String,
    pub points_earned: f64,
}
