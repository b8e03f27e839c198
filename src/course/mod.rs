pub mod document;
pub mod types;
pub mod validation;

pub use document::{load_course, load_scores, CourseDocument, ScoreDocument};
pub use types::{AssignmentComponent, Category, ScoreEntry};
pub use validation::validate_weights;
