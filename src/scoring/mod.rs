pub mod engine;

pub use engine::{compute_score, ComponentContribution, PerformanceScore};
