//! Seller readiness scoring: table-driven category rubrics aggregated into a
//! weighted overall score and letter grade.

mod config;
mod engine;
mod rubric;

#[cfg(test)]
mod tests;

pub use config::{
    ConfigurationError, Grade, GradeBand, GradeScale, ReadinessConfig, WEIGHT_TOLERANCE,
};
pub use engine::{ReadinessEngine, ReadinessError, SellerReadinessResult};
pub use rubric::{
    CategoryId, CategoryRubric, CategoryScore, ColorBand, Condition, RawInput, RubricRule,
    NEUTRAL_SCORE,
};
