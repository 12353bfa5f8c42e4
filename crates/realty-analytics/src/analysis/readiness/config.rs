use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::rubric::{CategoryId, CategoryRubric, Condition, RubricRule};

pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Letter grade, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeBand {
    pub grade: Grade,
    pub min_score: u8,
    pub label: String,
}

impl GradeBand {
    pub fn new(grade: Grade, min_score: u8, label: impl Into<String>) -> Self {
        Self {
            grade,
            min_score,
            label: label.into(),
        }
    }
}

/// Validated grade ladder: contiguous, exhaustive over 0..=100, and monotonic.
///
/// Bands are listed from the highest threshold down; the last band always
/// starts at zero so every score resolves to a grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GradeBand>", into = "Vec<GradeBand>")]
pub struct GradeScale {
    upper: Vec<GradeBand>,
    floor: GradeBand,
}

impl GradeScale {
    pub fn new(mut bands: Vec<GradeBand>) -> Result<Self, ConfigurationError> {
        let floor = bands.pop().ok_or(ConfigurationError::EmptyGradeScale)?;
        if floor.min_score != 0 {
            return Err(ConfigurationError::GradeFloor {
                min_score: floor.min_score,
            });
        }

        if let Some(top) = bands.first() {
            if top.min_score > 100 {
                return Err(ConfigurationError::GradeCeiling {
                    min_score: top.min_score,
                });
            }
        }

        let ladder: Vec<&GradeBand> = bands.iter().chain(std::iter::once(&floor)).collect();
        for pair in ladder.windows(2) {
            let (higher, lower) = (pair[0], pair[1]);
            if higher.min_score <= lower.min_score || higher.grade >= lower.grade {
                return Err(ConfigurationError::GradeOrder { grade: lower.grade });
            }
        }

        Ok(Self {
            upper: bands,
            floor,
        })
    }

    /// Default seller-readiness ladder.
    pub fn standard() -> Self {
        Self {
            upper: vec![
                GradeBand::new(Grade::A, 90, "Exceptional — ready to list now"),
                GradeBand::new(Grade::B, 80, "Strong — minor prep recommended"),
                GradeBand::new(Grade::C, 65, "Moderate — plan 4–8 weeks of prep"),
                GradeBand::new(Grade::D, 50, "Needs work — significant prep required"),
            ],
            floor: GradeBand::new(Grade::F, 0, "Not ready — schedule a consultation first"),
        }
    }

    pub fn grade_for(&self, score: u8) -> &GradeBand {
        self.upper
            .iter()
            .find(|band| score >= band.min_score)
            .unwrap_or(&self.floor)
    }

    pub fn bands(&self) -> impl Iterator<Item = &GradeBand> {
        self.upper.iter().chain(std::iter::once(&self.floor))
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<GradeBand>> for GradeScale {
    type Error = ConfigurationError;

    fn try_from(value: Vec<GradeBand>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GradeScale> for Vec<GradeBand> {
    fn from(value: GradeScale) -> Self {
        let mut bands = value.upper;
        bands.push(value.floor);
        bands
    }
}

/// Category rubrics and grade ladder for one scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessConfig {
    pub categories: Vec<CategoryRubric>,
    #[serde(default)]
    pub grades: GradeScale,
}

impl ReadinessConfig {
    /// Checks the configuration invariants once, before any scoring.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.categories.is_empty() {
            return Err(ConfigurationError::NoCategories);
        }

        let mut seen = BTreeSet::new();
        let mut total = 0.0;
        for category in &self.categories {
            if !seen.insert(&category.id) {
                return Err(ConfigurationError::DuplicateCategory {
                    category: category.id.clone(),
                });
            }
            if !category.weight.is_finite() || !(0.0..=1.0).contains(&category.weight) {
                return Err(ConfigurationError::InvalidWeight {
                    category: category.id.clone(),
                    weight: category.weight,
                });
            }
            if let Some(rule) = category.rules.iter().find(|rule| rule.score > 100) {
                return Err(ConfigurationError::RuleScoreOutOfRange {
                    category: category.id.clone(),
                    score: rule.score,
                });
            }
            total += category.weight;
        }

        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigurationError::WeightSum { total });
        }

        Ok(())
    }

    /// Built-in six-category seller rubric.
    pub fn standard() -> Self {
        Self {
            categories: vec![
                choice_category(
                    "property_condition",
                    "Property condition",
                    0.25,
                    &[
                        ("move_in_ready", 95),
                        ("minor_repairs", 75),
                        ("major_repairs", 45),
                        ("needs_renovation", 20),
                    ],
                ),
                CategoryRubric {
                    id: CategoryId::new("estimated_repairs"),
                    name: "Estimated repairs".to_string(),
                    weight: 0.15,
                    rules: vec![
                        RubricRule::new(repairs_up_to(2_500.0), 95),
                        RubricRule::new(repairs_up_to(10_000.0), 75),
                        RubricRule::new(repairs_up_to(25_000.0), 55),
                        RubricRule::new(Condition::Always, 30),
                    ],
                },
                choice_category(
                    "market_timing",
                    "Market timing",
                    0.20,
                    &[
                        ("sellers_market", 90),
                        ("balanced", 70),
                        ("buyers_market", 45),
                    ],
                ),
                CategoryRubric {
                    id: CategoryId::new("emotional_readiness"),
                    name: "Emotional readiness to move".to_string(),
                    weight: 0.15,
                    rules: vec![
                        RubricRule::new(Condition::AtLeast { value: 8.0 }, 95),
                        RubricRule::new(Condition::AtLeast { value: 6.0 }, 75),
                        RubricRule::new(Condition::AtLeast { value: 4.0 }, 55),
                        RubricRule::new(Condition::Always, 30),
                    ],
                },
                choice_category(
                    "mortgage_payoff",
                    "Mortgage payoff status",
                    0.15,
                    &[
                        ("paid_off", 100),
                        ("high_equity", 85),
                        ("moderate_equity", 65),
                        ("low_equity", 40),
                        ("underwater", 15),
                    ],
                ),
                choice_category(
                    "move_timeline",
                    "Move timeline",
                    0.10,
                    &[
                        ("ready_now", 95),
                        ("within_3_months", 80),
                        ("within_6_months", 60),
                        ("over_6_months", 40),
                    ],
                ),
            ],
            grades: GradeScale::standard(),
        }
    }
}

fn repairs_up_to(max: f64) -> Condition {
    Condition::Between { min: 0.0, max }
}

fn choice_category(id: &str, name: &str, weight: f64, options: &[(&str, u8)]) -> CategoryRubric {
    CategoryRubric {
        id: CategoryId::new(id),
        name: name.to_string(),
        weight,
        rules: options
            .iter()
            .map(|(value, score)| {
                RubricRule::new(
                    Condition::Equals {
                        value: (*value).to_string(),
                    },
                    *score,
                )
            })
            .collect(),
    }
}

/// Startup-time configuration failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("readiness configuration must define at least one category")]
    NoCategories,
    #[error("category `{category}` is configured more than once")]
    DuplicateCategory { category: CategoryId },
    #[error("category `{category}` has weight {weight}; weights must be between 0 and 1")]
    InvalidWeight { category: CategoryId, weight: f64 },
    #[error("category weights sum to {total}, expected 1.0")]
    WeightSum { total: f64 },
    #[error("category `{category}` has a rule scoring {score}; scores must be 0-100")]
    RuleScoreOutOfRange { category: CategoryId, score: u8 },
    #[error("grade scale must contain at least one band")]
    EmptyGradeScale,
    #[error("lowest grade band starts at {min_score}; it must start at 0")]
    GradeFloor { min_score: u8 },
    #[error("highest grade band starts at {min_score}; it must not exceed 100")]
    GradeCeiling { min_score: u8 },
    #[error("grade band {grade} is out of order; bands must descend in score and grade")]
    GradeOrder { grade: Grade },
}
