use serde::{Deserialize, Serialize};
use std::fmt;

/// Score used when an input is present but no rubric rule matches it.
pub const NEUTRAL_SCORE: u8 = 50;

const STRONG_THRESHOLD: u8 = 80;
const MODERATE_THRESHOLD: u8 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw form answer for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawInput {
    Flag(bool),
    Number(f64),
    Choice(String),
}

/// Predicate half of a rubric rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum Condition {
    AtLeast { value: f64 },
    AtMost { value: f64 },
    /// Inclusive on both ends.
    Between { min: f64, max: f64 },
    Equals { value: String },
    OneOf { values: Vec<String> },
    Is { value: bool },
    Always,
}

impl Condition {
    pub fn matches(&self, input: &RawInput) -> bool {
        match (self, input) {
            (Condition::Always, _) => true,
            (Condition::AtLeast { value }, RawInput::Number(number)) => number >= value,
            (Condition::AtMost { value }, RawInput::Number(number)) => number <= value,
            (Condition::Between { min, max }, RawInput::Number(number)) => {
                number >= min && number <= max
            }
            (Condition::Equals { value }, RawInput::Choice(choice)) => same_choice(value, choice),
            (Condition::OneOf { values }, RawInput::Choice(choice)) => {
                values.iter().any(|value| same_choice(value, choice))
            }
            (Condition::Is { value }, RawInput::Flag(flag)) => value == flag,
            _ => false,
        }
    }
}

fn same_choice(expected: &str, actual: &str) -> bool {
    expected.trim().eq_ignore_ascii_case(actual.trim())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricRule {
    #[serde(flatten)]
    pub condition: Condition,
    pub score: u8,
}

impl RubricRule {
    pub fn new(condition: Condition, score: u8) -> Self {
        Self { condition, score }
    }
}

/// One weighted category and its ordered rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRubric {
    pub id: CategoryId,
    pub name: String,
    pub weight: f64,
    pub rules: Vec<RubricRule>,
}

impl CategoryRubric {
    /// Evaluates rules top to bottom; the first match wins, otherwise the
    /// neutral midpoint applies.
    pub fn score(&self, input: &RawInput) -> CategoryScore {
        let matched = self
            .rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.condition.matches(input));

        let (score, matched_rule) = match matched {
            Some((index, rule)) => (rule.score.min(100), Some(index)),
            None => (NEUTRAL_SCORE, None),
        };

        let color_band = ColorBand::from_score(score);
        CategoryScore {
            category: self.id.clone(),
            name: self.name.clone(),
            score,
            weight: self.weight,
            weighted_score: f64::from(score) * self.weight,
            color_band,
            interpretation: color_band.interpretation(&self.name),
            matched_rule,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub category: CategoryId,
    pub name: String,
    pub score: u8,
    pub weight: f64,
    pub weighted_score: f64,
    pub color_band: ColorBand,
    pub interpretation: String,
    /// Index of the rule that produced the score; `None` for the neutral fallback.
    pub matched_rule: Option<usize>,
}

/// Shared display band for category and overall scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorBand {
    Green,
    Yellow,
    Red,
}

impl ColorBand {
    pub const fn from_score(score: u8) -> Self {
        if score >= STRONG_THRESHOLD {
            Self::Green
        } else if score >= MODERATE_THRESHOLD {
            Self::Yellow
        } else {
            Self::Red
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Green => "strong",
            Self::Yellow => "moderate",
            Self::Red => "needs attention",
        }
    }

    pub fn interpretation(self, name: &str) -> String {
        match self {
            Self::Green => format!("{name} is a strength for your sale."),
            Self::Yellow => {
                format!("{name} is in reasonable shape; a little preparation will help.")
            }
            Self::Red => format!("{name} needs attention before you list."),
        }
    }
}
