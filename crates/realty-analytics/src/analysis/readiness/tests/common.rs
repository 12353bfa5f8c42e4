use std::collections::BTreeMap;

use crate::analysis::readiness::{
    CategoryId, CategoryRubric, Condition, GradeScale, RawInput, ReadinessConfig, ReadinessEngine,
    RubricRule,
};

/// Category whose only rule always yields `score`.
pub(crate) fn fixed_category(id: &str, weight: f64, score: u8) -> CategoryRubric {
    CategoryRubric {
        id: CategoryId::new(id),
        name: id.replace('_', " "),
        weight,
        rules: vec![RubricRule::new(Condition::Always, score)],
    }
}

pub(crate) fn three_category_config() -> ReadinessConfig {
    ReadinessConfig {
        categories: vec![
            fixed_category("condition", 0.5, 90),
            fixed_category("timing", 0.3, 70),
            fixed_category("finances", 0.2, 50),
        ],
        grades: GradeScale::standard(),
    }
}

pub(crate) fn three_category_engine() -> ReadinessEngine {
    ReadinessEngine::new(three_category_config()).expect("weights sum to one")
}

pub(crate) fn answers(pairs: &[(&str, RawInput)]) -> BTreeMap<CategoryId, RawInput> {
    pairs
        .iter()
        .map(|(id, input)| (CategoryId::new(*id), input.clone()))
        .collect()
}

pub(crate) fn three_category_answers() -> BTreeMap<CategoryId, RawInput> {
    answers(&[
        ("condition", RawInput::Flag(true)),
        ("timing", RawInput::Flag(true)),
        ("finances", RawInput::Flag(true)),
    ])
}

pub(crate) fn standard_answers() -> BTreeMap<CategoryId, RawInput> {
    answers(&[
        ("property_condition", RawInput::Choice("minor_repairs".to_string())),
        ("estimated_repairs", RawInput::Number(6_000.0)),
        ("market_timing", RawInput::Choice("sellers_market".to_string())),
        ("emotional_readiness", RawInput::Number(7.0)),
        ("mortgage_payoff", RawInput::Choice("high_equity".to_string())),
        ("move_timeline", RawInput::Choice("within_3_months".to_string())),
    ])
}
