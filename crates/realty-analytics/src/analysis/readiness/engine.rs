use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::config::{ConfigurationError, Grade, ReadinessConfig};
use super::rubric::{CategoryId, CategoryScore, ColorBand, RawInput};

/// Stateless scorer over a validated rubric configuration.
#[derive(Debug, Clone)]
pub struct ReadinessEngine {
    config: ReadinessConfig,
}

impl ReadinessEngine {
    pub fn new(config: ReadinessConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn standard() -> Result<Self, ConfigurationError> {
        Self::new(ReadinessConfig::standard())
    }

    pub fn config(&self) -> &ReadinessConfig {
        &self.config
    }

    pub fn compute_score(
        &self,
        inputs: &BTreeMap<CategoryId, RawInput>,
    ) -> Result<SellerReadinessResult, ReadinessError> {
        self.score(inputs, None)
    }

    pub fn compute_score_as_of(
        &self,
        inputs: &BTreeMap<CategoryId, RawInput>,
        as_of: DateTime<Utc>,
    ) -> Result<SellerReadinessResult, ReadinessError> {
        self.score(inputs, Some(as_of))
    }

    fn score(
        &self,
        inputs: &BTreeMap<CategoryId, RawInput>,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<SellerReadinessResult, ReadinessError> {
        // Every configured category must be answered before any scoring happens.
        let answered = self
            .config
            .categories
            .iter()
            .map(|category| {
                inputs
                    .get(&category.id)
                    .map(|input| (category, input))
                    .ok_or_else(|| ReadinessError::MissingCategory {
                        category: category.id.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let categories: Vec<CategoryScore> = answered
            .into_iter()
            .map(|(category, input)| category.score(input))
            .collect();

        let weighted_total: f64 = categories.iter().map(|entry| entry.weighted_score).sum();
        let overall_score = weighted_total.round().clamp(0.0, 100.0) as u8;
        let band = self.config.grades.grade_for(overall_score);

        let mut shortfalls: Vec<(&CategoryScore, f64)> = categories
            .iter()
            .filter(|entry| entry.color_band == ColorBand::Red && entry.weight > 0.0)
            .map(|entry| (entry, f64::from(100 - entry.score) * entry.weight))
            .collect();
        shortfalls.sort_by(|a, b| b.1.total_cmp(&a.1));
        let focus_areas = shortfalls
            .into_iter()
            .map(|(entry, _)| entry.category.clone())
            .collect();

        Ok(SellerReadinessResult {
            overall_score,
            grade: band.grade,
            grade_label: band.label.clone(),
            color_band: ColorBand::from_score(overall_score),
            categories,
            focus_areas,
            as_of,
        })
    }
}

/// Finished readiness report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellerReadinessResult {
    pub overall_score: u8,
    pub grade: Grade,
    pub grade_label: String,
    pub color_band: ColorBand,
    pub categories: Vec<CategoryScore>,
    /// Red-band categories ordered by how many weighted points they leave on the table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub focus_areas: Vec<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadinessError {
    #[error("missing readiness input for category `{category}`")]
    MissingCategory { category: CategoryId },
}
