use serde::Serialize;

use super::round2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            QualityTier::Excellent
        } else if score >= 70.0 {
            QualityTier::Good
        } else if score >= 50.0 {
            QualityTier::Fair
        } else {
            QualityTier::Poor
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityScore {
    pub overall_score: f64,
    pub completeness_score: f64,
    pub uniqueness_score: f64,
    pub quality_tier: QualityTier,
    pub total_cells: usize,
}

pub fn score(rows: usize, columns: usize, total_missing: usize, duplicate_rows: usize) -> QualityScore {
    let total_cells = rows * columns;

    let completeness_score = if total_cells == 0 {
        0.0
    } else {
        round2((1.0 - total_missing as f64 / total_cells as f64) * 100.0)
    };

    let uniqueness_score = if rows == 0 {
        100.0
    } else {
        round2((1.0 - duplicate_rows as f64 / rows as f64) * 100.0)
    };

    let overall_score = round2((completeness_score + uniqueness_score) / 2.0);

    QualityScore {
        overall_score,
        completeness_score,
        uniqueness_score,
        quality_tier: QualityTier::from_score(overall_score),
        total_cells,
    }
}
