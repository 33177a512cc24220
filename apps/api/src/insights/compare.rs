//! Side-by-side comparison of two analysed résumés.

use serde::Serialize;
use uuid::Uuid;

use crate::analysis::scoring::Category;
use crate::insights::ScoreBand;
use crate::models::resume::StoredResumeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    A,
    B,
    Tie,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparedResume {
    pub id: Uuid,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub dimension: &'static str,
    pub score_a: u32,
    pub score_b: u32,
    pub band_a: ScoreBand,
    pub band_b: ScoreBand,
    pub difference: u32,
    pub winner: Winner,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub a: ComparedResume,
    pub b: ComparedResume,
    pub rows: Vec<ComparisonRow>,
}

/// Dimensions in display order: overall first, then the categories.
const DIMENSIONS: [Option<Category>; 6] = [
    None,
    Some(Category::Ats),
    Some(Category::ToneAndStyle),
    Some(Category::Content),
    Some(Category::Structure),
    Some(Category::Skills),
];

fn score_of(record: &StoredResumeRecord, dimension: Option<Category>) -> u32 {
    match dimension {
        None => record.feedback.overall_score,
        Some(category) => record.feedback.category(category).score,
    }
}

fn row(dimension: Option<Category>, a: &StoredResumeRecord, b: &StoredResumeRecord) -> ComparisonRow {
    let score_a = score_of(a, dimension);
    let score_b = score_of(b, dimension);
    ComparisonRow {
        dimension: dimension.map_or("Overall Score", Category::label),
        score_a,
        score_b,
        band_a: ScoreBand::of(score_a),
        band_b: ScoreBand::of(score_b),
        difference: score_a.abs_diff(score_b),
        winner: match score_a.cmp(&score_b) {
            std::cmp::Ordering::Greater => Winner::A,
            std::cmp::Ordering::Less => Winner::B,
            std::cmp::Ordering::Equal => Winner::Tie,
        },
    }
}

pub fn compare(a: &StoredResumeRecord, b: &StoredResumeRecord) -> Comparison {
    Comparison {
        a: ComparedResume {
            id: a.id,
            label: a.label().to_string(),
        },
        b: ComparedResume {
            id: b.id,
            label: b.label().to_string(),
        },
        rows: DIMENSIONS.iter().map(|&d| row(d, a, b)).collect(),
    }
}
