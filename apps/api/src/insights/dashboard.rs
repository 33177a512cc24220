//! Dashboard analytics across all of a user's analysed résumés.

use serde::Serialize;

use crate::analysis::scoring::Category;
use crate::insights::rounded_mean;
use crate::models::resume::StoredResumeRecord;

/// Categories shown as averages on the dashboard. ATS has its own stat card.
const DASHBOARD_CATEGORIES: [Category; 4] = [
    Category::ToneAndStyle,
    Category::Content,
    Category::Structure,
    Category::Skills,
];

/// Inclusive lower bounds of the score distribution buckets, highest first.
const BUCKETS: [(&str, u32); 5] = [
    ("90-100", 90),
    ("70-89", 70),
    ("50-69", 50),
    ("30-49", 30),
    ("0-29", 0),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAverage {
    pub name: &'static str,
    pub average: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBucket {
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_resumes: usize,
    pub average_overall: u32,
    pub average_ats: u32,
    pub best_score: u32,
    pub worst_score: u32,
    pub category_averages: Vec<CategoryAverage>,
    pub distribution: Vec<ScoreBucket>,
    /// Mean keyword match rate over records that carry a keyword match.
    pub average_keyword_match: Option<u32>,
    /// Distinct non-empty company names, first seen first.
    pub companies: Vec<String>,
}

pub fn summarize(records: &[StoredResumeRecord]) -> DashboardSummary {
    let overall = || records.iter().map(|r| r.feedback.overall_score);

    let category_averages = DASHBOARD_CATEGORIES
        .iter()
        .map(|&category| CategoryAverage {
            name: category.label(),
            average: rounded_mean(records.iter().map(|r| r.feedback.category(category).score)),
        })
        .collect();

    let mut distribution: Vec<ScoreBucket> = BUCKETS
        .iter()
        .map(|&(label, _)| ScoreBucket { label, count: 0 })
        .collect();
    for score in overall() {
        // BUCKETS ends with a 0 floor, so every score lands somewhere
        if let Some(i) = BUCKETS.iter().position(|&(_, floor)| score >= floor) {
            distribution[i].count += 1;
        }
    }

    let match_rates: Vec<u32> = records
        .iter()
        .filter_map(|r| r.feedback.keyword_match.as_ref())
        .map(|kw| kw.match_rate())
        .collect();
    let average_keyword_match =
        (!match_rates.is_empty()).then(|| rounded_mean(match_rates.iter().copied()));

    let mut companies: Vec<String> = Vec::new();
    for name in records.iter().filter_map(|r| r.company_name.as_deref()) {
        let name = name.trim();
        if !name.is_empty() && !companies.iter().any(|c| c == name) {
            companies.push(name.to_string());
        }
    }

    DashboardSummary {
        total_resumes: records.len(),
        average_overall: rounded_mean(overall()),
        average_ats: rounded_mean(records.iter().map(|r| r.feedback.ats.score)),
        best_score: overall().max().unwrap_or(0),
        worst_score: overall().min().unwrap_or(0),
        category_averages,
        distribution,
        average_keyword_match,
        companies,
    }
}
