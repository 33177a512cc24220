// Read-side aggregations over a user's stored records: dashboard analytics,
// side-by-side comparison and score history. Pure functions; handlers load
// the records and pass them in.

pub mod compare;
pub mod dashboard;
pub mod handlers;
pub mod history;

use serde::Serialize;

/// Coarse quality band used to colour scores in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Strong,
    Fair,
    Weak,
}

impl ScoreBand {
    pub fn of(score: u32) -> Self {
        match score {
            70.. => ScoreBand::Strong,
            50..=69 => ScoreBand::Fair,
            _ => ScoreBand::Weak,
        }
    }
}

/// Rounded mean, or 0 for an empty input.
pub(crate) fn rounded_mean(values: impl IntoIterator<Item = u32>) -> u32 {
    let (sum, count) = values
        .into_iter()
        .fold((0u64, 0u64), |(s, c), v| (s + u64::from(v), c + 1));
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as u32
}
