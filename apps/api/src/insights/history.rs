//! Score history: the most recent analyses and their trend.

use serde::Serialize;
use uuid::Uuid;

use crate::insights::rounded_mean;
use crate::models::resume::StoredResumeRecord;

/// How many of the most recent records the history shows.
pub const HISTORY_WINDOW: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub id: Uuid,
    pub label: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreHistory {
    pub points: Vec<HistoryPoint>,
    pub average: u32,
    /// Last score minus first score within the window.
    pub trend: i64,
}

/// `records` must be oldest first. Returns `None` with fewer than two points,
/// since a single score has no trend.
pub fn score_history(records: &[StoredResumeRecord]) -> Option<ScoreHistory> {
    let window = &records[records.len().saturating_sub(HISTORY_WINDOW)..];
    if window.len() < 2 {
        return None;
    }

    let points: Vec<HistoryPoint> = window
        .iter()
        .map(|r| HistoryPoint {
            id: r.id,
            label: r.label().to_string(),
            score: r.feedback.overall_score,
        })
        .collect();

    let first = i64::from(points[0].score);
    let last = i64::from(points[points.len() - 1].score);

    Some(ScoreHistory {
        average: rounded_mean(points.iter().map(|p| p.score)),
        trend: last - first,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::tests::record;

    #[test]
    fn test_fewer_than_two_records_has_no_history() {
        assert!(score_history(&[]).is_none());
        assert!(score_history(&[record(None, 50)]).is_none());
    }

    #[test]
    fn test_trend_and_average() {
        let records = vec![record(Some("A"), 60), record(Some("B"), 75), record(Some("C"), 54)];
        let history = score_history(&records).unwrap();
        assert_eq!(history.trend, -6);
        assert_eq!(history.average, 63);
        assert_eq!(history.points[1].label, "B");
    }

    #[test]
    fn test_only_the_last_eight_are_kept() {
        let records: Vec<_> = (0..12).map(|i| record(None, 50 + i)).collect();
        let history = score_history(&records).unwrap();
        assert_eq!(history.points.len(), HISTORY_WINDOW);
        assert_eq!(history.points[0].score, 54);
        assert_eq!(history.points[7].score, 61);
        assert_eq!(history.trend, 7);
    }
}
