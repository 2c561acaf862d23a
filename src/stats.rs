use crate::models::{Statistics, SuspiciousPair};
use crate::severity;

/// Display-ready statistics. Values come straight from the backend figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsView {
    pub total_pairs: u64,
    pub avg_similarity: String,
    pub high_risk_count: u64,
}

pub fn present(statistics: &Statistics) -> StatisticsView {
    StatisticsView {
        total_pairs: statistics.total_pairs,
        avg_similarity: format_percent(statistics.avg_similarity),
        high_risk_count: statistics.high_risk_count,
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", value.round() as i64)
}

/// Statistics for pair lists that did not come with backend figures.
pub fn summarize_pairs(pairs: &[SuspiciousPair]) -> Statistics {
    let total: u64 = pairs.iter().map(|pair| u64::from(pair.similarity)).sum();
    let count = pairs.len();

    Statistics {
        total_pairs: count as u64,
        avg_similarity: if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        },
        high_risk_count: pairs
            .iter()
            .filter(|pair| severity::is_high_risk(pair.similarity))
            .count() as u64,
    }
}

/// Number of pairwise comparisons the backend runs for `submissions` students.
pub fn pairwise_comparisons(submissions: u64) -> u64 {
    submissions.saturating_mul(submissions.saturating_sub(1)) / 2
}
