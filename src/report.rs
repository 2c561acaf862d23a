use std::fmt::Write;

use crate::matrix::SimilarityMatrix;
use crate::models::{AnalysisResults, ParaphraseCheck, SimpleCheck, SuspiciousPair};
use crate::severity::{self, Tone};
use crate::stats;

pub const EMPTY_STATE: &str =
    "No results found. Run `plagiarism-results upload` to analyze a new assignment.";

pub fn build_results(
    results: &AnalysisResults,
    visible: &[SuspiciousPair],
    limit: Option<usize>,
) -> String {
    let statistics = stats::present(&results.statistics);
    let mut output = String::new();

    let _ = writeln!(output, "# Results for: {}", results.assignment_name);
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "Total submissions:   {} ({} pairwise comparisons)",
        results.total_submissions,
        stats::pairwise_comparisons(results.total_submissions)
    );
    let _ = writeln!(output, "Suspicious pairs:    {}", statistics.total_pairs);
    let _ = writeln!(output, "Average similarity:  {}", statistics.avg_similarity);
    let _ = writeln!(output, "High risk (>= 90%):  {}", statistics.high_risk_count);
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Suspicious Pairs ({} of {})",
        visible.len(),
        results.suspicious_pairs.len()
    );

    if visible.is_empty() {
        let _ = writeln!(output, "No pairs match the current search and filter.");
        return output;
    }

    let shown = limit.unwrap_or(visible.len()).min(visible.len());
    for pair in &visible[..shown] {
        let _ = writeln!(output, "{}", format_pair(pair));
    }
    if shown < visible.len() {
        let _ = writeln!(output, "... and {} more pairs", visible.len() - shown);
    }

    output
}

pub fn format_pair(pair: &SuspiciousPair) -> String {
    format!(
        "- [{}] {} <> {}: {}% {} ({} matched sentences)",
        severity::pair_list_tone(pair.similarity).as_str(),
        pair.student1,
        pair.student2,
        pair.similarity,
        pair.status,
        pair.matched_sentences
    )
}

pub fn build_check(check: &SimpleCheck) -> String {
    let similarity = check.similarity_percent();
    let mut output = String::new();

    let _ = writeln!(
        output,
        "Similarity: {}% [{}] {}",
        similarity,
        severity::check_tone(similarity).as_str(),
        severity::check_label(similarity)
    );
    let _ = writeln!(
        output,
        "Plagiarized: {}",
        if check.is_plagiarized { "yes" } else { "no" }
    );
    if let Some(interpretation) = &check.interpretation {
        let _ = writeln!(output, "Score: {interpretation}");
    }
    let _ = writeln!(
        output,
        "Matched content: {}% [{}]",
        similarity,
        severity::check_breakdown_tone(similarity).as_str()
    );
    let _ = writeln!(output, "Original content: {}%", 100 - similarity);
    if severity::check_needs_review(similarity) {
        let _ = writeln!(
            output,
            "This text shows significant similarity to the source document. \
             Review carefully for potential plagiarism."
        );
    }

    output
}

pub fn build_paraphrase(check: &ParaphraseCheck) -> String {
    let mut output = String::new();
    let highest = check.max_percent();
    let average = check.average_percent();

    let _ = writeln!(
        output,
        "Closest sentence pair: {}% [{}] {}",
        highest,
        severity::check_tone(highest).as_str(),
        severity::check_label(highest)
    );
    let _ = writeln!(
        output,
        "Average across sentences: {}% [{}] {}",
        average,
        severity::check_tone(average).as_str(),
        severity::check_label(average)
    );

    output
}

fn shade_code(tone: Tone) -> char {
    match tone {
        Tone::None => ' ',
        Tone::Light => 'l',
        Tone::Medium => 'm',
        Tone::Green => 'g',
        Tone::Yellow => 'y',
        Tone::Orange => 'o',
        Tone::Red => 'r',
    }
}

pub fn build_matrix(matrix: &SimilarityMatrix) -> String {
    let mut output = String::new();

    if matrix.is_empty() {
        let _ = writeln!(output, "No pairs to plot.");
        return output;
    }

    let width = matrix
        .students
        .iter()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0);

    let _ = write!(output, "{:width$} ", "");
    for idx in 0..matrix.students.len() {
        let _ = write!(output, "{:>5}", idx + 1);
    }
    let _ = writeln!(output);

    for (row, name) in matrix.students.iter().enumerate() {
        let _ = write!(output, "{:width$} ", name);
        for value in &matrix.cells[row] {
            let code = shade_code(severity::matrix_tone(*value));
            if *value == 0 {
                let _ = write!(output, "{:>5}", "-");
            } else {
                let _ = write!(output, "{:>4}{}", value, code);
            }
        }
        let _ = writeln!(output);
    }

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "Columns follow row order. l 0-25%  m 25-50%  y 50-75%  o 75-90%  r 90-100%"
    );

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PairStatus, Statistics};

    fn pair(student1: &str, student2: &str, similarity: u8, status: PairStatus) -> SuspiciousPair {
        SuspiciousPair {
            id: format!("{student1}-{student2}"),
            student1: student1.to_string(),
            student2: student2.to_string(),
            similarity,
            status,
            matched_sentences: 7,
        }
    }

    fn sample_results() -> AnalysisResults {
        AnalysisResults {
            assignment_name: "Final Project".to_string(),
            total_submissions: 30,
            suspicious_pairs: vec![
                pair("Alice", "Bob", 92, PairStatus::Identical),
                pair("Carl", "Dana", 78, PairStatus::Flagged),
                pair("Erin", "Frank", 60, PairStatus::Suspicious),
            ],
            statistics: Statistics {
                total_pairs: 12,
                avg_similarity: 0.0,
                high_risk_count: 1,
            },
        }
    }

    #[test]
    fn shows_backend_statistics_verbatim() {
        let results = sample_results();
        let output = build_results(&results, &results.suspicious_pairs, None);

        assert!(output.contains("# Results for: Final Project"));
        assert!(output.contains("30 (435 pairwise comparisons)"));
        assert!(output.contains("Suspicious pairs:    12"));
        assert!(output.contains("Average similarity:  0%"));
        assert!(output.contains("- [red] Alice <> Bob: 92% Identical (7 matched sentences)"));
        assert!(output.contains("- [orange] Carl <> Dana: 78% Flagged"));
        assert!(output.contains("- [yellow] Erin <> Frank: 60% Suspicious"));
    }

    #[test]
    fn limit_truncates_with_remainder_note() {
        let results = sample_results();
        let output = build_results(&results, &results.suspicious_pairs, Some(1));
        assert!(output.contains("Alice"));
        assert!(!output.contains("Carl"));
        assert!(output.contains("... and 2 more pairs"));
    }

    #[test]
    fn empty_projection_has_message() {
        let results = sample_results();
        let output = build_results(&results, &[], None);
        assert!(output.contains("(0 of 3)"));
        assert!(output.contains("No pairs match the current search and filter."));
    }

    #[test]
    fn check_output_uses_four_bucket_table() {
        let check = SimpleCheck {
            similarity_score: 0.6,
            is_plagiarized: true,
            interpretation: None,
        };
        let output = build_check(&check);
        assert!(output.contains("Similarity: 60% [yellow] Moderate Similarity"));
        assert!(output.contains("Matched content: 60% [yellow]"));
        assert!(output.contains("Original content: 40%"));
        assert!(output.contains("Review carefully"));

        let low = SimpleCheck {
            similarity_score: 0.2,
            is_plagiarized: false,
            interpretation: None,
        };
        let output = build_check(&low);
        assert!(output.contains("[green] Low Similarity"));
        assert!(output.contains("Matched content: 20% [green]"));
        assert!(!output.contains("Review carefully"));
    }

    #[test]
    fn breakdown_bar_differs_from_headline_tone() {
        let check = SimpleCheck {
            similarity_score: 0.76,
            is_plagiarized: true,
            interpretation: None,
        };
        let output = build_check(&check);
        assert!(output.contains("Similarity: 76% [orange] High Similarity"));
        assert!(output.contains("Matched content: 76% [red]"));
    }

    #[test]
    fn paraphrase_reports_both_scores() {
        let output = build_paraphrase(&ParaphraseCheck {
            overall_max_score: 0.93,
            average_score: 0.41,
        });
        assert!(output.contains("Closest sentence pair: 93% [red] Identical"));
        assert!(output.contains("Average across sentences: 41% [green] Low Similarity"));
    }

    #[test]
    fn matrix_marks_shades() {
        let matrix = SimilarityMatrix::from_pairs(&sample_results().suspicious_pairs);
        let output = build_matrix(&matrix);
        assert!(output.contains("92r"));
        assert!(output.contains("78o"));
        assert!(output.contains("60y"));
        assert_eq!(build_matrix(&SimilarityMatrix::from_pairs(&[])), "No pairs to plot.\n");
    }
}
