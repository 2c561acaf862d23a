use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use uuid::Uuid;

use crate::models::{AnalysisResults, PairStatus, SuspiciousPair};
use crate::stats;

#[derive(serde::Deserialize)]
struct CsvRow {
    id: Option<String>,
    student1: String,
    student2: String,
    similarity: u8,
    status: PairStatus,
    matched_sentences: u32,
}

/// Build results from a pair list on disk. Statistics are computed from the
/// rows since there is no backend summary to trust.
pub fn import_csv(
    csv_path: &Path,
    assignment_name: &str,
    total_submissions: Option<u64>,
) -> anyhow::Result<AnalysisResults> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut pairs = Vec::new();

    for (line, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("invalid pair on data row {}", line + 1))?;
        if row.similarity > 100 {
            anyhow::bail!(
                "similarity {} on data row {} is outside 0-100",
                row.similarity,
                line + 1
            );
        }

        pairs.push(SuspiciousPair {
            id: row
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| format!("import-{}", Uuid::new_v4())),
            student1: row.student1,
            student2: row.student2,
            similarity: row.similarity,
            status: row.status,
            matched_sentences: row.matched_sentences,
        });
    }

    let total_submissions = total_submissions.unwrap_or_else(|| {
        pairs
            .iter()
            .flat_map(|pair| [pair.student1.as_str(), pair.student2.as_str()])
            .collect::<BTreeSet<_>>()
            .len() as u64
    });

    Ok(AnalysisResults {
        assignment_name: assignment_name.to_string(),
        total_submissions,
        statistics: stats::summarize_pairs(&pairs),
        suspicious_pairs: pairs,
    })
}
