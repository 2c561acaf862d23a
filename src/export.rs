use chrono::{DateTime, TimeZone};
use thiserror::Error;

use crate::models::{AnalysisResults, SuspiciousPair};
use crate::stats;

pub const CSV_HEADER: [&str; 5] = [
    "Student 1",
    "Student 2",
    "Similarity (%)",
    "Status",
    "Matched Sentences",
];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV output was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render the visible pairs and the backend statistics as a CSV document.
///
/// `visible` is the projected list, so the export matches what is on screen.
/// Fields containing commas, quotes or newlines are quoted per RFC 4180.
pub fn export_csv<Tz>(
    results: &AnalysisResults,
    visible: &[SuspiciousPair],
    exported_at: &DateTime<Tz>,
) -> Result<String, ExportError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let statistics = stats::present(&results.statistics);
    let mut lines = Vec::with_capacity(visible.len() + 10);

    lines.push(encode_record(&CSV_HEADER)?);
    for pair in visible {
        lines.push(encode_record(&[
            pair.student1.as_str(),
            pair.student2.as_str(),
            &pair.similarity.to_string(),
            pair.status.as_str(),
            &pair.matched_sentences.to_string(),
        ])?);
    }

    lines.push(String::new());
    lines.push(encode_record(&["Summary Statistics"])?);
    lines.push(encode_record(&[
        "Total Submissions",
        &results.total_submissions.to_string(),
    ])?);
    lines.push(encode_record(&[
        "Suspicious Pairs",
        &statistics.total_pairs.to_string(),
    ])?);
    lines.push(encode_record(&["Average Similarity", &statistics.avg_similarity])?);
    lines.push(encode_record(&[
        "High Risk Pairs",
        &statistics.high_risk_count.to_string(),
    ])?);
    lines.push(String::new());
    lines.push(encode_record(&["Assignment Name", &results.assignment_name])?);
    lines.push(encode_record(&[
        "Exported At",
        &exported_at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
    ])?);

    let mut document = lines.join("\n");
    document.push('\n');
    Ok(document)
}

/// `plagiarism-results-<assignment name>.csv`. Spaces and path separators
/// become hyphens, so the name is always a single file in the working directory.
pub fn export_file_name(assignment_name: &str) -> String {
    let stem: String = assignment_name
        .chars()
        .map(|c| if matches!(c, ' ' | '/' | '\\') { '-' } else { c })
        .collect();
    format!("plagiarism-results-{stem}.csv")
}

fn encode_record(fields: &[&str]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut buffer);
        writer.write_record(fields)?;
        writer.flush()?;
    }

    let mut line = String::from_utf8(buffer)?;
    if line.ends_with('\n') {
        line.pop();
    }
    Ok(line)
}
