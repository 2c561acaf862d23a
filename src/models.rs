use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairStatus {
    Identical,
    Flagged,
    Suspicious,
}

impl PairStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairStatus::Identical => "Identical",
            PairStatus::Flagged => "Flagged",
            PairStatus::Suspicious => "Suspicious",
        }
    }
}

impl fmt::Display for PairStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspiciousPair {
    pub id: String,
    pub student1: String,
    pub student2: String,
    #[serde(deserialize_with = "percentage")]
    pub similarity: u8,
    pub status: PairStatus,
    pub matched_sentences: u32,
}

/// Aggregate figures computed by the backend. Displayed as-is, even when they
/// disagree with the pair list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_pairs: u64,
    pub avg_similarity: f64,
    pub high_risk_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResults {
    pub assignment_name: String,
    pub total_submissions: u64,
    pub suspicious_pairs: Vec<SuspiciousPair>,
    pub statistics: Statistics,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimpleCheck {
    pub similarity_score: f64,
    pub is_plagiarized: bool,
    #[serde(default)]
    pub interpretation: Option<String>,
}

impl SimpleCheck {
    /// Model probability as a whole percentage.
    pub fn similarity_percent(&self) -> u8 {
        to_percent(self.similarity_score)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParaphraseCheck {
    pub overall_max_score: f64,
    pub average_score: f64,
}

impl ParaphraseCheck {
    pub fn max_percent(&self) -> u8 {
        to_percent(self.overall_max_score)
    }

    pub fn average_percent(&self) -> u8 {
        to_percent(self.average_score)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub device: Option<String>,
}

fn percentage<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = u8::deserialize(deserializer)?;
    if value > 100 {
        return Err(de::Error::custom(format!(
            "similarity {value} is outside 0-100"
        )));
    }
    Ok(value)
}

fn to_percent(score: f64) -> u8 {
    (score * 100.0).round().clamp(0.0, 100.0) as u8
}
