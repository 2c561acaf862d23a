//! Similarity score classification.
//!
//! Each view buckets scores with its own thresholds. The pair list, the
//! two-text check, its breakdown bar and the matrix do not share boundaries.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    None,
    Light,
    Medium,
    Green,
    Yellow,
    Orange,
    Red,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::None => "none",
            Tone::Light => "light",
            Tone::Medium => "medium",
            Tone::Green => "green",
            Tone::Yellow => "yellow",
            Tone::Orange => "orange",
            Tone::Red => "red",
        }
    }
}

/// Suspicious-pair list coloring.
pub fn pair_list_tone(similarity: u8) -> Tone {
    match similarity {
        90..=u8::MAX => Tone::Red,
        75..=89 => Tone::Orange,
        _ => Tone::Yellow,
    }
}

/// Two-text check coloring.
pub fn check_tone(similarity: u8) -> Tone {
    match similarity {
        90..=u8::MAX => Tone::Red,
        75..=89 => Tone::Orange,
        50..=74 => Tone::Yellow,
        _ => Tone::Green,
    }
}

pub fn check_label(similarity: u8) -> &'static str {
    match similarity {
        90..=u8::MAX => "Identical",
        75..=89 => "High Similarity",
        50..=74 => "Moderate Similarity",
        _ => "Low Similarity",
    }
}

/// Two-text check "Exact Match" breakdown bar.
pub fn check_breakdown_tone(similarity: u8) -> Tone {
    match similarity {
        76..=u8::MAX => Tone::Red,
        51..=75 => Tone::Yellow,
        _ => Tone::Green,
    }
}

/// Whether a two-text check should carry the manual review warning.
pub fn check_needs_review(similarity: u8) -> bool {
    similarity > 50
}

/// Matrix cell shading.
pub fn matrix_tone(similarity: u8) -> Tone {
    match similarity {
        0 => Tone::None,
        1..=24 => Tone::Light,
        25..=49 => Tone::Medium,
        50..=74 => Tone::Yellow,
        75..=89 => Tone::Orange,
        _ => Tone::Red,
    }
}

/// Glossary "high risk": similarity of 90% or more.
pub fn is_high_risk(similarity: u8) -> bool {
    similarity >= 90
}
