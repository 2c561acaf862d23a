use std::str::FromStr;

use clap::ValueEnum;
use feruca::Collator;

use crate::models::{PairStatus, SuspiciousPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StatusFilter {
    #[default]
    All,
    Identical,
    Flagged,
    Suspicious,
}

impl StatusFilter {
    pub fn matches(&self, status: PairStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Identical => status == PairStatus::Identical,
            StatusFilter::Flagged => status == PairStatus::Flagged,
            StatusFilter::Suspicious => status == PairStatus::Suspicious,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(StatusFilter::All),
            "Identical" => Ok(StatusFilter::Identical),
            "Flagged" => Ok(StatusFilter::Flagged),
            "Suspicious" => Ok(StatusFilter::Suspicious),
            other => Err(format!("unknown status filter: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    #[default]
    Similarity,
    Student1,
    Student2,
    /// Keep the order the backend returned.
    None,
}

impl From<&str> for SortKey {
    fn from(value: &str) -> Self {
        match value {
            "similarity" => SortKey::Similarity,
            "student1" => SortKey::Student1,
            "student2" => SortKey::Student2,
            _ => SortKey::None,
        }
    }
}

/// Search, filter and sort controls applied to a pair list.
#[derive(Debug, Clone, Default)]
pub struct ProjectionControls {
    pub search: String,
    pub status: StatusFilter,
    pub sort_by: SortKey,
}

/// Derive the display list from the received pairs. The input is left untouched
/// and the sort is stable, so equal keys keep their received order.
pub fn project(pairs: &[SuspiciousPair], controls: &ProjectionControls) -> Vec<SuspiciousPair> {
    let needle = controls.search.to_lowercase();

    let mut visible: Vec<SuspiciousPair> = pairs
        .iter()
        .filter(|pair| {
            matches_search(&pair.student1, &needle) || matches_search(&pair.student2, &needle)
        })
        .filter(|pair| controls.status.matches(pair.status))
        .cloned()
        .collect();

    match controls.sort_by {
        SortKey::Similarity => visible.sort_by(|a, b| b.similarity.cmp(&a.similarity)),
        SortKey::Student1 => {
            let mut collator = name_collator();
            visible.sort_by(|a, b| collator.collate(a.student1.as_str(), b.student1.as_str()));
        }
        SortKey::Student2 => {
            let mut collator = name_collator();
            visible.sort_by(|a, b| collator.collate(a.student2.as_str(), b.student2.as_str()));
        }
        SortKey::None => {}
    }

    visible
}

fn matches_search(name: &str, needle: &str) -> bool {
    needle.is_empty() || name.to_lowercase().contains(needle)
}

/// Root-locale Unicode collation at tertiary strength: accents and case only
/// break ties between otherwise equal names.
pub fn name_collator() -> Collator {
    Collator::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    fn pair(id: &str, student1: &str, student2: &str, similarity: u8, status: PairStatus) -> SuspiciousPair {
        SuspiciousPair {
            id: id.to_string(),
            student1: student1.to_string(),
            student2: student2.to_string(),
            similarity,
            status,
            matched_sentences: 0,
        }
    }

    fn sample_pairs() -> Vec<SuspiciousPair> {
        vec![
            pair("1", "Alex Johnson", "Brianna Smith", 78, PairStatus::Flagged),
            pair("2", "carl Diaz", "Dana White", 95, PairStatus::Identical),
            pair("3", "Erin Cole", "alex Park", 78, PairStatus::Suspicious),
            pair("4", "Brianna Smith", "Frank Moss", 60, PairStatus::Suspicious),
            pair("5", "Dana White", "Erin Cole", 95, PairStatus::Flagged),
        ]
    }

    fn controls(search: &str, status: StatusFilter, sort_by: SortKey) -> ProjectionControls {
        ProjectionControls {
            search: search.to_string(),
            status,
            sort_by,
        }
    }

    fn ids(pairs: &[SuspiciousPair]) -> Vec<&str> {
        pairs.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn similarity_sort_is_descending_and_stable() {
        let pairs = sample_pairs();
        let result = project(&pairs, &controls("", StatusFilter::All, SortKey::Similarity));

        assert_eq!(result.len(), pairs.len());
        assert_eq!(ids(&result), vec!["2", "5", "1", "3", "4"]);
        assert!(result.windows(2).all(|w| w[0].similarity >= w[1].similarity));
    }

    #[test]
    fn status_filter_keeps_only_that_status() {
        let pairs = sample_pairs();
        for filter in [StatusFilter::Identical, StatusFilter::Flagged, StatusFilter::Suspicious] {
            let result = project(&pairs, &controls("", filter, SortKey::None));
            assert!(!result.is_empty());
            assert!(result.iter().all(|p| filter.matches(p.status)));
        }
    }

    #[test]
    fn search_is_case_insensitive_on_either_student() {
        let pairs = sample_pairs();
        let result = project(&pairs, &controls("ALEX", StatusFilter::All, SortKey::None));
        assert_eq!(ids(&result), vec!["1", "3"]);
    }

    #[test]
    fn whitespace_query_is_not_trimmed() {
        let pairs = vec![
            pair("1", "Alex Johnson", "Bo", 50, PairStatus::Flagged),
            pair("2", "Cy", "Di", 50, PairStatus::Flagged),
        ];
        let result = project(&pairs, &controls(" ", StatusFilter::All, SortKey::None));
        assert_eq!(ids(&result), vec!["1"]);
    }

    #[test]
    fn name_sorts_are_non_decreasing() {
        let pairs = sample_pairs();

        let by_first = project(&pairs, &controls("", StatusFilter::All, SortKey::Student1));
        assert_eq!(ids(&by_first), vec!["1", "4", "2", "5", "3"]);

        let by_second = project(&pairs, &controls("", StatusFilter::All, SortKey::Student2));
        let mut collator = name_collator();
        assert!(by_second.windows(2).all(|w| {
            collator.collate(w[0].student2.as_str(), w[1].student2.as_str()) != Ordering::Greater
        }));
        assert_eq!(by_second[0].student2, "alex Park");
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let mut collator = name_collator();
        assert_eq!(collator.collate("Émile Roux", "Frank Moss"), Ordering::Less);
        assert_eq!(collator.collate("Ángel Ruiz", "Beth Cole"), Ordering::Less);

        let pairs = vec![
            pair("1", "Frank Moss", "Zoe", 50, PairStatus::Flagged),
            pair("2", "Émile Roux", "Zoe", 50, PairStatus::Flagged),
            pair("3", "Beth Cole", "Zoe", 50, PairStatus::Flagged),
            pair("4", "Ángel Ruiz", "Zoe", 50, PairStatus::Flagged),
        ];
        let result = project(&pairs, &controls("", StatusFilter::All, SortKey::Student1));
        assert_eq!(ids(&result), vec!["4", "3", "2", "1"]);
    }

    #[test]
    fn unknown_sort_key_keeps_received_order() {
        let pairs = sample_pairs();
        let result = project(&pairs, &controls("", StatusFilter::All, SortKey::from("matches")));
        assert_eq!(ids(&result), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn filtering_to_suspicious_scenario() {
        let pairs = vec![
            SuspiciousPair {
                matched_sentences: 12,
                ..pair("a", "Alice", "Bob", 92, PairStatus::Identical)
            },
            SuspiciousPair {
                matched_sentences: 3,
                ..pair("b", "Carl", "Dana", 70, PairStatus::Suspicious)
            },
        ];
        let result = project(&pairs, &controls("", StatusFilter::Suspicious, SortKey::Similarity));
        assert_eq!(result, vec![pairs[1].clone()]);
    }

    #[test]
    fn empty_input_projects_to_empty() {
        let result = project(&[], &controls("anyone", StatusFilter::Flagged, SortKey::Student1));
        assert!(result.is_empty());
    }

    #[test]
    fn input_is_not_reordered() {
        let pairs = sample_pairs();
        let before = pairs.clone();
        let _ = project(&pairs, &controls("", StatusFilter::All, SortKey::Student2));
        assert_eq!(pairs, before);
    }

    #[test]
    fn status_filter_parses_wire_values() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!("Flagged".parse::<StatusFilter>(), Ok(StatusFilter::Flagged));
        assert!("flagged-ish".parse::<StatusFilter>().is_err());
    }
}
