use std::collections::{BTreeSet, HashMap};

use crate::models::SuspiciousPair;
use crate::projection::name_collator;

/// Student-by-student similarity grid. Rows and columns share the order of
/// `students`; the grid is symmetric with zeros on the diagonal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarityMatrix {
    pub students: Vec<String>,
    pub cells: Vec<Vec<u8>>,
}

impl SimilarityMatrix {
    pub fn from_pairs(pairs: &[SuspiciousPair]) -> Self {
        let mut students: Vec<String> = pairs
            .iter()
            .flat_map(|pair| [pair.student1.clone(), pair.student2.clone()])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let mut collator = name_collator();
        students.sort_by(|a, b| collator.collate(a.as_str(), b.as_str()));

        let index: HashMap<&str, usize> = students
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect();

        let mut cells = vec![vec![0u8; students.len()]; students.len()];
        for pair in pairs {
            let (row, col) = (index[pair.student1.as_str()], index[pair.student2.as_str()]);
            if row == col {
                continue;
            }
            let highest = cells[row][col].max(pair.similarity);
            cells[row][col] = highest;
            cells[col][row] = highest;
        }

        Self { students, cells }
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PairStatus;

    impl SimilarityMatrix {
        fn get(&self, a: &str, b: &str) -> Option<u8> {
            let row = self.students.iter().position(|name| name == a)?;
            let col = self.students.iter().position(|name| name == b)?;
            Some(self.cells[row][col])
        }
    }

    fn pair(student1: &str, student2: &str, similarity: u8) -> SuspiciousPair {
        SuspiciousPair {
            id: format!("{student1}-{student2}"),
            student1: student1.to_string(),
            student2: student2.to_string(),
            similarity,
            status: PairStatus::Suspicious,
            matched_sentences: 1,
        }
    }

    #[test]
    fn builds_symmetric_grid() {
        let matrix = SimilarityMatrix::from_pairs(&[
            pair("C. Williams", "A. Johnson", 78),
            pair("A. Johnson", "B. Smith", 45),
        ]);

        assert_eq!(matrix.students, vec!["A. Johnson", "B. Smith", "C. Williams"]);
        assert_eq!(matrix.get("A. Johnson", "C. Williams"), Some(78));
        assert_eq!(matrix.get("C. Williams", "A. Johnson"), Some(78));
        assert_eq!(matrix.get("B. Smith", "C. Williams"), Some(0));
        assert_eq!(matrix.get("B. Smith", "B. Smith"), Some(0));
        assert_eq!(matrix.get("Z. Nobody", "B. Smith"), None);
    }

    #[test]
    fn accented_students_sort_in_place() {
        let matrix =
            SimilarityMatrix::from_pairs(&[pair("Frank", "Émile", 40), pair("Beth", "Ángel", 30)]);
        assert_eq!(matrix.students, vec!["Ángel", "Beth", "Émile", "Frank"]);
    }

    #[test]
    fn keeps_highest_score_for_repeated_pair() {
        let matrix = SimilarityMatrix::from_pairs(&[
            pair("A", "B", 60),
            pair("B", "A", 91),
            pair("A", "B", 70),
        ]);
        assert_eq!(matrix.get("A", "B"), Some(91));
    }

    #[test]
    fn empty_pairs_give_empty_matrix() {
        assert!(SimilarityMatrix::from_pairs(&[]).is_empty());
    }
}
