use serde::{Deserialize, Serialize};

/// Gap symbol inserted by alignment engines
pub const GAP: char = '-';

/// A named residue string, gapped or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    /// Header text without the leading `>` and without trailing whitespace
    pub header: String,

    /// Residues, possibly containing [`GAP`] symbols. Never contains whitespace.
    pub residues: String,
}

impl SequenceRecord {
    pub fn new(header: impl Into<String>, residues: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            residues: residues.into(),
        }
    }

    /// Number of columns, gaps included
    #[must_use]
    pub fn len(&self) -> usize {
        self.residues.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Number of non-gap residues (the sequential numbering length)
    #[must_use]
    pub fn ungapped_len(&self) -> usize {
        self.residues.chars().filter(|&c| c != GAP).count()
    }

    /// The residues with every gap symbol removed
    #[must_use]
    pub fn ungapped(&self) -> String {
        self.residues.chars().filter(|&c| c != GAP).collect()
    }

    /// Residue at a 1-based sequential (ungapped) position
    #[must_use]
    pub fn residue_at(&self, position: usize) -> Option<char> {
        if position == 0 {
            return None;
        }
        self.residues.chars().filter(|&c| c != GAP).nth(position - 1)
    }
}

impl std::fmt::Display for SequenceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ">{}\n{}", self.header, self.residues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths() {
        let record = SequenceRecord::new("s1", "-AT-A-GC");
        assert_eq!(record.len(), 8);
        assert_eq!(record.ungapped_len(), 5);
        assert_eq!(record.ungapped(), "ATAGC");
        assert!(!record.is_empty());
    }

    #[test]
    fn test_residue_at() {
        let record = SequenceRecord::new("s1", "-AT-A-GC");
        assert_eq!(record.residue_at(0), None);
        assert_eq!(record.residue_at(1), Some('A'));
        assert_eq!(record.residue_at(3), Some('A'));
        assert_eq!(record.residue_at(5), Some('C'));
        assert_eq!(record.residue_at(6), None);
    }
}
