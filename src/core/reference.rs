use serde::{Deserialize, Serialize};

use crate::core::types::{Correspondence, ReferenceId};

fn default_first_number() -> i64 {
    1
}

fn default_preposition() -> String {
    "in".to_string()
}

/// One chain of a reference protein with its own numbering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    /// Chain name used in labels (e.g. HA1)
    pub name: String,

    /// Residues of this chain in one-letter code
    pub sequence: String,

    /// Number given to the first residue of the chain
    #[serde(default = "default_first_number")]
    pub first_number: i64,
}

impl Chain {
    pub fn new(name: impl Into<String>, sequence: impl Into<String>, first_number: i64) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
            first_number,
        }
    }
}

/// Label of a single residue in a reference's own numbering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidueLabel<'a> {
    pub residue: char,
    pub number: i64,
    pub chain: &'a str,
}

/// A reference protein whose numbering scheme results are reported in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnownReference {
    /// Unique identifier, also used as the sequence header when aligning
    pub id: ReferenceId,

    /// Human-readable display name
    pub display_name: String,

    /// Word joining number and chain in labels: "145 in HA1" or "145 of HA1"
    #[serde(default = "default_preposition")]
    pub label_preposition: String,

    /// Chains in sequential order; their concatenation is the aligned sequence
    pub chains: Vec<Chain>,

    /// Description/notes about this reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // === Pre-computed on load ===
    /// Concatenated chain sequences, upper-cased
    #[serde(skip)]
    sequence: String,
}

impl KnownReference {
    pub fn new(id: &str, display_name: &str) -> Self {
        Self {
            id: ReferenceId::new(id),
            display_name: display_name.to_string(),
            label_preposition: default_preposition(),
            chains: Vec::new(),
            description: None,
            sequence: String::new(),
        }
    }

    /// Set chains and rebuild the concatenated sequence
    #[must_use]
    pub fn with_chains(mut self, chains: Vec<Chain>) -> Self {
        self.chains = chains;
        self.rebuild_indexes();
        self
    }

    #[must_use]
    pub fn with_preposition(mut self, preposition: &str) -> Self {
        self.label_preposition = preposition.to_string();
        self
    }

    /// Rebuild the concatenated sequence after deserialization or chain edits
    pub fn rebuild_indexes(&mut self) {
        self.sequence = self
            .chains
            .iter()
            .flat_map(|c| c.sequence.chars())
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();
    }

    /// Full sequence across all chains
    #[must_use]
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Total residue count across all chains
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Label for a 1-based sequential position across all chains
    #[must_use]
    pub fn label(&self, position: usize) -> Option<ResidueLabel<'_>> {
        let mut remaining = position.checked_sub(1)?;
        for chain in &self.chains {
            let chain_len = chain
                .sequence
                .chars()
                .filter(|c| !c.is_whitespace())
                .count();
            if remaining < chain_len {
                let residue = self.sequence.chars().nth(position - 1)?;
                let offset = i64::try_from(remaining).ok()?;
                return Some(ResidueLabel {
                    residue,
                    number: chain.first_number + offset,
                    chain: &chain.name,
                });
            }
            remaining -= chain_len;
        }
        None
    }

    /// Correspondence entry for a mapped position, `Gap` when unmapped
    #[must_use]
    pub fn correspondence(&self, position: Option<usize>) -> Option<Correspondence> {
        let Some(position) = position else {
            return Some(Correspondence::Gap);
        };
        self.label(position).map(|label| Correspondence::Residue {
            position,
            residue: label.residue,
            number: label.number,
            chain: label.chain.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_chain() -> KnownReference {
        KnownReference::new("TOY", "Toy protein")
            .with_chains(vec![Chain::new("HA1", "mka", 7), Chain::new("HA2", "LV", 1)])
            .with_preposition("of")
    }

    #[test]
    fn test_sequence_concatenates_chains() {
        let reference = two_chain();
        assert_eq!(reference.sequence(), "MKALV");
        assert_eq!(reference.len(), 5);
    }

    #[test]
    fn test_label_across_chains() {
        let reference = two_chain();
        assert_eq!(
            reference.label(1),
            Some(ResidueLabel {
                residue: 'M',
                number: 7,
                chain: "HA1"
            })
        );
        assert_eq!(reference.label(3).unwrap().number, 9);
        let label = reference.label(4).unwrap();
        assert_eq!((label.residue, label.number, label.chain), ('L', 1, "HA2"));
        assert_eq!(reference.label(0), None);
        assert_eq!(reference.label(6), None);
    }

    #[test]
    fn test_correspondence() {
        let reference = two_chain();
        assert_eq!(reference.correspondence(None), Some(Correspondence::Gap));
        assert_eq!(
            reference.correspondence(Some(5)),
            Some(Correspondence::Residue {
                position: 5,
                residue: 'V',
                number: 2,
                chain: "HA2".to_string(),
            })
        );
        assert_eq!(reference.correspondence(Some(9)), None);
    }

    #[test]
    fn test_deserialize_rebuilds_after_load() {
        let json = r#"{"id":"X","display_name":"X","chains":[{"name":"A","sequence":"MK"}]}"#;
        let mut reference: KnownReference = serde_json::from_str(json).unwrap();
        assert!(reference.is_empty());
        reference.rebuild_indexes();
        assert_eq!(reference.sequence(), "MK");
        assert_eq!(reference.label_preposition, "in");
        assert_eq!(reference.chains[0].first_number, 1);
    }
}
