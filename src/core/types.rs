use serde::{Deserialize, Serialize};

/// Unique identifier for a reference protein in the catalog (e.g. a PDB code)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceId(pub String);

impl ReferenceId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of mapping one residue of the query into a reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Correspondence {
    /// The residue aligns to a residue of the reference
    Residue {
        /// 1-based sequential position in the reference
        position: usize,
        /// One-letter residue code at that position
        residue: char,
        /// Chain-relative number, e.g. 145
        number: i64,
        /// Chain name, e.g. HA1
        chain: String,
    },
    /// The residue aligns to a gap in the reference
    Gap,
}
