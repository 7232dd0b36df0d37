use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::core::reference::KnownReference;
use crate::core::types::ReferenceId;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Duplicate reference id '{0}' in catalog")]
    DuplicateId(ReferenceId),

    #[error("Reference '{reference}' has an empty chain '{chain}'")]
    EmptyChain {
        reference: ReferenceId,
        chain: String,
    },

    #[error("Reference '{reference}' chain '{chain}' contains characters other than one-letter residue codes")]
    InvalidResidues {
        reference: ReferenceId,
        chain: String,
    },

    #[error("Reference '{0}' not found in catalog")]
    UnknownReference(String),
}

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// Serializable catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub version: String,
    pub created_at: String,
    pub references: Vec<KnownReference>,
}

/// The table of reference proteins, loaded once and never mutated afterwards
#[derive(Debug)]
pub struct ReferenceCatalog {
    /// All known references, in catalog order
    pub references: Vec<KnownReference>,

    /// Index: reference ID -> index in references vec
    id_to_index: HashMap<ReferenceId, usize>,
}

impl ReferenceCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            references: Vec::new(),
            id_to_index: HashMap::new(),
        }
    }

    /// Load the embedded default catalog
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the embedded JSON is invalid.
    pub fn load_embedded() -> Result<Self, CatalogError> {
        // Validated at compile time by build.rs
        const EMBEDDED_CATALOG: &str = include_str!("../../catalogs/ha_references.json");
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Load catalog from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ReadError` if the file cannot be read, or any
    /// error from [`ReferenceCatalog::from_json`].
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse catalog from JSON string
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` for invalid JSON,
    /// `CatalogError::DuplicateId` if two references share an id, or
    /// `CatalogError::EmptyChain` if a chain has no residues.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CATALOG_VERSION {
            warn!(
                "Catalog version mismatch (expected {}, found {})",
                CATALOG_VERSION, data.version
            );
        }

        let mut catalog = Self::new();
        for mut reference in data.references {
            reference.rebuild_indexes();
            catalog.add_reference(reference)?;
        }

        Ok(catalog)
    }

    /// Add a reference to the catalog
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if the id is already present,
    /// `CatalogError::EmptyChain` if any chain has no residues, or
    /// `CatalogError::InvalidResidues` if a chain holds anything but letters
    /// (whitespace aside), since gap symbols or digits would shift the labels.
    pub fn add_reference(&mut self, reference: KnownReference) -> Result<(), CatalogError> {
        if self.id_to_index.contains_key(&reference.id) {
            return Err(CatalogError::DuplicateId(reference.id));
        }
        if let Some(chain) = reference
            .chains
            .iter()
            .find(|c| c.sequence.trim().is_empty())
        {
            return Err(CatalogError::EmptyChain {
                reference: reference.id.clone(),
                chain: chain.name.clone(),
            });
        }
        if let Some(chain) = reference.chains.iter().find(|c| {
            !c.sequence
                .chars()
                .filter(|ch| !ch.is_whitespace())
                .all(|ch| ch.is_ascii_alphabetic())
        }) {
            return Err(CatalogError::InvalidResidues {
                reference: reference.id.clone(),
                chain: chain.name.clone(),
            });
        }

        self.id_to_index
            .insert(reference.id.clone(), self.references.len());
        self.references.push(reference);
        Ok(())
    }

    /// Get a reference by ID
    pub fn get(&self, id: &ReferenceId) -> Option<&KnownReference> {
        self.id_to_index.get(id).map(|&idx| &self.references[idx])
    }

    /// Resolve a list of ids, or every reference in catalog order when empty
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownReference` for the first id not in the catalog.
    pub fn select(&self, ids: &[String]) -> Result<Vec<&KnownReference>, CatalogError> {
        if ids.is_empty() {
            return Ok(self.references.iter().collect());
        }
        ids.iter()
            .map(|id| {
                self.get(&ReferenceId::new(id.as_str()))
                    .ok_or_else(|| CatalogError::UnknownReference(id.clone()))
            })
            .collect()
    }

    /// Export catalog to JSON
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` if serialization fails.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let data = CatalogData {
            version: CATALOG_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            references: self.references.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Number of references in catalog
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        Self::new()
    }
}
