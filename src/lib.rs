//! # renumber
//!
//! A library for converting residue positions between protein numbering schemes.
//!
//! Residue positions found in an experimental protein sequence are usually
//! reported in that sequence's own sequential numbering (1, 2, 3, ...). Published
//! structures use their own conventions: hemagglutinin, for example, is numbered
//! per chain (HA1, HA2), sometimes with an offset, and differs between subtypes.
//!
//! `renumber` aligns your sequence to each reference with an external multiple
//! sequence alignment program and walks the gapped alignment to find, for every
//! site, the corresponding residue in the reference or the gap it aligns to.
//!
//! ## Features
//!
//! - **Engine abstraction**: PROBCONS or MUSCLE run as child processes with a bounded wait
//! - **Output validation**: detects engines that silently drop or truncate sequences
//! - **Scoped working directories**: removed on every exit path, including timeouts
//! - **Gap stripping**: project an alignment onto a reference's own numbering
//! - **Reference catalog**: numbering schemes kept as data, not code
//!
//! ## Example
//!
//! ```rust
//! use renumber::core::alignment::AlignedSet;
//! use renumber::core::record::SequenceRecord;
//! use renumber::mapping::correspond;
//!
//! let aligned = AlignedSet::new(vec![
//!     SequenceRecord::new("query", "MKW-LV"),
//!     SequenceRecord::new("reference", "MK-ALV"),
//! ])
//! .unwrap();
//!
//! // Residue 4 of the query (L) is residue 4 of the reference
//! assert_eq!(correspond(&aligned, 4).unwrap(), Some(4));
//! // Residue 3 of the query (W) aligns to a gap
//! assert_eq!(correspond(&aligned, 3).unwrap(), None);
//! ```
//!
//! ## Modules
//!
//! - [`align`]: External alignment engines and the alignment invoker
//! - [`catalog`]: Reference protein catalog storage
//! - [`core`]: Core data types for records, alignments, and references
//! - [`mapping`]: Gap stripping and coordinate correspondence
//! - [`parsing`]: FASTA records and the conversion configuration file
//! - [`cli`]: Command-line interface implementation

pub mod align;
pub mod catalog;
pub mod cli;
pub mod core;
pub mod mapping;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use align::{align, AlignError, AlignOptions, AlignmentEngine, EngineKind};
pub use catalog::store::ReferenceCatalog;
pub use crate::core::alignment::AlignedSet;
pub use crate::core::record::SequenceRecord;
pub use crate::core::reference::KnownReference;
pub use crate::core::types::*;
pub use mapping::{correspond, strip_to_reference, MappingError};
