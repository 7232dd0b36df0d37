//! Coordinate arithmetic over aligned sequences.
//!
//! - [`strip_to_reference`]: drop every column that is a gap in the first
//!   record, projecting the alignment onto the reference's own numbering
//! - [`correspond`]: map a 1-based sequential position in one record of a
//!   pairwise alignment to the matching position in the other
//!
//! Both are pure functions over an [`AlignedSet`]; neither touches the
//! filesystem or launches an engine.
//!
//! ## Example
//!
//! ```rust
//! use renumber::core::alignment::AlignedSet;
//! use renumber::core::record::SequenceRecord;
//! use renumber::mapping::{correspond, strip_to_reference};
//!
//! let aligned = AlignedSet::new(vec![
//!     SequenceRecord::new("s1", "-AT-A-GC"),
//!     SequenceRecord::new("s2", "AAT-TAGC"),
//! ])
//! .unwrap();
//!
//! assert_eq!(correspond(&aligned, 1).unwrap(), Some(2));
//!
//! let stripped = strip_to_reference(&aligned).unwrap();
//! assert_eq!(stripped.records()[1].residues, "ATTGC");
//! ```
//!
//! [`AlignedSet`]: crate::core::alignment::AlignedSet

use thiserror::Error;

use crate::core::alignment::AlignmentShapeError;

pub mod correspond;
pub mod gaps;

pub use correspond::correspond;
pub use gaps::strip_to_reference;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Expected at least two aligned records, found {0}")]
    TooFewRecords(usize),

    #[error("Correspondence needs exactly two aligned records, found {0}")]
    NotPairwise(usize),

    #[error("Position {index} is outside the valid range 1..={length} for '{header}'")]
    OutOfRange {
        index: i64,
        length: usize,
        header: String,
    },

    #[error(transparent)]
    Shape(#[from] AlignmentShapeError),
}
