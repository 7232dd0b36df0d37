use serde::Serialize;
use thiserror::Error;

use crate::core::record::SequenceRecord;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignmentShapeError {
    #[error("Aligned set contains no records")]
    Empty,

    #[error("Aligned sequence '{header}' has length {length}, expected alignment width {width}")]
    LengthMismatch {
        header: String,
        length: usize,
        width: usize,
    },
}

/// An ordered set of records that all share the same alignment width.
///
/// The width invariant is checked on construction; a set that violates it
/// is rejected rather than padded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignedSet {
    records: Vec<SequenceRecord>,
    width: usize,
}

impl AlignedSet {
    /// Build an aligned set, checking that every record has the width of the first.
    ///
    /// # Errors
    ///
    /// Returns `AlignmentShapeError::Empty` for an empty input and
    /// `AlignmentShapeError::LengthMismatch` naming the first record whose
    /// length differs from the first record's.
    pub fn new(records: Vec<SequenceRecord>) -> Result<Self, AlignmentShapeError> {
        let width = records.first().ok_or(AlignmentShapeError::Empty)?.len();

        if let Some(bad) = records.iter().find(|r| r.len() != width) {
            return Err(AlignmentShapeError::LengthMismatch {
                header: bad.header.clone(),
                length: bad.len(),
                width,
            });
        }

        Ok(Self { records, width })
    }

    /// Common length of all records, gaps included
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn records(&self) -> &[SequenceRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by header
    #[must_use]
    pub fn get(&self, header: &str) -> Option<&SequenceRecord> {
        self.records.iter().find(|r| r.header == header)
    }

    #[must_use]
    pub fn into_records(self) -> Vec<SequenceRecord> {
        self.records
    }
}
