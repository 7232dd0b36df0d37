//! Centralized validation and helper functions.

use std::collections::HashSet;

use crate::core::record::SequenceRecord;

/// Maximum number of records allowed in a single alignment request (DOS protection)
pub const MAX_RECORDS: usize = 10_000;

/// Check if adding another record would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new record.
/// Returns an error message if adding would exceed the limit, None if safe to add.
///
/// # Example
/// ```ignore
/// if check_record_limit(records.len()).is_some() {
///     return Err(...);
/// }
/// records.push(new_record); // Safe to add
/// ```
#[must_use]
pub fn check_record_limit(count: usize) -> Option<String> {
    if count >= MAX_RECORDS {
        Some(format!(
            "Too many records: adding another would exceed maximum of {MAX_RECORDS}"
        ))
    } else {
        None
    }
}

/// Record validation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Duplicate header '{0}': headers must be unique within an alignment request")]
    DuplicateHeader(String),
    #[error("Record at index {0} has an empty header")]
    EmptyHeader(usize),
    #[error("Header '{0}' has leading or trailing whitespace; aligned output could not be matched to it")]
    UntrimmedHeader(String),
    #[error("Record '{0}' has no residues")]
    EmptyResidues(String),
    #[error("Record '{0}' contains whitespace in its residues")]
    WhitespaceInResidues(String),
    #[error("Too many records: {0} exceeds maximum of {MAX_RECORDS}")]
    TooManyRecords(usize),
}

/// Return the first header that occurs more than once, if any.
///
/// # Examples
///
/// ```
/// use renumber::core::record::SequenceRecord;
/// use renumber::utils::validation::find_duplicate_header;
///
/// let records = vec![
///     SequenceRecord::new("a", "MK"),
///     SequenceRecord::new("b", "MK"),
///     SequenceRecord::new("a", "ML"),
/// ];
/// assert_eq!(find_duplicate_header(&records), Some("a"));
/// ```
#[must_use]
pub fn find_duplicate_header(records: &[SequenceRecord]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .iter()
        .map(|r| r.header.as_str())
        .find(|header| !seen.insert(*header))
}

/// Validate records before they are handed to an alignment engine.
///
/// Headers must be non-empty, free of surrounding whitespace and unique (they
/// are the join key on engine output, which is read back trimmed) and residues must be non-empty and free of whitespace.
///
/// # Errors
///
/// Returns the first `ValidationError` found, checking the record count,
/// then each record in order, then header uniqueness.
pub fn validate_records(records: &[SequenceRecord]) -> Result<(), ValidationError> {
    if records.len() > MAX_RECORDS {
        return Err(ValidationError::TooManyRecords(records.len()));
    }

    for (index, record) in records.iter().enumerate() {
        if record.header.trim().is_empty() {
            return Err(ValidationError::EmptyHeader(index));
        }
        if record.header.trim() != record.header {
            return Err(ValidationError::UntrimmedHeader(record.header.clone()));
        }
        if record.residues.is_empty() {
            return Err(ValidationError::EmptyResidues(record.header.clone()));
        }
        if record.residues.chars().any(char::is_whitespace) {
            return Err(ValidationError::WhitespaceInResidues(record.header.clone()));
        }
    }

    if let Some(header) = find_duplicate_header(records) {
        return Err(ValidationError::DuplicateHeader(header.to_string()));
    }

    Ok(())
}
