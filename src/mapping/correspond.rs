use crate::core::alignment::AlignedSet;
use crate::core::record::GAP;
use crate::mapping::MappingError;

/// Map a 1-based sequential position in the first record of a pairwise
/// alignment to the sequential position of the residue it aligns with in the
/// second record.
///
/// Returns `Ok(None)` when the queried residue aligns to a gap in the second
/// record.
///
/// The columns are scanned once, left to right, counting residues in both
/// records; the scan stops at the column where the first record's count
/// reaches `index`.
///
/// # Errors
///
/// Returns `MappingError::NotPairwise` unless `aligned` holds exactly two
/// records, and `MappingError::OutOfRange` if `index` is not within
/// `1..=ungapped length` of the first record.
pub fn correspond(aligned: &AlignedSet, index: i64) -> Result<Option<usize>, MappingError> {
    let [first, second] = aligned.records() else {
        return Err(MappingError::NotPairwise(aligned.len()));
    };

    let length = first.ungapped_len();
    let target = usize::try_from(index)
        .ok()
        .filter(|&i| (1..=length).contains(&i))
        .ok_or_else(|| MappingError::OutOfRange {
            index,
            length,
            header: first.header.clone(),
        })?;

    let mut first_count = 0;
    let mut second_count = 0;
    for (a, b) in first.residues.chars().zip(second.residues.chars()) {
        if a != GAP {
            first_count += 1;
        }
        if b != GAP {
            second_count += 1;
        }
        if first_count == target {
            return Ok((b != GAP).then_some(second_count));
        }
    }

    // Unreachable for a valid AlignedSet: target <= ungapped length of first
    Err(MappingError::OutOfRange {
        index,
        length,
        header: first.header.clone(),
    })
}
