use crate::core::alignment::AlignedSet;
use crate::core::record::{SequenceRecord, GAP};
use crate::mapping::MappingError;

/// Strip every column that is a gap in the first (reference) record.
///
/// The reference loses all of its gaps; every other record keeps exactly the
/// characters in the surviving columns, including any gaps of its own. The
/// result has width equal to the reference's ungapped length, with headers
/// and record order unchanged.
///
/// # Errors
///
/// Returns `MappingError::TooFewRecords` if `aligned` has fewer than two records.
pub fn strip_to_reference(aligned: &AlignedSet) -> Result<AlignedSet, MappingError> {
    let records = aligned.records();
    if records.len() < 2 {
        return Err(MappingError::TooFewRecords(records.len()));
    }

    let kept_columns: Vec<usize> = records[0]
        .residues
        .chars()
        .enumerate()
        .filter(|&(_, c)| c != GAP)
        .map(|(column, _)| column)
        .collect();

    let stripped = records
        .iter()
        .map(|record| {
            let columns: Vec<char> = record.residues.chars().collect();
            let residues: String = kept_columns.iter().map(|&i| columns[i]).collect();
            SequenceRecord::new(record.header.clone(), residues)
        })
        .collect();

    Ok(AlignedSet::new(stripped)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aligned(records: &[(&str, &str)]) -> AlignedSet {
        AlignedSet::new(
            records
                .iter()
                .map(|(h, s)| SequenceRecord::new(*h, *s))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_strip_to_first_sequence() {
        let input = aligned(&[("s1", "-AT-A-GC"), ("s2", "AAT-TAGC"), ("s3", "--T-A-GC")]);
        let expected = aligned(&[("s1", "ATAGC"), ("s2", "ATTGC"), ("s3", "-TAGC")]);
        assert_eq!(strip_to_reference(&input).unwrap(), expected);
    }

    #[test]
    fn test_strip_is_idempotent() {
        let input = aligned(&[("ref", "M-K--TA"), ("other", "MAKL-T-")]);
        let once = strip_to_reference(&input).unwrap();
        let twice = strip_to_reference(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_strip_width_equals_reference_residue_count() {
        let input = aligned(&[("ref", "--MK-T-AIL-"), ("other", "AAMKQTWAIL-")]);
        let stripped = strip_to_reference(&input).unwrap();
        assert_eq!(stripped.width(), input.records()[0].ungapped_len());
        assert_eq!(stripped.records()[0].residues, "MKTAIL");
        assert_eq!(stripped.records()[1].residues, "MKTAIL");
    }

    #[test]
    fn test_strip_requires_two_records() {
        let input = aligned(&[("ref", "M-K")]);
        assert_eq!(
            strip_to_reference(&input),
            Err(MappingError::TooFewRecords(1))
        );
    }
}
