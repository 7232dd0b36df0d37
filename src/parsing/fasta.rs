//! Reader and writer for FASTA-style sequence records using noodles.
//!
//! A record is a header line starting with `>` followed by one or more
//! residue lines. Residue lines are concatenated with all whitespace removed.
//! Blank lines between records are ignored, but the input must begin with a
//! header line.
//!
//! Supported extensions for file input:
//! - `.fa`, `.fasta`, `.faa`, `.fas` (uncompressed)
//! - any of the above with `.gz` or `.bgz` (gzip compressed)

use std::ffi::OsStr;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use noodles::fasta;
use thiserror::Error;

use crate::core::record::SequenceRecord;
use crate::utils::validation::check_record_limit;

/// First character of every header line
pub const HEADER_DELIMITER: char = '>';

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed FASTA input: residues on line {line} appear before any header")]
    ResiduesBeforeHeader { line: usize },

    #[error("Malformed FASTA input: empty sequence for '{header}'")]
    EmptySequence { header: String },

    #[error("Malformed FASTA input: record {record} has an empty header")]
    EmptyHeader { record: usize },

    #[error("Too many records: {0} exceeds maximum allowed")]
    TooManyRecords(usize),
}

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    let stem = path_str
        .strip_suffix(".gz")
        .or_else(|| path_str.strip_suffix(".bgz"))
        .unwrap_or(&path_str);

    matches!(
        Path::new(stem)
            .extension()
            .and_then(OsStr::to_str),
        Some("fa" | "fasta" | "faa" | "fas")
    )
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Read all records from a FASTA file, decompressing gzip input by extension.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or one of the
/// malformed-input variants if the content is not valid record format.
pub fn read_fasta_file(path: &Path) -> Result<Vec<SequenceRecord>, ParseError> {
    let file = std::fs::File::open(path)?;
    if is_gzipped(path) {
        read_records(BufReader::new(GzDecoder::new(file)))
    } else {
        read_records(BufReader::new(file))
    }
}

/// Read all records from a buffered source.
///
/// The final record is closed at end of input; no trailing header is needed.
///
/// # Errors
///
/// Returns `ParseError::ResiduesBeforeHeader` if the first line is not a
/// header (a leading blank line included), `ParseError::EmptySequence` if a
/// header has no residues, `ParseError::EmptyHeader` if a header line carries
/// no text, or `ParseError::TooManyRecords` if the record limit is exceeded.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<SequenceRecord>, ParseError> {
    let mut fasta_reader = fasta::io::Reader::new(reader);
    let mut records = Vec::new();
    let mut definition = String::new();
    let mut sequence = Vec::new();

    loop {
        definition.clear();
        if fasta_reader.read_definition(&mut definition)? == 0 {
            break;
        }

        // read_sequence stops at the next '>', so only the first line can lack one
        let Some(rest) = definition.strip_prefix(HEADER_DELIMITER) else {
            return Err(ParseError::ResiduesBeforeHeader { line: 1 });
        };
        let header = rest.trim_end();
        if header.is_empty() {
            return Err(ParseError::EmptyHeader {
                record: records.len() + 1,
            });
        }

        sequence.clear();
        fasta_reader.read_sequence(&mut sequence)?;
        let residues: String = String::from_utf8_lossy(&sequence)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if residues.is_empty() {
            return Err(ParseError::EmptySequence {
                header: header.to_string(),
            });
        }

        // Check record limit for DOS protection
        if check_record_limit(records.len()).is_some() {
            return Err(ParseError::TooManyRecords(records.len() + 1));
        }

        records.push(SequenceRecord::new(header, residues));
    }

    Ok(records)
}

/// Convert a record to its noodles form; the header becomes the definition line.
fn to_fasta_record(record: &SequenceRecord) -> io::Result<fasta::Record> {
    let definition: fasta::record::Definition = format!("{HEADER_DELIMITER}{}", record.header)
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let sequence = fasta::record::Sequence::from(record.residues.as_bytes().to_vec());
    Ok(fasta::Record::new(definition, sequence))
}

/// Write records in input order, then flush the sink.
///
/// Each record is a header line followed by its residues, wrapped at 80
/// characters per line.
///
/// # Errors
///
/// Returns any IO error raised by the sink, or `InvalidInput` for a header
/// that cannot form a definition line.
pub fn write_records<W: Write>(records: &[SequenceRecord], mut sink: W) -> io::Result<()> {
    {
        let mut writer = fasta::io::Writer::new(&mut sink);
        for record in records {
            writer.write_record(&to_fasta_record(record)?)?;
        }
    }
    sink.flush()
}

/// Write records to a file, replacing any existing content.
///
/// # Errors
///
/// Returns an IO error if the file cannot be created or written.
pub fn write_fasta_file(records: &[SequenceRecord], path: &Path) -> io::Result<()> {
    let file = std::fs::File::create(path)?;
    write_records(records, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::MAX_RECORDS;
    use tempfile::NamedTempFile;

    fn parse(text: &str) -> Result<Vec<SequenceRecord>, ParseError> {
        read_records(text.as_bytes())
    }

    #[test]
    fn test_is_fasta_file() {
        assert!(is_fasta_file(Path::new("test.fa")));
        assert!(is_fasta_file(Path::new("test.fasta")));
        assert!(is_fasta_file(Path::new("test.faa")));
        assert!(is_fasta_file(Path::new("test.fa.gz")));
        assert!(is_fasta_file(Path::new("test.fasta.bgz")));
        assert!(is_fasta_file(Path::new("/path/to/Proteins.FASTA")));

        assert!(!is_fasta_file(Path::new("test.txt")));
        assert!(!is_fasta_file(Path::new("test.gz")));
        assert!(!is_fasta_file(Path::new("test.fai")));
    }

    #[test]
    fn test_read_multiline_records() {
        let records = parse(">seq1 description  \nMKT IL\nALS\n>seq2\nGGGG\n").unwrap();
        assert_eq!(
            records,
            vec![
                SequenceRecord::new("seq1 description", "MKTILALS"),
                SequenceRecord::new("seq2", "GGGG"),
            ]
        );
    }

    #[test]
    fn test_read_final_record_without_newline() {
        let records = parse(">a\nAC\n>b\nGT").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], SequenceRecord::new("b", "GT"));
    }

    #[test]
    fn test_read_ignores_blank_lines() {
        let records = parse(">a\r\nAC\r\n\n  \nGT\r\n\n>b\nT\n").unwrap();
        assert_eq!(records[0], SequenceRecord::new("a", "ACGT"));
        assert_eq!(records[1], SequenceRecord::new("b", "T"));
    }

    #[test]
    fn test_blank_line_before_first_header() {
        let err = parse("\n>a\nAC\n").unwrap_err();
        assert!(matches!(err, ParseError::ResiduesBeforeHeader { line: 1 }));
    }

    #[test]
    fn test_read_keeps_gaps() {
        let records = parse(">s1\n-AT-A-GC\n").unwrap();
        assert_eq!(records[0].residues, "-AT-A-GC");
    }

    #[test]
    fn test_read_empty_input() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_residues_before_header() {
        let err = parse("ACGT\n>a\nAC\n").unwrap_err();
        assert!(matches!(err, ParseError::ResiduesBeforeHeader { line: 1 }));
    }

    #[test]
    fn test_empty_sequence_first_record() {
        let err = parse(">a\n>b\nAC\n").unwrap_err();
        assert!(matches!(err, ParseError::EmptySequence { header } if header == "a"));
    }

    #[test]
    fn test_empty_sequence_last_record() {
        let err = parse(">a\nAC\n>b\n").unwrap_err();
        assert!(matches!(err, ParseError::EmptySequence { header } if header == "b"));
    }

    #[test]
    fn test_empty_header() {
        let err = parse(">a\nAC\n>  \nGT\n").unwrap_err();
        assert!(matches!(err, ParseError::EmptyHeader { record: 2 }));
    }

    #[test]
    fn test_write_format() {
        let mut out = Vec::new();
        write_records(
            &[
                SequenceRecord::new("a", "AC-T"),
                SequenceRecord::new("b b", "ACGT"),
            ],
            &mut out,
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), ">a\nAC-T\n>b b\nACGT\n");
    }

    #[test]
    fn test_write_wraps_long_sequences() {
        let residues = "A".repeat(100);
        let mut out = Vec::new();
        write_records(&[SequenceRecord::new("long", residues.as_str())], &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, format!(">long\n{}\n{}\n", "A".repeat(80), "A".repeat(20)));
        assert_eq!(parse(&text).unwrap()[0].residues, residues);
    }

    #[test]
    fn test_too_many_records_reports_attempted_count() {
        let text = ">r\nA\n".repeat(MAX_RECORDS + 1);
        let err = parse(&text).unwrap_err();
        assert!(matches!(err, ParseError::TooManyRecords(n) if n == MAX_RECORDS + 1));
    }

    #[test]
    fn test_write_then_read_preserves_records() {
        let records = vec![
            SequenceRecord::new("query", "MKAILVVLLYTFATANA"),
            SequenceRecord::new("4HMG chain A", "QDLPG--NDNST"),
            SequenceRecord::new("x", "A"),
        ];
        let mut out = Vec::new();
        write_records(&records, &mut out).unwrap();
        assert_eq!(parse(std::str::from_utf8(&out).unwrap()).unwrap(), records);
    }

    #[test]
    fn test_read_fasta_file_gzipped() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut temp = NamedTempFile::with_suffix(".fa.gz").unwrap();
        {
            let mut encoder = GzEncoder::new(&mut temp, Compression::default());
            encoder.write_all(b">a\nACGT\n>b\nAC\n").unwrap();
            encoder.finish().unwrap();
        }
        temp.flush().unwrap();

        let records = read_fasta_file(temp.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].residues, "ACGT");
    }

    #[test]
    fn test_write_fasta_file() {
        let temp = NamedTempFile::with_suffix(".fa").unwrap();
        let records = vec![SequenceRecord::new("a", "AC"), SequenceRecord::new("b", "GT")];
        write_fasta_file(&records, temp.path()).unwrap();
        assert_eq!(read_fasta_file(temp.path()).unwrap(), records);
    }
}
