//! Parsers for the inputs of a renumbering run.
//!
//! This module provides:
//!
//! - **FASTA records**: read and write header + residue records, gapped or not
//! - **Conversion configuration**: the three-line `key value` driver file
//!
//! ## Example
//!
//! ```rust
//! use renumber::parsing::fasta::{read_records, write_records};
//!
//! let records = read_records(">seq1\nMKT\nAIL\n>seq2\nMK-IL\n".as_bytes()).unwrap();
//! assert_eq!(records[0].residues, "MKTAIL");
//!
//! let mut out = Vec::new();
//! write_records(&records, &mut out).unwrap();
//! assert_eq!(out, b">seq1\nMKTAIL\n>seq2\nMK-IL\n");
//! ```

pub mod config;
pub mod fasta;
