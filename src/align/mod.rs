//! Multiple sequence alignment through external engines.
//!
//! - [`AlignmentEngine`]: how an engine is located, invoked and where it writes
//! - [`Probcons`], [`Muscle`]: the supported engines
//! - [`align`]: run an engine in a scratch directory and return a validated
//!   [`AlignedSet`] in input order
//!
//! ## Failure handling
//!
//! Engines tend to fail quietly when they run out of memory: they truncate or
//! drop sequences instead of exiting with an error. Every engine output is
//! therefore checked for record count, header identity and width. When a check
//! fails, the engine's standard error is written to the diagnostics file
//! before the error is returned.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use renumber::align::{align, AlignOptions, Probcons};
//! use renumber::core::record::SequenceRecord;
//!
//! # async fn run() -> Result<(), renumber::align::AlignError> {
//! let records = vec![
//!     SequenceRecord::new("query", "MKAILVVLLYTFATANA"),
//!     SequenceRecord::new("4HMG", "QDLPGNDNSTATLCLGHHAV"),
//! ];
//! let aligned = align(&records, Path::new("/opt/probcons"), &Probcons, &AlignOptions::default()).await?;
//! assert_eq!(aligned.records()[0].header, "query");
//! # Ok(())
//! # }
//! ```
//!
//! [`AlignedSet`]: crate::core::alignment::AlignedSet

use std::path::PathBuf;

use thiserror::Error;

use crate::core::alignment::AlignmentShapeError;
use crate::parsing::fasta::ParseError;
use crate::utils::validation::ValidationError;

pub mod engine;
pub mod invoker;

pub use engine::{AlignmentEngine, EngineKind, EngineOutput, Muscle, Probcons};
pub use invoker::{align, AlignOptions};

#[derive(Error, Debug)]
pub enum AlignError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Alignment needs at least two records, found {0}")]
    TooFewRecords(usize),

    #[error(transparent)]
    InvalidRecords(#[from] ValidationError),

    #[error("IO error in alignment working directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to launch {}: {source}", executable.display())]
    Spawn {
        executable: PathBuf,
        source: std::io::Error,
    },

    #[error("{engine} did not finish within {seconds} seconds")]
    Timeout { engine: String, seconds: u64 },

    #[error("{engine} exited with {status}{}", diagnostics_note(.diagnostics))]
    EngineFailed {
        engine: String,
        status: std::process::ExitStatus,
        diagnostics: Option<PathBuf>,
    },

    #[error("Could not read alignment output of {engine}: {source}{}", diagnostics_note(.diagnostics))]
    MalformedOutput {
        engine: String,
        source: ParseError,
        diagnostics: Option<PathBuf>,
    },

    #[error(
        "{engine} returned {found} aligned sequences for {expected} inputs{}",
        diagnostics_note(.diagnostics)
    )]
    CountMismatch {
        engine: String,
        expected: usize,
        found: usize,
        diagnostics: Option<PathBuf>,
    },

    #[error(
        "After alignment, the following header is missing: {header}{}",
        diagnostics_note(.diagnostics)
    )]
    MissingHeader {
        header: String,
        diagnostics: Option<PathBuf>,
    },

    #[error(
        "Aligned sequence '{header}' has length {length}, not the alignment width {width}; \
         the engine may have run out of memory{}",
        diagnostics_note(.diagnostics)
    )]
    AlignedLengthMismatch {
        header: String,
        length: usize,
        width: usize,
        diagnostics: Option<PathBuf>,
    },

    #[error(
        "Unaligned sequence '{header}' has {length} residues, more than the alignment width {width}; \
         the engine may have run out of memory{}",
        diagnostics_note(.diagnostics)
    )]
    UnalignedTooLong {
        header: String,
        length: usize,
        width: usize,
        diagnostics: Option<PathBuf>,
    },

    #[error(transparent)]
    Shape(#[from] AlignmentShapeError),
}

#[allow(clippy::ref_option)] // Called from thiserror format arguments
fn diagnostics_note(diagnostics: &Option<PathBuf>) -> String {
    match diagnostics {
        Some(path) => format!(" (engine errors written to {})", path.display()),
        None => String::new(),
    }
}
