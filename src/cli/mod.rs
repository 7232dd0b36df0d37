//! Command-line interface for renumber.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **convert**: Convert query sites into the numbering of reference proteins
//! - **align**: Align the sequences of a FASTA file with an external engine
//! - **catalog**: List, show, or export the reference proteins
//!
//! ## Usage
//!
//! ```text
//! # Convert the sites listed in a configuration file
//! renumber convert sites.txt
//!
//! # Only report H3 numbering, aligning with MUSCLE
//! renumber convert sites.txt --reference 4HMG --engine muscle --gap-open -100
//!
//! # JSON output for scripting
//! renumber convert sites.txt --format json
//!
//! # Align a FASTA file and strip gaps in the first sequence
//! renumber align proteins.fasta --executable-directory /opt/probcons --strip
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::align::invoker::{DEFAULT_DIAGNOSTICS_FILE, DEFAULT_TIMEOUT};
use crate::align::{AlignError, AlignOptions, AlignmentEngine, EngineKind};

pub mod align;
pub mod catalog;
pub mod convert;

#[derive(Parser)]
#[command(name = "renumber")]
#[command(version)]
#[command(about = "Convert residue numbers between protein numbering schemes")]
#[command(
    long_about = "renumber converts residue positions given in the sequential numbering of your protein into the numbering used by reference structures.\n\nIt aligns your sequence to each reference with an external multiple sequence alignment program (PROBCONS or MUSCLE) and reports, for every site:\n- The corresponding residue and its label in the reference numbering\n- Or that the site aligns to a gap in the reference"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert sites from a configuration file into reference numbering
    Convert(convert::ConvertArgs),

    /// Align sequences from a FASTA file
    Align(align::AlignArgs),

    /// Inspect the reference catalog
    Catalog(catalog::CatalogArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Engine options shared by every command that runs an alignment
#[derive(clap::Args, Clone, Debug)]
pub struct EngineArgs {
    /// Alignment program to run
    #[arg(long, value_enum, default_value = "probcons")]
    pub engine: EngineKind,

    /// Gap-open penalty for MUSCLE (e.g. -100 gives fewer gaps)
    #[arg(long, allow_negative_numbers = true)]
    pub gap_open: Option<i32>,

    /// Seconds to wait for the alignment program before killing it
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// File receiving the alignment program's error output when an alignment fails
    #[arg(long, default_value = DEFAULT_DIAGNOSTICS_FILE)]
    pub diagnostics: PathBuf,
}

impl EngineArgs {
    /// Build the selected engine
    ///
    /// # Errors
    ///
    /// Returns `AlignError::Configuration` for a gap-open penalty with PROBCONS.
    pub fn build_engine(&self) -> Result<Arc<dyn AlignmentEngine>, AlignError> {
        self.engine.build(self.gap_open)
    }

    #[must_use]
    pub fn options(&self) -> AlignOptions {
        AlignOptions {
            timeout: Duration::from_secs(self.timeout),
            diagnostics_path: self.diagnostics.clone(),
            working_root: None,
        }
    }
}

/// Per-reference diagnostics file, so concurrent alignments never share one:
/// `alignment_errors.log` becomes `alignment_errors.4HMG.log`
#[must_use]
pub fn diagnostics_for(path: &Path, label: &str) -> PathBuf {
    let stem = path.file_stem().map_or_else(
        || "alignment_errors".to_string(),
        |s| s.to_string_lossy().into_owned(),
    );
    let name = match path.extension() {
        Some(ext) => format!("{stem}.{label}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{label}"),
    };
    path.with_file_name(name)
}
