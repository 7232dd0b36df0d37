use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tracing::warn;

use crate::align::align;
use crate::cli::{EngineArgs, OutputFormat};
use crate::mapping::strip_to_reference;
use crate::parsing::fasta::{is_fasta_file, read_fasta_file, write_fasta_file, write_records};

#[derive(Args)]
pub struct AlignArgs {
    /// FASTA file with two or more sequences (plain or gzip compressed)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Directory containing the alignment program executable
    #[arg(short = 'x', long, required = true)]
    pub executable_directory: PathBuf,

    /// Remove every column that is a gap in the first sequence
    #[arg(long)]
    pub strip: bool,

    /// Write aligned FASTA to this file instead of standard output
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Execute align subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read, the alignment fails, or the
/// output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: AlignArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if !is_fasta_file(&args.input) {
        warn!(
            "{} does not have a FASTA extension; reading it as FASTA anyway",
            args.input.display()
        );
    }
    let records = read_fasta_file(&args.input)?;
    let engine = args.engine.build_engine()?;
    let options = args.engine.options();

    if verbose {
        eprintln!(
            "Aligning {} sequences from {} with {}",
            records.len(),
            args.input.display(),
            engine.name()
        );
    }

    // Build tokio runtime
    let rt = tokio::runtime::Runtime::new()?;
    let mut aligned = rt.block_on(align(
        &records,
        &args.executable_directory,
        engine.as_ref(),
        &options,
    ))?;

    if args.strip {
        aligned = strip_to_reference(&aligned)?;
    }

    if verbose {
        eprintln!("Alignment width: {}", aligned.width());
    }

    if let Some(path) = &args.output {
        write_fasta_file(aligned.records(), path)?;
        if verbose {
            eprintln!("Wrote {} aligned sequences to {}", aligned.len(), path.display());
        }
        return Ok(());
    }

    match format {
        OutputFormat::Text => write_records(aligned.records(), std::io::stdout().lock())?,
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&aligned)?),
        OutputFormat::Tsv => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "header\tresidues")?;
            for record in aligned.records() {
                writeln!(out, "{}\t{}", record.header, record.residues)?;
            }
        }
    }

    Ok(())
}
