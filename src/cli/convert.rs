use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::debug;

use crate::align::{align, AlignOptions, AlignmentEngine};
use crate::cli::catalog::load_catalog;
use crate::cli::{diagnostics_for, EngineArgs, OutputFormat};
use crate::core::alignment::AlignedSet;
use crate::core::record::SequenceRecord;
use crate::core::reference::KnownReference;
use crate::core::types::{Correspondence, ReferenceId};
use crate::mapping::{correspond, MappingError};
use crate::parsing::config::parse_config_file;

/// Header given to the query sequence in every alignment
pub const QUERY_HEADER: &str = "query";

#[derive(Args)]
pub struct ConvertArgs {
    /// Configuration file with executabledirectory, querysequence and sites lines
    #[arg(required = true)]
    pub config: PathBuf,

    /// Reference ID to report numbering for (repeatable; default: all references)
    #[arg(short, long = "reference")]
    pub references: Vec<String>,

    /// Path to custom catalog file
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// One reference's answer for one site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceCorrespondence {
    pub reference: ReferenceId,

    #[serde(flatten)]
    pub correspondence: Correspondence,

    /// Residue label in reference numbering, e.g. "Q145 in HA1"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// All answers for one query site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteConversion {
    /// Site in sequential numbering of the query
    pub site: i64,

    /// Query residue at the site
    pub residue: char,

    pub references: Vec<ReferenceCorrespondence>,
}

/// Execute convert subcommand
///
/// # Errors
///
/// Returns an error if the configuration or catalog is invalid, a site is out
/// of range, or any alignment fails. No partial results are printed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ConvertArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = parse_config_file(&args.config)?;
    let catalog = load_catalog(args.catalog.as_deref())?;
    let references = catalog.select(&args.references)?;

    let query = SequenceRecord::new(QUERY_HEADER, config.query_sequence);
    check_sites(&query, &config.sites)?;

    let engine = args.engine.build_engine()?;
    let options = args.engine.options();

    if verbose {
        eprintln!(
            "Aligning {} residues against {} reference(s) with {}",
            query.len(),
            references.len(),
            engine.name()
        );
    }

    // Build tokio runtime
    let rt = tokio::runtime::Runtime::new()?;
    let alignments = rt.block_on(align_references(
        &query,
        &references,
        &config.executable_directory,
        engine,
        &options,
    ))?;

    if verbose {
        eprintln!("Alignments complete");
    }

    let conversions = convert_sites(&query, &config.sites, &references, &alignments)?;

    match format {
        OutputFormat::Text => print_text(&conversions),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&conversions)?),
        OutputFormat::Tsv => print_tsv(&conversions),
    }

    Ok(())
}

/// Reject any site outside the query's sequential numbering before aligning
fn check_sites(query: &SequenceRecord, sites: &[i64]) -> Result<(), MappingError> {
    let length = query.ungapped_len();
    for &site in sites {
        let in_range = usize::try_from(site).is_ok_and(|s| (1..=length).contains(&s));
        if !in_range {
            return Err(MappingError::OutOfRange {
                index: site,
                length,
                header: query.header.clone(),
            });
        }
    }
    Ok(())
}

/// Align the query against every reference concurrently.
///
/// Each alignment runs in its own task with its own working directory and
/// diagnostics file. Results come back in reference order. The first failure
/// aborts the remaining tasks, which kills their engines.
///
/// # Errors
///
/// Returns the first alignment error, or an error if a task panicked.
pub async fn align_references(
    query: &SequenceRecord,
    references: &[&KnownReference],
    executable_directory: &Path,
    engine: Arc<dyn AlignmentEngine>,
    options: &AlignOptions,
) -> anyhow::Result<Vec<AlignedSet>> {
    let mut tasks = JoinSet::new();
    for (index, reference) in references.iter().enumerate() {
        let records = vec![
            query.clone(),
            SequenceRecord::new(reference.id.as_str(), reference.sequence()),
        ];
        let directory = executable_directory.to_path_buf();
        let engine = Arc::clone(&engine);
        let mut options = options.clone();
        options.diagnostics_path = diagnostics_for(&options.diagnostics_path, reference.id.as_str());

        tasks.spawn(async move {
            let result = align(&records, &directory, engine.as_ref(), &options).await;
            (index, result)
        });
    }

    let mut alignments: Vec<Option<AlignedSet>> = vec![None; references.len()];
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined?;
        debug!("Alignment {} of {} finished", index + 1, references.len());
        alignments[index] = Some(result?);
    }

    Ok(alignments.into_iter().flatten().collect())
}

/// Map every site through every alignment and label the results.
///
/// `alignments[i]` must be the alignment of the query with `references[i]`.
///
/// # Errors
///
/// Returns an error if a site is out of range or a mapped position falls
/// outside the reference, which means the alignment is inconsistent.
pub fn convert_sites(
    query: &SequenceRecord,
    sites: &[i64],
    references: &[&KnownReference],
    alignments: &[AlignedSet],
) -> anyhow::Result<Vec<SiteConversion>> {
    let mut conversions = Vec::with_capacity(sites.len());

    for &site in sites {
        let residue = usize::try_from(site)
            .ok()
            .and_then(|s| query.residue_at(s))
            .ok_or_else(|| MappingError::OutOfRange {
                index: site,
                length: query.ungapped_len(),
                header: query.header.clone(),
            })?;

        let mut answers = Vec::with_capacity(references.len());
        for (reference, aligned) in references.iter().zip(alignments) {
            let position = correspond(aligned, site)?;
            let correspondence = reference.correspondence(position).ok_or_else(|| {
                anyhow::anyhow!(
                    "Invalid corresponding residue {} for {}: the reference has {} residues",
                    position.unwrap_or_default(),
                    reference.id,
                    reference.len()
                )
            })?;
            let label = match &correspondence {
                Correspondence::Residue {
                    residue,
                    number,
                    chain,
                    ..
                } => Some(format!(
                    "{residue}{number} {} {chain}",
                    reference.label_preposition
                )),
                Correspondence::Gap => None,
            };
            answers.push(ReferenceCorrespondence {
                reference: reference.id.clone(),
                correspondence,
                label,
            });
        }

        conversions.push(SiteConversion {
            site,
            residue,
            references: answers,
        });
    }

    Ok(conversions)
}

fn print_text(conversions: &[SiteConversion]) {
    for conversion in conversions {
        println!(
            "\nResidue {}{} in sequential numbering of your sequence corresponds to:",
            conversion.residue, conversion.site
        );
        for answer in &conversion.references {
            match &answer.label {
                Some(label) => println!("  * {label} in {}", answer.reference),
                None => println!("  * an alignment gap in {}", answer.reference),
            }
        }
    }
}

fn print_tsv(conversions: &[SiteConversion]) {
    println!("site\tresidue\treference\tposition\tlabel");
    for conversion in conversions {
        for answer in &conversion.references {
            let (position, label) = match &answer.correspondence {
                Correspondence::Residue { position, .. } => (
                    position.to_string(),
                    answer.label.clone().unwrap_or_default(),
                ),
                Correspondence::Gap => ("-".to_string(), "gap".to_string()),
            };
            println!(
                "{}\t{}\t{}\t{position}\t{label}",
                conversion.site, conversion.residue, answer.reference
            );
        }
    }
}
