use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use crate::catalog::store::{CatalogError, ReferenceCatalog};
use crate::cli::OutputFormat;
use crate::core::types::ReferenceId;

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List all references in the catalog
    List {
        /// Path to custom catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Show the chains and numbering of a specific reference
    Show {
        /// Reference ID
        #[arg(required = true)]
        id: String,

        /// Path to custom catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Export the catalog to a file
    Export {
        /// Output file path
        #[arg(required = true)]
        output: PathBuf,

        /// Path to custom catalog file to export (defaults to embedded)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

/// Load a custom catalog if a path is given, the embedded one otherwise
///
/// # Errors
///
/// Returns `CatalogError` if the catalog cannot be read or is invalid.
pub fn load_catalog(path: Option<&Path>) -> Result<ReferenceCatalog, CatalogError> {
    match path {
        Some(path) => ReferenceCatalog::load_from_file(path),
        None => ReferenceCatalog::load_embedded(),
    }
}

/// Execute catalog subcommand
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the export cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CatalogArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::List { catalog } => run_list(catalog.as_deref(), format, verbose),
        CatalogCommands::Show { id, catalog } => run_show(&id, catalog.as_deref(), format),
        CatalogCommands::Export { output, catalog } => run_export(&output, catalog.as_deref()),
    }
}

fn run_list(catalog_path: Option<&Path>, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path)?;

    if verbose {
        eprintln!("Loaded catalog with {} references", catalog.len());
    }

    match format {
        OutputFormat::Text => {
            let id_width = catalog
                .references
                .iter()
                .map(|r| r.id.0.len())
                .max()
                .unwrap_or(2)
                .max(2);
            let name_width = catalog
                .references
                .iter()
                .map(|r| r.display_name.len())
                .max()
                .unwrap_or(4)
                .max(4);

            println!("Reference Catalog ({} references)\n", catalog.len());
            println!(
                "{:<id_w$} {:<name_w$} {:>8} {:>8}",
                "ID",
                "Name",
                "Chains",
                "Residues",
                id_w = id_width,
                name_w = name_width
            );
            println!("{}", "-".repeat(id_width + name_width + 18));

            for r in &catalog.references {
                println!(
                    "{:<id_w$} {:<name_w$} {:>8} {:>8}",
                    r.id.0,
                    r.display_name,
                    r.chains.len(),
                    r.len(),
                    id_w = id_width,
                    name_w = name_width
                );
                if verbose {
                    if let Some(description) = &r.description {
                        println!("  └─ {description}");
                    }
                }
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = catalog
                .references
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "id": r.id.0,
                        "display_name": r.display_name,
                        "chain_count": r.chains.len(),
                        "residue_count": r.len(),
                        "description": r.description,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("id\tdisplay_name\tchain_count\tresidue_count");
            for r in &catalog.references {
                println!(
                    "{}\t{}\t{}\t{}",
                    r.id.0,
                    r.display_name,
                    r.chains.len(),
                    r.len()
                );
            }
        }
    }

    Ok(())
}

fn run_show(id: &str, catalog_path: Option<&Path>, format: OutputFormat) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let reference = catalog
        .get(&ReferenceId::new(id))
        .ok_or_else(|| anyhow::anyhow!("Reference '{id}' not found in catalog"))?;

    match format {
        OutputFormat::Text => {
            println!("{}", reference.display_name);
            println!("{}", "=".repeat(reference.display_name.len()));
            println!("ID: {}", reference.id);
            if let Some(description) = &reference.description {
                println!("Description: {description}");
            }
            println!("Residues: {}", reference.len());
            println!("\nChains:");
            for chain in &reference.chains {
                let length = chain.sequence.chars().filter(|c| !c.is_whitespace()).count();
                let last = chain.first_number + i64::try_from(length).unwrap_or(i64::MAX) - 1;
                println!(
                    "  {} {}-{} ({length} residues)",
                    chain.name, chain.first_number, last
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(reference)?);
        }
        OutputFormat::Tsv => {
            println!("chain\tfirst_number\tlength");
            for chain in &reference.chains {
                println!(
                    "{}\t{}\t{}",
                    chain.name,
                    chain.first_number,
                    chain.sequence.chars().filter(|c| !c.is_whitespace()).count()
                );
            }
        }
    }

    Ok(())
}

fn run_export(output: &Path, catalog_path: Option<&Path>) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path)?;
    std::fs::write(output, catalog.to_json()?)?;
    eprintln!(
        "Exported {} references to {}",
        catalog.len(),
        output.display()
    );
    Ok(())
}
