//! Parser for the three-line conversion configuration file.
//!
//! ```text
//! executabledirectory /opt/probcons
//! querysequence MKAILVVLLYTFATANADTLCIGYHANNSTDTV
//! sites 1 15 145
//! ```
//!
//! Blank lines are ignored; exactly three keyed lines must remain, in this order.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration must have exactly three non-blank lines, found {0}")]
    LineCount(usize),

    #[error("Configuration line {line} must start with '{expected}' followed by a value")]
    MissingKey { line: usize, expected: &'static str },

    #[error("Invalid site '{0}': sites must be integers")]
    InvalidSite(String),

    #[error("Executable directory {0} does not exist")]
    MissingDirectory(PathBuf),
}

pub const EXECUTABLE_DIRECTORY_KEY: &str = "executabledirectory";
pub const QUERY_SEQUENCE_KEY: &str = "querysequence";
pub const SITES_KEY: &str = "sites";

/// Inputs for one conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    /// Directory holding the alignment engine executables
    pub executable_directory: PathBuf,

    /// Query protein, upper-cased with whitespace removed
    pub query_sequence: String,

    /// Sites in sequential numbering of the query, in file order
    pub sites: Vec<i64>,
}

/// Read and parse a configuration file.
///
/// # Errors
///
/// Returns `ConfigError::Io` if the file cannot be read, or any error from
/// [`parse_config_text`].
pub fn parse_config_file(path: &Path) -> Result<ConversionConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config_text(&content)
}

/// Parse configuration text.
///
/// # Errors
///
/// Returns `ConfigError::LineCount` unless exactly three non-blank lines are
/// present, `ConfigError::MissingKey` if a line has the wrong key or no value,
/// `ConfigError::InvalidSite` for a non-integer site, and
/// `ConfigError::MissingDirectory` if the executable directory does not exist.
pub fn parse_config_text(text: &str) -> Result<ConversionConfig, ConfigError> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() != 3 {
        return Err(ConfigError::LineCount(lines.len()));
    }

    let directory = keyed_value(lines[0], 1, EXECUTABLE_DIRECTORY_KEY)?;
    let executable_directory = PathBuf::from(directory);
    if !executable_directory.is_dir() {
        return Err(ConfigError::MissingDirectory(executable_directory));
    }

    let query_sequence: String = keyed_value(lines[1], 2, QUERY_SEQUENCE_KEY)?
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let sites = keyed_value(lines[2], 3, SITES_KEY)?
        .split_whitespace()
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| ConfigError::InvalidSite(s.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ConversionConfig {
        executable_directory,
        query_sequence,
        sites,
    })
}

/// Split `key value...` and return the trimmed value if the key matches
fn keyed_value<'a>(
    line: &'a str,
    line_number: usize,
    expected: &'static str,
) -> Result<&'a str, ConfigError> {
    let missing = || ConfigError::MissingKey {
        line: line_number,
        expected,
    };

    let (key, value) = line.trim().split_once(char::is_whitespace).ok_or_else(missing)?;
    let value = value.trim();
    if key != expected || value.is_empty() {
        return Err(missing());
    }
    Ok(value)
}
